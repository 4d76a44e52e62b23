// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::{Bytes, U256};
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::unsupported;
use crate::endpoint::{word_result, Args};
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref MATH_ABI: Abi = parse_abi(&[
        "function add(uint256 a, uint256 b) external pure returns (uint256)",
        "function sub(uint256 a, uint256 b) external pure returns (uint256)",
        "function sum(uint256 a, uint256 b, uint256 c, uint256 d, uint256 e, uint256 f, uint256 g, uint256 h) external pure returns (uint256)",
    ])
    .expect("math ABI is valid");
}

/// Checked arithmetic on words.
pub struct Math;

fn overflow() -> InvokeError {
    InvokeError::revert("arithmetic overflow")
}

impl Endpoint for Math {
    fn name(&self) -> &'static str {
        "Math"
    }

    fn abi(&self) -> &Abi {
        &MATH_ABI
    }

    fn call(&self, _rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        let result = match function.name.as_str() {
            "add" => args.uint()?.checked_add(args.uint()?).ok_or_else(overflow)?,
            "sub" => args.uint()?.checked_sub(args.uint()?).ok_or_else(overflow)?,
            "sum" => {
                let mut total = U256::zero();
                while !args.is_empty() {
                    total = total.checked_add(args.uint()?).ok_or_else(overflow)?;
                }
                total
            }
            _ => return Err(unsupported(self, function)),
        };
        Ok(word_result(Token::Uint(result)))
    }
}
