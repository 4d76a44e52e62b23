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
    pub static ref STRINGS_ABI: Abi = parse_abi(&[
        "function strcat(string a, string b) external pure returns (string)",
        "function length(string s) external pure returns (uint256)",
    ])
    .expect("strings ABI is valid");
}

/// Pure string helpers. Strings come back as their raw content.
pub struct Strings;

impl Endpoint for Strings {
    fn name(&self) -> &'static str {
        "Strings"
    }

    fn abi(&self) -> &Abi {
        &STRINGS_ABI
    }

    fn call(&self, _rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        match function.name.as_str() {
            "strcat" => {
                let mut a = args.string()?;
                a.push_str(&args.string()?);
                Ok(Bytes::from(a.into_bytes()))
            }
            "length" => {
                let s = args.string()?;
                Ok(word_result(Token::Uint(U256::from(s.len()))))
            }
            _ => Err(unsupported(self, function)),
        }
    }
}
