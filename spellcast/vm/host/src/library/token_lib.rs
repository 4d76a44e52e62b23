// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::Bytes;
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::{encode_call, unsupported, TOKEN_ABI};
use crate::endpoint::Args;
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref TOKEN_LIB_ABI: Abi = parse_abi(&[
        "function balanceOf(address token, address who) external view returns (uint256)",
        "function transfer(address token, address to, uint256 amount) external returns (bool)",
    ])
    .expect("token library ABI is valid");
}

/// Token operations meant to be borrowed through delegation, so the token
/// sees the delegating account as the sender.
pub struct TokenLibrary;

impl Endpoint for TokenLibrary {
    fn name(&self) -> &'static str {
        "TokenLibrary"
    }

    fn abi(&self) -> &Abi {
        &TOKEN_LIB_ABI
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        match function.name.as_str() {
            "balanceOf" => {
                let token = args.address()?;
                let who = args.address()?;
                let input = encode_call(&TOKEN_ABI, "balanceOf", &[Token::Address(who)])?;
                rt.static_call(token, &input)
            }
            "transfer" => {
                let token = args.address()?;
                let to = args.address()?;
                let amount = args.uint()?;
                let input = encode_call(
                    &TOKEN_ABI,
                    "transfer",
                    &[Token::Address(to), Token::Uint(amount)],
                )?;
                rt.call(token, &input)
            }
            _ => Err(unsupported(self, function)),
        }
    }
}
