// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::Bytes;
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::unsupported;
use crate::endpoint::{word_result, Args};
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref DEPLOY_ABI: Abi = parse_abi(&[
        "function cast(uint256 value, bytes initcode) external returns (address)",
        "function cast(uint256 value, bytes initcode, bytes32 salt) external returns (address)",
    ])
    .expect("deploy ABI is valid");
}

/// Deploys artifacts on behalf of the delegating account.
pub struct Deployer;

impl Endpoint for Deployer {
    fn name(&self) -> &'static str {
        "Deployer"
    }

    fn abi(&self) -> &Abi {
        &DEPLOY_ABI
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        if function.name != "cast" {
            return Err(unsupported(self, function));
        }
        let value = args.uint()?;
        let initcode = args.bytes()?;

        let addr = if args.is_empty() {
            rt.create(value, &initcode)?
        } else {
            let salt = args.word()?;
            rt.create2(value, &initcode, salt)?
        };

        tracing::debug!(deployer = ?rt.this(), addr = ?addr, "deployed artifact");

        Ok(word_result(Token::Address(addr)))
    }
}
