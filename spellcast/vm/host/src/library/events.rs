// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::Bytes;
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::{event, unsupported};
use crate::endpoint::Args;
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref EVENTS_ABI: Abi = parse_abi(&[
        "function emitString(string value) external",
        "function emitAddress(address value) external",
        "function emitUint(uint256 value) external",
        "event EmittedString(string value)",
        "event EmittedAddress(address value)",
        "event EmittedUint(uint256 value)",
    ])
    .expect("events ABI is valid");
}

/// Emits its argument as an event of the calling context.
pub struct EventEmitter;

impl Endpoint for EventEmitter {
    fn name(&self) -> &'static str {
        "EventEmitter"
    }

    fn abi(&self) -> &Abi {
        &EVENTS_ABI
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        let (name, value) = match function.name.as_str() {
            "emitString" => ("EmittedString", Token::String(args.string()?)),
            "emitAddress" => ("EmittedAddress", Token::Address(args.address()?)),
            "emitUint" => ("EmittedUint", Token::Uint(args.uint()?)),
            _ => return Err(unsupported(self, function)),
        };
        rt.emit_event(event(&EVENTS_ABI, name)?, vec![value])?;
        Ok(Bytes::default())
    }
}
