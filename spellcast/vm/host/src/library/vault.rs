// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::Bytes;
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::{event, unsupported};
use crate::conv::{from_word, mapping_key, to_word};
use crate::endpoint::{word_result, Args};
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref VAULT_ABI: Abi = parse_abi(&[
        "function save() external payable",
        "function deposits(address who) external view returns (uint256)",
        "function withdraw(address to, uint256 amount) external",
        "event Received(address sender, uint256 amount)",
    ])
    .expect("vault ABI is valid");
}

/// Keeps native value and remembers who sent how much.
///
/// Depositors can send their savings on to any address.
pub struct Vault;

impl Endpoint for Vault {
    fn name(&self) -> &'static str {
        "Vault"
    }

    fn abi(&self) -> &Abi {
        &VAULT_ABI
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        match function.name.as_str() {
            "save" => {
                let (sender, value) = (rt.sender(), rt.value());
                if value.is_zero() {
                    return Err(InvokeError::revert("nothing to save"));
                }
                let key = mapping_key("deposit", sender);
                let total = from_word(&rt.load(key)).saturating_add(value);
                rt.store(key, to_word(total))?;
                rt.emit_event(
                    event(&VAULT_ABI, "Received")?,
                    vec![Token::Address(sender), Token::Uint(value)],
                )?;
                Ok(Bytes::default())
            }
            "deposits" => {
                let who = args.address()?;
                let total = from_word(&rt.load(mapping_key("deposit", who)));
                Ok(word_result(Token::Uint(total)))
            }
            "withdraw" => {
                let to = args.address()?;
                let amount = args.uint()?;
                let key = mapping_key("deposit", rt.sender());
                let total = from_word(&rt.load(key));
                let rest = total
                    .checked_sub(amount)
                    .ok_or_else(|| InvokeError::revert(format!("deposit too small: {total} < {amount}")))?;
                rt.call_with_value(to, amount, &[])?;
                rt.store(key, to_word(rest))?;
                Ok(Bytes::default())
            }
            _ => Err(unsupported(self, function)),
        }
    }
}
