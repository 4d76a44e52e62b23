// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::{Address, Bytes, U256};
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::{event, unsupported};
use crate::conv::{from_word, mapping_key, to_word, value_key};
use crate::endpoint::{word_result, Args};
use crate::{Endpoint, Runtime};

lazy_static! {
    pub static ref TOKEN_ABI: Abi = parse_abi(&[
        "function balanceOf(address who) external view returns (uint256)",
        "function totalSupply() external view returns (uint256)",
        "function transfer(address to, uint256 amount) external returns (bool)",
        "function mint(address to, uint256 amount) external",
        "event Transfer(address indexed from, address indexed to, uint256 amount)",
    ])
    .expect("token ABI is valid");
}

/// A fungible token with open minting.
pub struct SimpleToken;

fn balance_of(rt: &Runtime, who: Address) -> U256 {
    from_word(&rt.load(mapping_key("balance", who)))
}

fn set_balance(rt: &mut Runtime, who: Address, amount: U256) -> Result<(), InvokeError> {
    rt.store(mapping_key("balance", who), to_word(amount))
}

fn emit_transfer(rt: &mut Runtime, from: Address, to: Address, amount: U256) -> Result<(), InvokeError> {
    rt.emit_event(
        event(&TOKEN_ABI, "Transfer")?,
        vec![Token::Address(from), Token::Address(to), Token::Uint(amount)],
    )
}

impl Endpoint for SimpleToken {
    fn name(&self) -> &'static str {
        "SimpleToken"
    }

    fn abi(&self) -> &Abi {
        &TOKEN_ABI
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        match function.name.as_str() {
            "balanceOf" => {
                let who = args.address()?;
                Ok(word_result(Token::Uint(balance_of(rt, who))))
            }
            "totalSupply" => {
                let supply = from_word(&rt.load(value_key("totalSupply")));
                Ok(word_result(Token::Uint(supply)))
            }
            "transfer" => {
                let to = args.address()?;
                let amount = args.uint()?;
                let from = rt.sender();

                let available = balance_of(rt, from);
                let remaining = available.checked_sub(amount).ok_or_else(|| {
                    InvokeError::revert(format!(
                        "transfer amount {amount} exceeds balance {available}"
                    ))
                })?;

                set_balance(rt, from, remaining)?;
                let credited = balance_of(rt, to)
                    .checked_add(amount)
                    .ok_or_else(|| InvokeError::revert("balance overflow"))?;
                set_balance(rt, to, credited)?;

                emit_transfer(rt, from, to, amount)?;
                Ok(word_result(Token::Bool(true)))
            }
            "mint" => {
                let to = args.address()?;
                let amount = args.uint()?;

                let supply_key = value_key("totalSupply");
                let supply = from_word(&rt.load(supply_key))
                    .checked_add(amount)
                    .ok_or_else(|| InvokeError::revert("total supply overflow"))?;
                rt.store(supply_key, to_word(supply))?;

                let credited = balance_of(rt, to).saturating_add(amount);
                set_balance(rt, to, credited)?;

                emit_transfer(rt, Address::zero(), to, amount)?;
                Ok(Bytes::default())
            }
            _ => Err(unsupported(self, function)),
        }
    }
}
