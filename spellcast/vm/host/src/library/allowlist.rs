// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::{Address, Bytes, H256};
use lazy_static::lazy_static;
use spellcast_vm_interpreter::InvokeError;

use super::unsupported;
use crate::conv::{mapping_key, value_key};
use crate::endpoint::{word_result, Args};
use crate::{Endpoint, Runtime};

/// The initcode which deploys an [`Allowlist`].
pub const ALLOWLIST_INITCODE: &[u8] = b"spellcast:artifact:allowlist:v1";

lazy_static! {
    pub static ref ALLOWLIST_ABI: Abi = parse_abi(&[
        "function owner() external view returns (address)",
        "function allow(address who) external",
        "function isAllowed(address who) external view returns (bool)",
    ])
    .expect("allowlist ABI is valid");
}

/// A set of addresses managed by whoever deployed it.
pub struct Allowlist;

fn owner(rt: &Runtime) -> Address {
    Address::from(rt.load(value_key("owner")))
}

impl Endpoint for Allowlist {
    fn name(&self) -> &'static str {
        "Allowlist"
    }

    fn abi(&self) -> &Abi {
        &ALLOWLIST_ABI
    }

    fn construct(&self, rt: &mut Runtime) -> Result<(), InvokeError> {
        let creator = rt.sender();
        rt.store(value_key("owner"), H256::from(creator))
    }

    fn call(&self, rt: &mut Runtime, function: &Function, mut args: Args) -> Result<Bytes, InvokeError> {
        match function.name.as_str() {
            "owner" => Ok(word_result(Token::Address(owner(rt)))),
            "allow" => {
                let who = args.address()?;
                if rt.sender() != owner(rt) {
                    return Err(InvokeError::revert("only the owner can allow"));
                }
                rt.store(mapping_key("allowed", who), H256::from_low_u64_be(1))?;
                Ok(Bytes::default())
            }
            "isAllowed" => {
                let who = args.address()?;
                let allowed = !rt.load(mapping_key("allowed", who)).is_zero();
                Ok(word_result(Token::Bool(allowed)))
            }
            _ => Err(unsupported(self, function)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::abi::Token;
    use ethers_core::types::{Address, H256, U256};
    use spellcast_vm_interpreter::{CallFrame, Host, InvokeError};

    use crate::library::{encode_call, Library, ALLOWLIST_ABI, ALLOWLIST_INITCODE, DEPLOY_ABI, DEPLOY_ADDR};
    use crate::MemoryHost;

    #[test]
    fn deployer_owns_the_allowlist() {
        let caster = Address::repeat_byte(0xCA);
        let stranger = Address::repeat_byte(0x5E);
        let mut host = MemoryHost::new();
        Library::install(&mut host);

        let deploy = encode_call(
            &DEPLOY_ABI,
            "cast",
            &[Token::Uint(U256::zero()), Token::Bytes(ALLOWLIST_INITCODE.to_vec())],
        )
        .unwrap();
        let out = host
            .invoke(CallFrame::delegate(caster, DEPLOY_ADDR), &deploy)
            .unwrap();
        let list = Address::from(H256::from_slice(&out));

        let input = encode_call(&ALLOWLIST_ABI, "owner", &[]).unwrap();
        let out = host
            .invoke(CallFrame::call(stranger, list).read_only(), &input)
            .unwrap();
        assert_eq!(Address::from(H256::from_slice(&out)), caster);

        let allow = encode_call(&ALLOWLIST_ABI, "allow", &[Token::Address(stranger)]).unwrap();
        let res = host.invoke(CallFrame::call(stranger, list), &allow);
        assert!(matches!(res, Err(InvokeError::Revert(_))));
        host.invoke(CallFrame::call(caster, list), &allow).unwrap();

        let check = encode_call(&ALLOWLIST_ABI, "isAllowed", &[Token::Address(stranger)]).unwrap();
        let out = host
            .invoke(CallFrame::call(caster, list).read_only(), &check)
            .unwrap();
        assert_eq!(U256::from_big_endian(&out), U256::one());
    }
}
