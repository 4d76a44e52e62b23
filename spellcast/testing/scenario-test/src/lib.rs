// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
//! Shared setup for running spells against a world with the library installed.

use ethers_core::abi::{self, Abi, ParamType, Token};
use ethers_core::types::{Address, Bytes, H160, H256, U256};
use spellcast_vm_host::conv::to_word;
use spellcast_vm_host::library::{encode_call, Library, TOKEN_ABI, TOKEN_ADDR};
use spellcast_vm_host::{LogEntry, MemoryHost};
use spellcast_vm_interpreter::{CallFrame, Element, ExecError, Host, Outcome, SpellInterpreter};
use spellcast_vm_spell::Selector;

pub const CASTER: Address = H160([0xCA; 20]);
pub const RECIPIENT: Address = H160([0xBE; 20]);

/// Initial native balance of the caster.
pub const CASTER_BALANCE: u64 = 1_000;
/// Initial token balance of the caster.
pub const CASTER_TOKENS: u64 = 100;

/// A host with the library installed and the caster funded with both
/// native value and tokens.
pub fn new_world() -> MemoryHost {
    let mut host = MemoryHost::new();
    Library::install(&mut host);
    host.fund(CASTER, U256::from(CASTER_BALANCE));
    mint(&mut host, CASTER, U256::from(CASTER_TOKENS));
    host
}

pub fn mint(host: &mut MemoryHost, to: Address, amount: U256) {
    let input = encode_call(&TOKEN_ABI, "mint", &[Token::Address(to), Token::Uint(amount)])
        .expect("mint calldata");
    host.invoke(CallFrame::call(to, TOKEN_ADDR), &input)
        .expect("mint succeeds");
}

pub fn token_balance(host: &mut MemoryHost, who: Address) -> U256 {
    let input = encode_call(&TOKEN_ABI, "balanceOf", &[Token::Address(who)])
        .expect("balanceOf calldata");
    let out = host
        .invoke(CallFrame::call(who, TOKEN_ADDR).read_only(), &input)
        .expect("balanceOf succeeds");
    U256::from_big_endian(&out)
}

/// Execute spells on behalf of the caster.
pub fn cast(host: &mut MemoryHost, spells: &[H256], elements: Vec<Element>) -> Result<Outcome, ExecError> {
    cast_as(host, CASTER, spells, elements)
}

pub fn cast_as(
    host: &mut MemoryHost,
    caster: Address,
    spells: &[H256],
    elements: Vec<Element>,
) -> Result<Outcome, ExecError> {
    SpellInterpreter::new(caster).execute(host, spells, elements)
}

/// Selector of a function; with overloads, the one taking `inputs` arguments.
pub fn selector(abi: &Abi, name: &str, inputs: usize) -> Selector {
    abi.functions_by_name(name)
        .expect("function exists")
        .iter()
        .find(|f| f.inputs.len() == inputs)
        .expect("overload exists")
        .short_signature()
}

pub fn word(n: u64) -> Element {
    Element::Static(to_word(U256::from(n)))
}

pub fn address(addr: Address) -> Element {
    Element::Static(H256::from(addr))
}

pub fn blob(content: impl Into<Vec<u8>>) -> Element {
    Element::Dynamic(Bytes::from(content.into()))
}

/// Logs of an event emitted by `address`, decoded.
pub fn events(host: &MemoryHost, abi: &Abi, name: &str, address: Address) -> Vec<Vec<Token>> {
    let event = abi.event(name).expect("event exists");
    let params = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| p.kind.clone())
        .collect::<Vec<ParamType>>();

    host.state()
        .logs()
        .filter(|log: &&LogEntry| log.address == address && log.topics.first() == Some(&event.signature()))
        .map(|log| abi::decode(&params, &log.data).expect("event data decodes"))
        .collect()
}
