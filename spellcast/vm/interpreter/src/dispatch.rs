// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{self, Token};
use ethers_core::types::{Address, Bytes, U256};
use spellcast_vm_spell::{CallType, Selector};

use crate::{CallFrame, Host, InvokeError, Operand};

/// A fully resolved call, ready to be handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub call_type: CallType,
    pub target: Address,
    pub selector: Selector,
    /// Zero unless the call type carries value.
    pub value: U256,
    pub args: Vec<Operand<'a>>,
}

impl<'a> Invocation<'a> {
    /// The frame this invocation runs in when issued by `acting_as`.
    pub fn frame(&self, acting_as: Address) -> CallFrame {
        match self.call_type {
            CallType::Delegate => CallFrame::delegate(acting_as, self.target),
            CallType::Call => CallFrame::call(acting_as, self.target),
            CallType::ValueCall => CallFrame::call(acting_as, self.target).with_value(self.value),
            CallType::Static => CallFrame::call(acting_as, self.target).read_only(),
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        encode_payload(self.selector, &self.args)
    }
}

/// Selector followed by the ABI encoding of the arguments.
///
/// Static operands go into the head as they are. Dynamic operands go into
/// the tail as `bytes`: the head gets the offset, the tail the length and
/// the content padded to a whole number of words.
pub fn encode_payload(selector: Selector, args: &[Operand]) -> Vec<u8> {
    let tokens = args
        .iter()
        .map(|arg| match arg {
            Operand::Word(w) => Token::FixedBytes(w.as_bytes().to_vec()),
            Operand::Blob(b) => Token::Bytes(b.to_vec()),
        })
        .collect::<Vec<_>>();

    let mut payload = selector.to_vec();
    payload.extend(abi::encode(&tokens));
    payload
}

/// Send an invocation to the host on behalf of `acting_as`.
pub fn dispatch<H: Host + ?Sized>(
    host: &mut H,
    acting_as: Address,
    invocation: &Invocation,
) -> Result<Bytes, InvokeError> {
    let frame = invocation.frame(acting_as);
    let payload = invocation.payload();

    tracing::debug!(
        call_type = %invocation.call_type,
        target = ?invocation.target,
        selector = %hex::encode(invocation.selector),
        value = %invocation.value,
        payload_len = payload.len(),
        "dispatching invocation"
    );

    host.invoke(frame, &payload)
}
