// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use ethers_core::types::{Address, H256};

use crate::{
    operand_refs, CallType, Flags, SlotRef, COMMAND_INPUTS, END_OF_ARGS, EXTENSION_INPUTS,
};

/// Four byte function identifier of the target endpoint.
pub type Selector = [u8; 4];

const FLAGS_AT: usize = 4;
const INPUTS_AT: usize = 5;
const OUTPUT_AT: usize = INPUTS_AT + COMMAND_INPUTS;
const TARGET_AT: usize = OUTPUT_AT + 1;

/// The operand references an instruction actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands<'a> {
    inputs: &'a [u8],
    output: u8,
}

impl<'a> Operands<'a> {
    /// Input references up to the first sentinel.
    pub fn inputs(&self) -> impl Iterator<Item = SlotRef> + 'a {
        operand_refs(self.inputs)
    }

    /// Where to capture the result; `None` means discard it.
    pub fn output(&self) -> Option<SlotRef> {
        SlotRef::from_byte(self.output)
    }
}

/// A decoded command word.
///
/// Decoding is total: every 32-byte word is some command. Nonsensical
/// combinations only surface when the command is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    pub selector: Selector,
    pub flags: Flags,
    pub inputs: [u8; COMMAND_INPUTS],
    pub output: u8,
    pub target: Address,
}

impl Command {
    /// A command without operands which discards its result.
    pub fn new(selector: Selector, call_type: CallType, target: Address) -> Self {
        Self {
            selector,
            flags: Flags::new(call_type),
            inputs: [END_OF_ARGS; COMMAND_INPUTS],
            output: END_OF_ARGS,
            target,
        }
    }

    /// Set the inline inputs.
    ///
    /// Panics if there are more than six; use an [`Extension`] for those.
    pub fn with_inputs(mut self, slots: &[SlotRef]) -> Self {
        assert!(
            slots.len() <= COMMAND_INPUTS,
            "a command word has room for {COMMAND_INPUTS} inputs"
        );
        slots.iter().for_each(assert_encodable);
        self.inputs = [END_OF_ARGS; COMMAND_INPUTS];
        for (i, s) in slots.iter().enumerate() {
            self.inputs[i] = s.to_byte();
        }
        self
    }

    pub fn with_output(mut self, slot: SlotRef) -> Self {
        assert_encodable(&slot);
        self.output = slot.to_byte();
        self
    }

    /// Mark the command as followed by an extension word.
    pub fn extended(mut self) -> Self {
        self.flags.extended = true;
        self
    }

    pub fn call_type(&self) -> CallType {
        self.flags.call_type
    }

    pub fn is_extended(&self) -> bool {
        self.flags.extended
    }

    /// The inline operands of the word itself.
    pub fn operands(&self) -> Operands<'_> {
        Operands {
            inputs: &self.inputs,
            output: self.output,
        }
    }

    pub fn decode(word: &H256) -> Self {
        let bz = word.as_bytes();

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&bz[..FLAGS_AT]);

        let mut inputs = [0u8; COMMAND_INPUTS];
        inputs.copy_from_slice(&bz[INPUTS_AT..OUTPUT_AT]);

        Self {
            selector,
            flags: Flags::from(bz[FLAGS_AT]),
            inputs,
            output: bz[OUTPUT_AT],
            target: Address::from_slice(&bz[TARGET_AT..]),
        }
    }

    pub fn encode(&self) -> H256 {
        let mut bz = [0u8; 32];
        bz[..FLAGS_AT].copy_from_slice(&self.selector);
        bz[FLAGS_AT] = self.flags.into();
        bz[INPUTS_AT..OUTPUT_AT].copy_from_slice(&self.inputs);
        bz[OUTPUT_AT] = self.output;
        bz[TARGET_AT..].copy_from_slice(self.target.as_bytes());
        H256(bz)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} 0x{} @ {:?}",
            self.flags.call_type,
            hex::encode(self.selector),
            self.target
        )?;
        if self.flags.extended {
            write!(f, " +ext")
        } else {
            write_operands(f, &self.operands())
        }
    }
}

/// A continuation word of an extended command.
///
/// Its operands replace the inline operands of the command it follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extension {
    pub inputs: [u8; EXTENSION_INPUTS],
    pub output: u8,
}

impl Extension {
    /// Panics if there are more than 31 inputs, or a slot can't be encoded.
    pub fn new(slots: &[SlotRef], output: Option<SlotRef>) -> Self {
        assert!(
            slots.len() <= EXTENSION_INPUTS,
            "an extension word has room for {EXTENSION_INPUTS} inputs"
        );
        slots.iter().chain(output.as_ref()).for_each(assert_encodable);
        let mut inputs = [END_OF_ARGS; EXTENSION_INPUTS];
        for (i, s) in slots.iter().enumerate() {
            inputs[i] = s.to_byte();
        }
        Self {
            inputs,
            output: output.map(SlotRef::to_byte).unwrap_or(END_OF_ARGS),
        }
    }

    pub fn operands(&self) -> Operands<'_> {
        Operands {
            inputs: &self.inputs,
            output: self.output,
        }
    }

    pub fn decode(word: &H256) -> Self {
        let bz = word.as_bytes();
        let mut inputs = [0u8; EXTENSION_INPUTS];
        inputs.copy_from_slice(&bz[..EXTENSION_INPUTS]);
        Self {
            inputs,
            output: bz[EXTENSION_INPUTS],
        }
    }

    pub fn encode(&self) -> H256 {
        let mut bz = [0u8; 32];
        bz[..EXTENSION_INPUTS].copy_from_slice(&self.inputs);
        bz[EXTENSION_INPUTS] = self.output;
        H256(bz)
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ext")?;
        write_operands(f, &self.operands())
    }
}

fn assert_encodable(slot: &SlotRef) {
    assert!(slot.is_encodable(), "slot {slot} has no reference byte");
}

fn write_operands(f: &mut std::fmt::Formatter<'_>, ops: &Operands) -> std::fmt::Result {
    let inputs = ops.inputs().map(|s| s.to_string()).collect::<Vec<_>>();
    write!(f, " ({})", inputs.join(", "))?;
    if let Some(out) = ops.output() {
        write!(f, " -> {out}")?;
    }
    Ok(())
}
