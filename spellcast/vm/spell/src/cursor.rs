// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use ethers_core::types::H256;
use thiserror::Error;

use crate::{Command, Extension, Operands};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The command at `position` has the extension bit set but it is the last word.
    #[error("spell {position} is extended but no extension word follows")]
    MissingExtension { position: usize },
}

/// One instruction: a command word, and its extension word if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Index of the command word in the spell sequence.
    pub position: usize,
    pub command: Command,
    pub extension: Option<Extension>,
}

impl Instruction {
    /// The operands in effect: the extension's if there is one, otherwise the command's own.
    pub fn operands(&self) -> Operands<'_> {
        match self.extension {
            Some(ref ext) => ext.operands(),
            None => self.command.operands(),
        }
    }

    /// Number of words this instruction occupies.
    pub fn width(&self) -> usize {
        if self.extension.is_some() {
            2
        } else {
            1
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>4}: {}", self.position, self.command)?;
        if let Some(ref ext) = self.extension {
            write!(f, "\n{:>4}: {}", self.position + 1, ext)?;
        }
        Ok(())
    }
}

/// Walks a spell sequence, one instruction (one or two words) at a time.
#[derive(Debug, Clone)]
pub struct InstructionCursor<'a> {
    spells: &'a [H256],
    position: usize,
}

impl<'a> InstructionCursor<'a> {
    pub fn new(spells: &'a [H256]) -> Self {
        Self {
            spells,
            position: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.spells.len()
    }
}

impl<'a> Iterator for InstructionCursor<'a> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position;
        let word = self.spells.get(position)?;
        let command = Command::decode(word);

        if !command.is_extended() {
            self.position += 1;
            return Some(Ok(Instruction {
                position,
                command,
                extension: None,
            }));
        }

        match self.spells.get(position + 1) {
            None => {
                // Nothing sensible can follow a broken instruction.
                self.position = self.spells.len();
                Some(Err(DecodeError::MissingExtension { position }))
            }
            Some(word) => {
                self.position += 2;
                Some(Ok(Instruction {
                    position,
                    command,
                    extension: Some(Extension::decode(word)),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::Address;

    use super::{DecodeError, InstructionCursor};
    use crate::{CallType, Command, Extension, SlotRef};

    fn cmd() -> Command {
        Command::new([0xde, 0xad, 0xbe, 0xef], CallType::Delegate, Address::zero())
    }

    #[test]
    fn consumes_one_or_two_words() {
        let spells = vec![
            cmd().with_inputs(&[SlotRef::Static(0)]).encode(),
            cmd().extended().encode(),
            Extension::new(&[SlotRef::Dynamic(3)], None).encode(),
            cmd().encode(),
        ];

        let instrs = InstructionCursor::new(&spells)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(instrs.len(), 3);
        assert_eq!(
            instrs.iter().map(|i| i.position).collect::<Vec<_>>(),
            vec![0, 1, 3]
        );
        assert_eq!(instrs[1].width(), 2);
        assert_eq!(
            instrs[1].operands().inputs().collect::<Vec<_>>(),
            vec![SlotRef::Dynamic(3)]
        );
    }

    #[test]
    fn extension_replaces_inline_operands() {
        let spells = vec![
            cmd()
                .with_inputs(&[SlotRef::Dynamic(1), SlotRef::Dynamic(2)])
                .with_output(SlotRef::Static(9))
                .extended()
                .encode(),
            Extension::new(&[SlotRef::Dynamic(0)], Some(SlotRef::Dynamic(5))).encode(),
        ];

        let instr = InstructionCursor::new(&spells).next().unwrap().unwrap();
        let ops = instr.operands();

        assert_eq!(ops.inputs().collect::<Vec<_>>(), vec![SlotRef::Dynamic(0)]);
        assert_eq!(ops.output(), Some(SlotRef::Dynamic(5)));
    }

    #[test]
    fn missing_extension() {
        let spells = vec![cmd().encode(), cmd().extended().encode()];
        let mut cursor = InstructionCursor::new(&spells);

        assert!(cursor.next().unwrap().is_ok());
        assert_eq!(
            cursor.next().unwrap(),
            Err(DecodeError::MissingExtension { position: 1 })
        );
        assert!(cursor.next().is_none());
        assert!(cursor.is_done());
    }
}
