// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

//! Spells are fixed-width 32-byte instruction words.
//!
//! A command word packs a function selector, a flags byte, six input slot
//! references, one output slot reference and the 20-byte address of the
//! target endpoint:
//!
//! ```text
//! | selector (4) | flags (1) | inputs (6) | output (1) | target (20) |
//! ```
//!
//! When the flags mark a command as extended, the following word is an
//! extension word carrying 31 input references and an output reference,
//! which take the place of the command's inline operands.

mod command;
mod cursor;
mod flags;
mod slot;

#[cfg(feature = "arb")]
mod arb;

pub use command::{Command, Extension, Operands, Selector};
pub use cursor::{DecodeError, Instruction, InstructionCursor};
pub use flags::{CallType, Flags};
pub use slot::{operand_refs, SlotRef, END_OF_ARGS};

/// Every spell, command or extension, occupies exactly one word.
pub const WORD_LEN: usize = 32;

/// Number of inline input references in a command word.
pub const COMMAND_INPUTS: usize = 6;

/// Number of input references in an extension word.
pub const EXTENSION_INPUTS: usize = 31;
