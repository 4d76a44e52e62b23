// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use serde::{Deserialize, Serialize};

const CALL_TYPE_MASK: u8 = 0xC0;
const EXTENDED_BIT: u8 = 0x20;

/// Invocation mode, selected by the two high bits of the flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// Run the target's code with the caster's own identity and storage.
    Delegate = 0x00,
    /// Run the target's code in the target's own identity.
    Call = 0x40,
    /// Like [`CallType::Call`], with the first operand transferred as value.
    ValueCall = 0x80,
    /// Like [`CallType::Call`], but any state mutation fails the call.
    Static = 0xC0,
}

impl CallType {
    pub fn carries_value(&self) -> bool {
        matches!(self, Self::ValueCall)
    }
}

impl Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Delegate => "delegatecall",
            Self::Call => "call",
            Self::ValueCall => "valuecall",
            Self::Static => "staticcall",
        };
        write!(f, "{name}")
    }
}

/// The flags byte of a command word.
///
/// The call type bits and the extension bit are independent; the remaining
/// bits are reserved and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags {
    pub call_type: CallType,
    pub extended: bool,
}

impl Flags {
    pub fn new(call_type: CallType) -> Self {
        Self {
            call_type,
            extended: false,
        }
    }
}

impl From<u8> for Flags {
    fn from(b: u8) -> Self {
        let call_type = match b & CALL_TYPE_MASK {
            0x00 => CallType::Delegate,
            0x40 => CallType::Call,
            0x80 => CallType::ValueCall,
            _ => CallType::Static,
        };
        Self {
            call_type,
            extended: b & EXTENDED_BIT != 0,
        }
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> Self {
        let ext = if flags.extended { EXTENDED_BIT } else { 0 };
        flags.call_type as u8 | ext
    }
}
