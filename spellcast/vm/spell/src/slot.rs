// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Reference byte meaning "no operand here" in an input position, and
/// "discard the result" in an output position.
pub const END_OF_ARGS: u8 = 0xFF;

const DYNAMIC_BIT: u8 = 0x80;
const INDEX_MASK: u8 = 0x7F;

/// A decoded slot reference into the elements tape.
///
/// Static and dynamic slots live in independent index spaces, told apart
/// only by the high bit of the reference byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRef {
    /// A single 32-byte word.
    Static(u8),
    /// A variable length blob.
    Dynamic(u8),
}

impl SlotRef {
    /// Decode a reference byte; `None` for the sentinel.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            END_OF_ARGS => None,
            b if b & DYNAMIC_BIT != 0 => Some(Self::Dynamic(b & INDEX_MASK)),
            b => Some(Self::Static(b)),
        }
    }

    /// Whether the reference survives encoding: static indices need to fit
    /// in seven bits, and `Dynamic(127)` would collide with the sentinel.
    pub fn is_encodable(&self) -> bool {
        match self {
            Self::Static(i) => *i & DYNAMIC_BIT == 0,
            Self::Dynamic(i) => *i < INDEX_MASK,
        }
    }

    /// Encode the reference as a byte.
    ///
    /// Indices are truncated to seven bits; see [`SlotRef::is_encodable`].
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Static(i) => i & INDEX_MASK,
            Self::Dynamic(i) => DYNAMIC_BIT | (i & INDEX_MASK),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Static(i) | Self::Dynamic(i) => *i as usize,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(i) => write!(f, "s{i}"),
            Self::Dynamic(i) => write!(f, "d{i}"),
        }
    }
}

/// Decode a list of input reference bytes, stopping at the first sentinel.
///
/// Bytes after the first `0xFF` are ignored even if they look like valid
/// references.
pub fn operand_refs(bytes: &[u8]) -> impl Iterator<Item = SlotRef> + '_ {
    bytes.iter().map_while(|b| SlotRef::from_byte(*b))
}
