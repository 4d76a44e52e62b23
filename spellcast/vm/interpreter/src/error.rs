// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use ethers_core::types::Bytes;
use spellcast_vm_spell::{DecodeError, SlotRef};
use thiserror::Error;

use crate::TapeError;

/// The data an endpoint reverted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revert(pub Bytes);

impl Revert {
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(Bytes::from(msg.into().into_bytes()))
    }

    pub fn data(&self) -> &Bytes {
        &self.0
    }
}

impl Display for Revert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if !s.is_empty() && !s.chars().any(char::is_control) => write!(f, "{s}"),
            Ok(s) if s.is_empty() => write!(f, "<empty>"),
            _ => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

/// Why the host could not complete an invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("reverted: {0}")]
    Revert(Revert),
    #[error("resource budget exhausted")]
    Exhausted,
}

impl InvokeError {
    pub fn revert(msg: impl Into<String>) -> Self {
        Self::Revert(Revert::msg(msg))
    }
}

/// A malformed spell, or a result that cannot be fitted into its output slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("value call without a value operand")]
    MissingValue,
    #[error("value operand {0} is not a static slot")]
    DynamicValue(SlotRef),
    #[error("result of {0} bytes is too short for a static slot")]
    ShortReturn(usize),
}

/// Why an execution aborted; every variant carries the position of the command word.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("decode anomaly at spell {position}: {anomaly}")]
    DecodeAnomaly { position: usize, anomaly: Anomaly },
    #[error("slot out of range at spell {position}: {error}")]
    SlotOutOfRange { position: usize, error: TapeError },
    #[error("invocation failed at spell {position}: {reason}")]
    InvocationFailure { position: usize, reason: Revert },
    #[error("resources exhausted at spell {position}")]
    ResourceExhausted { position: usize },
}

impl ExecError {
    pub fn position(&self) -> usize {
        match self {
            ExecError::DecodeAnomaly { position, .. }
            | ExecError::SlotOutOfRange { position, .. }
            | ExecError::InvocationFailure { position, .. }
            | ExecError::ResourceExhausted { position } => *position,
        }
    }

    pub(crate) fn from_invoke(position: usize, e: InvokeError) -> Self {
        match e {
            InvokeError::Revert(reason) => ExecError::InvocationFailure { position, reason },
            InvokeError::Exhausted => ExecError::ResourceExhausted { position },
        }
    }

    pub(crate) fn from_tape(position: usize, e: TapeError) -> Self {
        match e {
            TapeError::ShortWord { len, .. } => ExecError::DecodeAnomaly {
                position,
                anomaly: Anomaly::ShortReturn(len),
            },
            error => ExecError::SlotOutOfRange { position, error },
        }
    }
}

impl From<DecodeError> for ExecError {
    fn from(e: DecodeError) -> Self {
        let position = match e {
            DecodeError::MissingExtension { position } => position,
        };
        ExecError::DecodeAnomaly {
            position,
            anomaly: Anomaly::Decode(e),
        }
    }
}
