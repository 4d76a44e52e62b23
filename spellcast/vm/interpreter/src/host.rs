// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::types::{Address, Bytes, U256};

use crate::InvokeError;

/// Which code runs, as whom, and on behalf of which caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Account whose code is executed.
    pub code: Address,
    /// Account whose storage, balance and identity the code acts with.
    pub context: Address,
    /// The immediate caller, as seen by the code.
    pub sender: Address,
    /// Native value moved from `sender` to `context` before the code runs.
    pub value: U256,
    /// Mutations inside this frame, and any frame below it, are refused.
    pub read_only: bool,
}

impl CallFrame {
    /// Run the code of `target` in its own context.
    pub fn call(sender: Address, target: Address) -> Self {
        Self {
            code: target,
            context: target,
            sender,
            value: U256::zero(),
            read_only: false,
        }
    }

    /// Borrow the code of `target` and run it as `acting_as`.
    pub fn delegate(acting_as: Address, target: Address) -> Self {
        Self {
            code: target,
            context: acting_as,
            sender: acting_as,
            value: U256::zero(),
            read_only: false,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// The environment the interpreter dispatches invocations into.
///
/// Checkpoints nest; every `checkpoint` is matched by exactly one `commit`
/// or `revert`, which respectively keeps or discards whatever the host
/// changed since.
pub trait Host {
    /// Run `calldata` in the given frame and return the raw result.
    ///
    /// A failed invocation must leave no trace of its own effects.
    fn invoke(&mut self, frame: CallFrame, calldata: &[u8]) -> Result<Bytes, InvokeError>;

    fn checkpoint(&mut self);

    fn commit(&mut self);

    fn revert(&mut self);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn invoke(&mut self, frame: CallFrame, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        (**self).invoke(frame, calldata)
    }

    fn checkpoint(&mut self) {
        (**self).checkpoint()
    }

    fn commit(&mut self) {
        (**self).commit()
    }

    fn revert(&mut self) {
        (**self).revert()
    }
}
