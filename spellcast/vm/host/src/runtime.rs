// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::abi::{self, Event, Token};
use ethers_core::types::{Address, Bytes, H256, U256};
use spellcast_vm_interpreter::{CallFrame, InvokeError};

use crate::{LogEntry, MemoryHost};

/// What an endpoint can see and do while it runs.
///
/// Storage, balance and events all belong to the frame's context, which for
/// delegated code is the caller rather than the code's own address.
pub struct Runtime<'a> {
    host: &'a mut MemoryHost,
    frame: CallFrame,
}

impl<'a> Runtime<'a> {
    pub(crate) fn new(host: &'a mut MemoryHost, frame: CallFrame) -> Self {
        Self { host, frame }
    }

    /// The address the code acts as.
    pub fn this(&self) -> Address {
        self.frame.context
    }

    pub fn sender(&self) -> Address {
        self.frame.sender
    }

    /// Value received with the call; already credited to [`Runtime::this`].
    pub fn value(&self) -> U256 {
        self.frame.value
    }

    pub fn load(&self, key: H256) -> H256 {
        self.host.state().load(self.frame.context, key)
    }

    pub fn store(&mut self, key: H256, value: H256) -> Result<(), InvokeError> {
        self.ensure_writable("store")?;
        let cost = self.host.gas().costs().store;
        self.host.gas_mut().charge(cost)?;
        tracing::trace!(context = ?self.frame.context, key = ?key, value = ?value, "store");
        self.host.state_mut().store(self.frame.context, key, value);
        Ok(())
    }

    pub fn emit(&mut self, topics: Vec<H256>, data: Bytes) -> Result<(), InvokeError> {
        self.ensure_writable("emit")?;
        let cost = self.host.gas().costs().log;
        self.host.gas_mut().charge(cost)?;
        self.host.state_mut().emit(LogEntry {
            address: self.frame.context,
            topics,
            data,
        });
        Ok(())
    }

    /// Emit an ABI event; indexed parameters must be of a static type.
    pub fn emit_event(&mut self, event: &Event, values: Vec<Token>) -> Result<(), InvokeError> {
        let mut topics = vec![event.signature()];
        let mut data = Vec::new();
        for (param, value) in event.inputs.iter().zip(values) {
            if param.indexed {
                topics.push(H256::from_slice(&abi::encode(&[value])));
            } else {
                data.push(value);
            }
        }
        self.emit(topics, Bytes::from(abi::encode(&data)))
    }

    /// Call another endpoint as [`Runtime::this`].
    ///
    /// A read-only frame can only make read-only calls.
    pub fn call(&mut self, target: Address, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        let mut frame = CallFrame::call(self.this(), target);
        frame.read_only = self.frame.read_only;
        self.host.enter(frame, calldata)
    }

    /// Call another endpoint, sending `value` from [`Runtime::this`] along.
    pub fn call_with_value(
        &mut self,
        target: Address,
        value: U256,
        calldata: &[u8],
    ) -> Result<Bytes, InvokeError> {
        self.ensure_writable("transfer value")?;
        let frame = CallFrame::call(self.this(), target).with_value(value);
        self.host.enter(frame, calldata)
    }

    pub fn static_call(&mut self, target: Address, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        let frame = CallFrame::call(self.this(), target).read_only();
        self.host.enter(frame, calldata)
    }

    /// Deploy an allowed artifact at an address derived from our nonce.
    pub fn create(&mut self, value: U256, initcode: &[u8]) -> Result<Address, InvokeError> {
        let (this, read_only) = (self.this(), self.frame.read_only);
        self.host.create(this, value, initcode, None, read_only)
    }

    /// Deploy an allowed artifact at an address derived from the salt and the initcode.
    pub fn create2(
        &mut self,
        value: U256,
        initcode: &[u8],
        salt: H256,
    ) -> Result<Address, InvokeError> {
        let (this, read_only) = (self.this(), self.frame.read_only);
        self.host.create(this, value, initcode, Some(salt), read_only)
    }

    fn ensure_writable(&self, what: &str) -> Result<(), InvokeError> {
        if self.frame.read_only {
            Err(InvokeError::revert(format!("cannot {what} in a read-only frame")))
        } else {
            Ok(())
        }
    }
}
