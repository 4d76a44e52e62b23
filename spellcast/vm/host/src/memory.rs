// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use ethers_core::types::{Address, Bytes, H256, U256};
use ethers_core::utils::{get_contract_address, get_create2_address};
use spellcast_vm_interpreter::{CallFrame, Host, InvokeError};
use spellcast_vm_spell::Selector;

use crate::endpoint::{lookup, Args};
use crate::{Artifact, Artifacts, Endpoint, GasMeter, Runtime, WorldState};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A [`Host`] keeping the whole world in memory.
///
/// Every frame runs inside its own checkpoint, so a failing nested call
/// only discards its own effects, and the caller decides what to do next.
///
/// The gas budget applies to each outermost run: a checkpoint or invocation
/// opened while no other checkpoint is open starts with a full budget.
#[derive(Debug)]
pub struct MemoryHost {
    state: WorldState,
    checkpoints: Vec<WorldState>,
    artifacts: Artifacts,
    gas: GasMeter,
    depth: usize,
    max_depth: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            state: WorldState::default(),
            checkpoints: Vec::new(),
            artifacts: Artifacts::default(),
            gas: GasMeter::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas(mut self, gas: GasMeter) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    pub fn gas(&self) -> &GasMeter {
        &self.gas
    }

    pub fn gas_mut(&mut self) -> &mut GasMeter {
        &mut self.gas
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Put code at an address directly, bypassing creation.
    pub fn install(&mut self, addr: Address, code: Arc<dyn Endpoint>) {
        tracing::debug!(addr = ?addr, endpoint = code.name(), "installing endpoint");
        self.state.set_code(addr, code);
    }

    pub fn fund(&mut self, addr: Address, amount: U256) {
        self.state.credit(addr, amount);
    }

    /// Allow an artifact to be deployed.
    pub fn allow(&mut self, artifact: Artifact) -> H256 {
        self.artifacts.register(artifact)
    }

    /// Number of open checkpoints.
    pub fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Enter a new frame; the effects of the frame are kept only if it succeeds.
    pub(crate) fn enter(&mut self, frame: CallFrame, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        self.gas.charge_call(calldata.len())?;
        self.nested(|host| host.run(frame, calldata))
    }

    pub(crate) fn create(
        &mut self,
        creator: Address,
        value: U256,
        initcode: &[u8],
        salt: Option<H256>,
        read_only: bool,
    ) -> Result<Address, InvokeError> {
        if read_only {
            return Err(InvokeError::revert("cannot create in a read-only frame"));
        }
        let cost = self.gas.costs().create;
        self.gas.charge(cost)?;

        let artifact = self
            .artifacts
            .find(initcode)
            .cloned()
            .ok_or_else(|| InvokeError::revert("initcode is not an allowed artifact"))?;

        let nonce = self.state.bump_nonce(creator);
        let addr = match salt {
            None => get_contract_address(creator, nonce),
            Some(salt) => get_create2_address(creator, salt.as_bytes(), initcode),
        };

        if self.state.is_occupied(&addr) {
            return Err(InvokeError::revert(format!("address {addr:?} is already in use")));
        }

        let frame = CallFrame::call(creator, addr).with_value(value);

        self.nested(|host| {
            host.state.set_code(addr, artifact.code.clone());
            // A fresh contract starts at nonce 1.
            host.state.bump_nonce(addr);
            if !value.is_zero() {
                host.state.transfer(creator, addr, value)?;
            }
            artifact.code.construct(&mut Runtime::new(host, frame))
        })?;

        tracing::trace!(
            creator = ?creator,
            addr = ?addr,
            endpoint = artifact.code.name(),
            "created endpoint"
        );

        Ok(addr)
    }

    /// Run `f` one level deeper, in a checkpoint of its own.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, InvokeError>,
    ) -> Result<T, InvokeError> {
        if self.depth >= self.max_depth {
            return Err(InvokeError::revert("call depth limit reached"));
        }
        self.save();
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        match res {
            Ok(_) => self.commit(),
            Err(_) => self.revert(),
        }
        res
    }

    fn save(&mut self) {
        self.checkpoints.push(self.state.clone());
    }

    /// Refill the budget if nothing is in progress.
    fn begin_run(&mut self) {
        if self.checkpoints.is_empty() {
            self.gas.reset();
        }
    }

    fn run(&mut self, frame: CallFrame, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        if !frame.value.is_zero() {
            if frame.read_only {
                return Err(InvokeError::revert("cannot transfer value in a read-only frame"));
            }
            self.state.transfer(frame.sender, frame.context, frame.value)?;
        }

        // Plain accounts accept anything and return nothing.
        let code = match self.state.code(&frame.code) {
            Some(code) => code,
            None => return Ok(Bytes::default()),
        };

        if calldata.len() < 4 {
            return Err(InvokeError::revert(format!(
                "{} has no fallback",
                code.name()
            )));
        }
        let mut selector: Selector = [0u8; 4];
        selector.copy_from_slice(&calldata[..4]);

        let function = lookup(code.abi(), selector).ok_or_else(|| {
            InvokeError::revert(format!(
                "{} has no function 0x{}",
                code.name(),
                hex::encode(selector)
            ))
        })?;
        let args = Args::decode(function, &calldata[4..])?;

        tracing::trace!(
            endpoint = code.name(),
            function = %function.name,
            context = ?frame.context,
            sender = ?frame.sender,
            depth = self.depth,
            "entering endpoint"
        );

        code.call(&mut Runtime::new(self, frame), function, args)
    }
}

impl Host for MemoryHost {
    fn invoke(&mut self, frame: CallFrame, calldata: &[u8]) -> Result<Bytes, InvokeError> {
        self.begin_run();
        self.enter(frame, calldata)
    }

    fn checkpoint(&mut self) {
        self.begin_run();
        self.save();
    }

    fn commit(&mut self) {
        if self.checkpoints.pop().is_none() {
            tracing::warn!("commit without a checkpoint");
        }
    }

    fn revert(&mut self) {
        match self.checkpoints.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("revert without a checkpoint"),
        }
    }
}
