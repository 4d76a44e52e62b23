// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
//! An in-memory [`Host`](spellcast_vm_interpreter::Host) for spells.
//!
//! The world is a set of accounts with balances, nonces and optional native
//! [`Endpoint`] code, per-account word storage and an event log. All of it
//! lives in persistent collections so that every frame can be checkpointed.
pub mod conv;
mod endpoint;
mod gas;
pub mod library;
mod memory;
mod runtime;
mod state;

pub use endpoint::{calldata, lookup, word_result, Args, Artifact, Artifacts, Endpoint};
pub use gas::{GasCosts, GasMeter};
pub use memory::{MemoryHost, DEFAULT_MAX_DEPTH};
pub use runtime::Runtime;
pub use state::{LogEntry, WorldState};
