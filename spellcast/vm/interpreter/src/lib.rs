// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
//! Executes decoded spells against a [`Host`].
//!
//! Each instruction resolves its input slots from the [`ElementsTape`],
//! encodes them into a payload, dispatches it to the host in the frame its
//! call type prescribes, and optionally captures the result back into the
//! tape. The whole sequence runs inside one host checkpoint.
mod dispatch;
mod error;
mod exec;
mod host;
mod tape;

pub use dispatch::{dispatch, encode_payload, Invocation};
pub use error::{Anomaly, ExecError, InvokeError, Revert};
pub use exec::{execute, Halt, Outcome, SpellInterpreter};
pub use host::{CallFrame, Host};
pub use tape::{Element, ElementsTape, Operand, TapeError};
