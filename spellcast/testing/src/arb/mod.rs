// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
mod eth;

pub use crate::arb::eth::{ArbAddress, ArbU256, ArbWord};
