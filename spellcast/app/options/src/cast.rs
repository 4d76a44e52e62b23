// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct CastArgs {
    /// Path to a JSON file with the `spells` words and the initial `elements`.
    #[arg(long, short)]
    pub file: PathBuf,

    /// Print the outcome as a single line of JSON.
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}
