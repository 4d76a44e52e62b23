// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use clap::Args;

#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// Only list the endpoint with this name.
    #[arg(long, short)]
    pub name: Option<String>,
}
