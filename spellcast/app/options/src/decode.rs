// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use clap::Args;
use ethers_core::types::H256;

use crate::parse::parse_word;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex encoded 32 byte spell words.
    #[arg(value_parser = parse_word, required_unless_present = "file")]
    pub words: Vec<H256>,

    /// Read the `spells` of a JSON spell file instead.
    #[arg(long, short, conflicts_with = "words")]
    pub file: Option<PathBuf>,
}
