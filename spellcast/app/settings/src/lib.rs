// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use ethers_core::types::Address;
use serde::Deserialize;

/// The identity spells are cast as, and what it starts out with in the demo world.
#[derive(Debug, Deserialize, Clone)]
pub struct CasterSettings {
    pub address: Address,
    /// Native balance.
    pub balance: u64,
    /// Balance of the library token.
    pub tokens: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HostSettings {
    /// Gas available to a whole cast; unlimited if missing.
    pub budget: Option<u64>,
    /// Maximum nesting of call frames.
    pub max_depth: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub caster: CasterSettings,
    pub host: HostSettings,
}

impl Settings {
    /// Load the default configuration from a directory,
    /// then potential overrides specific to the run mode,
    /// then overrides from the local environment.
    pub fn new(config_dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let c = Config::builder()
            .add_source(File::from(config_dir.join("default")))
            // Optional mode specific overrides, checked into git.
            .add_source(File::from(config_dir.join(run_mode)).required(false))
            // Optional local overrides, not checked into git.
            .add_source(File::from(config_dir.join("local")).required(false))
            // Add in settings from the environment (with a prefix of SPELLCAST)
            // e.g. `SPELLCAST__HOST__BUDGET=100000 ./target/spellcast cast --file spells.json`
            .add_source(
                Environment::with_prefix("spellcast")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        c.try_deserialize()
    }
}
