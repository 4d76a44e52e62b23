// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

//! CLI command implementations.

use anyhow::{anyhow, Context};
use spellcast_app::options::{Commands, Options};
use spellcast_app::settings::Settings;

pub mod cast;
pub mod decode;
pub mod library;

pub trait Cmd {
    fn exec(&self, settings: Settings) -> anyhow::Result<()>;
}

/// Convenience macro to simplify declaring commands that either need or don't need settings.
///
/// ```text
/// cmd! {
///   <type-name>(self, settings) {
///     <exec-body>
///   }
/// }
/// ```
#[macro_export]
macro_rules! cmd {
    // A command which needs access to the settings.
    ($name:ident($self:ident, $settings:ident) $exec:expr) => {
        impl $crate::cmd::Cmd for $name {
            fn exec(&$self, $settings: spellcast_app::settings::Settings) -> anyhow::Result<()> {
                $exec
            }
        }
    };
}

/// Execute the command specified in the options.
pub fn exec(opts: &Options) -> anyhow::Result<()> {
    match &opts.command {
        Commands::Cast(args) => args.exec(settings(opts)?),
        Commands::Decode(args) => decode::exec(args),
        Commands::Library(args) => library::exec(args),
    }
}

/// Try to parse the settings in the configuration directory.
fn settings(opts: &Options) -> anyhow::Result<Settings> {
    let config_dir = opts.config_dir.as_path();
    if !config_dir.exists() {
        return Err(anyhow!("config '{config_dir:?}' does not exist"));
    }
    if !config_dir.is_dir() {
        return Err(anyhow!("config '{config_dir:?}' is a not a directory"));
    }

    let settings = Settings::new(config_dir, &opts.mode).context("error parsing settings")?;

    Ok(settings)
}
