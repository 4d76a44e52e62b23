// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use self::{cast::CastArgs, decode::DecodeArgs, library::LibraryArgs};

pub mod cast;
pub mod decode;
pub mod library;
mod parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug)]
#[command(version)]
pub struct Options {
    /// Directory with the settings files; defaults to `config` under the current directory.
    #[arg(long, env = "SPELLCAST_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Optional mode, which selects an extra `<mode>.toml` settings file on top of the defaults.
    #[arg(long, short, default_value = "dev", env = "SPELLCAST_MODE")]
    pub mode: String,

    /// Set the logging level.
    #[arg(long, default_value = "info", value_enum, env = "SPELLCAST_LOG_LEVEL")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

impl Options {
    /// Tracing level, unless it's turned off.
    pub fn tracing_level(&self) -> Option<Level> {
        match self.log_level {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cast the spells of a JSON file against a freshly funded demo world.
    Cast(CastArgs),
    /// Print the instructions encoded by spell words.
    Decode(DecodeArgs),
    /// List the library endpoints and the selectors of their functions.
    Library(LibraryArgs),
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tracing::Level;

    use crate::{Commands, LogLevel, Options};

    #[test]
    fn parse_cast() {
        let opts = Options::parse_from([
            "spellcast",
            "--log-level",
            "debug",
            "cast",
            "--file",
            "spells.json",
        ]);
        assert_eq!(opts.log_level, LogLevel::Debug);
        assert_eq!(opts.tracing_level(), Some(Level::DEBUG));
        assert_eq!(opts.mode, "dev");
        match opts.command {
            Commands::Cast(args) => assert_eq!(args.file.to_string_lossy(), "spells.json"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn logging_can_be_turned_off() {
        let opts = Options::parse_from(["spellcast", "--log-level", "off", "library"]);
        assert_eq!(opts.tracing_level(), None);
    }
}
