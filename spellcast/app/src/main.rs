// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use clap::Parser;
use spellcast_app::options::Options;
use tracing_subscriber::FmtSubscriber;

mod cmd;

fn main() {
    let opts = Options::parse();

    if let Some(level) = opts.tracing_level() {
        // Log events to stderr, leaving stdout for the command output.
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    }

    if let Err(e) = cmd::exec(&opts) {
        tracing::error!("failed to execute {:?}: {e:?}", opts.command);
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
