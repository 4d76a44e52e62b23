// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::Context;
use spellcast_app::options::cast::CastArgs;
use spellcast_app::report::CastReport;
use spellcast_app::spell_file::SpellFile;
use spellcast_app::world::demo_world;
use spellcast_vm_interpreter::SpellInterpreter;

use crate::cmd;

cmd! {
  CastArgs(self, settings) {
    let file = SpellFile::read(&self.file)?;
    let mut host = demo_world(&settings)?;
    let logs_before = host.state().log_count();

    tracing::info!(
      file = ?self.file,
      spells = file.spells.len(),
      elements = file.elements.len(),
      "casting spells"
    );

    let outcome = SpellInterpreter::new(settings.caster.address)
      .execute(&mut host, &file.spells, file.elements)
      .context("failed to cast spells")?;

    let report = CastReport::new(outcome, &host, logs_before);

    let json = if self.compact {
      serde_json::to_string(&report)?
    } else {
      serde_json::to_string_pretty(&report)?
    };
    println!("{json}");

    Ok(())
  }
}
