// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use spellcast_app::options::decode::DecodeArgs;
use spellcast_app::spell_file::SpellFile;
use spellcast_vm_spell::InstructionCursor;

/// Print every instruction; a broken trailing command is reported but doesn't fail the command.
pub fn exec(args: &DecodeArgs) -> anyhow::Result<()> {
    let spells = match args.file {
        Some(ref path) => SpellFile::read(path)?.spells,
        None => args.words.clone(),
    };

    for instruction in InstructionCursor::new(&spells) {
        match instruction {
            Ok(instruction) => println!("{instruction}"),
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}
