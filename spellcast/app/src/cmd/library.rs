// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::anyhow;
use spellcast_app::options::library::LibraryArgs;
use spellcast_vm_host::library::Library;

pub fn exec(args: &LibraryArgs) -> anyhow::Result<()> {
    let endpoints = Library::endpoints()
        .into_iter()
        .filter(|(_, e)| args.name.as_deref().map_or(true, |n| n == e.name()))
        .collect::<Vec<_>>();

    if let (Some(name), true) = (&args.name, endpoints.is_empty()) {
        return Err(anyhow!("no library endpoint named {name}"));
    }

    for (addr, endpoint) in endpoints {
        println!("{} at {addr:?}", endpoint.name());
        for function in endpoint.abi().functions() {
            println!(
                "  0x{}  {}",
                hex::encode(function.short_signature()),
                function.signature()
            );
        }
    }

    if args.name.is_none() {
        println!("Deployable artifacts:");
        for artifact in Library::artifacts() {
            println!("  {:?}  {}", artifact.code_hash(), artifact.code.name());
        }
    }

    Ok(())
}
