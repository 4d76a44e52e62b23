// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::Context;
use ethers_core::abi::Token;
use ethers_core::types::U256;
use spellcast_vm_host::library::{encode_call, Library, TOKEN_ABI, TOKEN_ADDR};
use spellcast_vm_host::{GasMeter, MemoryHost};
use spellcast_vm_interpreter::{CallFrame, Host};

use crate::settings::Settings;

/// A fresh world with the library installed and the caster funded,
/// limited the way the settings say.
pub fn demo_world(settings: &Settings) -> anyhow::Result<MemoryHost> {
    let caster = settings.caster.address;

    let mut host = MemoryHost::new().with_max_depth(settings.host.max_depth);
    Library::install(&mut host);
    host.fund(caster, U256::from(settings.caster.balance));

    if settings.caster.tokens > 0 {
        let mint = encode_call(
            &TOKEN_ABI,
            "mint",
            &[
                Token::Address(caster),
                Token::Uint(U256::from(settings.caster.tokens)),
            ],
        )
        .context("failed to encode mint")?;

        host.invoke(CallFrame::call(caster, TOKEN_ADDR), &mint)
            .context("failed to mint the caster's tokens")?;
    }

    // Setting up the world is free; only the cast itself is metered.
    Ok(host.with_gas(GasMeter::new(settings.host.budget)))
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Address, U256};
    use spellcast_vm_host::conv::{from_word, mapping_key};
    use spellcast_vm_host::library::TOKEN_ADDR;

    use spellcast_vm_interpreter::{Operand, SpellInterpreter};
    use spellcast_vm_spell::SlotRef;

    use super::demo_world;
    use crate::settings::{CasterSettings, HostSettings, Settings};
    use crate::spell_file::SpellFile;

    fn settings(tokens: u64, budget: Option<u64>) -> Settings {
        Settings {
            caster: CasterSettings {
                address: Address::repeat_byte(0xca),
                balance: 500,
                tokens,
            },
            host: HostSettings {
                budget,
                max_depth: 16,
            },
        }
    }

    #[test]
    fn caster_is_funded() {
        let host = demo_world(&settings(42, Some(100_000))).unwrap();
        let caster = Address::repeat_byte(0xca);

        assert_eq!(host.state().balance(&caster), U256::from(500));
        let tokens = host.state().load(TOKEN_ADDR, mapping_key("balance", caster));
        assert_eq!(from_word(&tokens), U256::from(42));
        assert_eq!(host.gas().used(), 0);
        assert_eq!(host.gas().limit(), Some(100_000));
    }

    #[test]
    fn no_tokens_no_mint() {
        let host = demo_world(&settings(0, None)).unwrap();
        assert_eq!(host.state().log_count(), 0);
    }

    #[test]
    fn cast_shipped_spell_file() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let settings = Settings::new(&dir.join("config"), "dev").unwrap();
        let file = SpellFile::read(&dir.join("spells/balance.json")).unwrap();
        let mut host = demo_world(&settings).unwrap();

        let outcome = SpellInterpreter::new(settings.caster.address)
            .execute(&mut host, &file.spells, file.elements)
            .unwrap();

        assert_eq!(outcome.steps, 1);
        match outcome.tape.get(SlotRef::Dynamic(0)).unwrap() {
            Operand::Blob(balance) => {
                assert_eq!(U256::from_big_endian(balance), U256::from(settings.caster.tokens))
            }
            other => panic!("unexpected operand: {other:?}"),
        }
    }
}
