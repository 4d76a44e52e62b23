// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use anyhow::Context;
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};
use spellcast_vm_interpreter::Element;

/// A spell sequence with the elements it starts out with.
///
/// ```json
/// {
///   "spells": ["0x70a082314000ffffffffff800000000000000000000000000000000000001001"],
///   "elements": [{"static": "0x000000000000000000000000cacacacacacacacacacacacacacacacacacacaca"}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellFile {
    pub spells: Vec<H256>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl SpellFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read spell file {path:?}"))?;
        let file = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse spell file {path:?}"))?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Bytes, H256};
    use spellcast_vm_interpreter::Element;

    use super::SpellFile;

    #[test]
    fn read_spell_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spells.json");
        let json = format!(
            r#"{{
              "spells": ["0x{word}"],
              "elements": [{{"static": "0x{word}"}}, {{"dynamic": "0x68656c6c6f"}}]
            }}"#,
            word = "11".repeat(32)
        );
        std::fs::write(&path, json).unwrap();

        let file = SpellFile::read(&path).unwrap();

        assert_eq!(file.spells, vec![H256::repeat_byte(0x11)]);
        assert_eq!(
            file.elements,
            vec![
                Element::Static(H256::repeat_byte(0x11)),
                Element::Dynamic(Bytes::from(b"hello".to_vec()))
            ]
        );
    }

    #[test]
    fn elements_are_optional() {
        let file: SpellFile = serde_json::from_str(r#"{"spells": []}"#).unwrap();
        assert!(file.elements.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpellFile::read(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read spell file"));
    }
}
