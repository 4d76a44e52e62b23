// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use std::str::FromStr;

use ethers_core::types::H256;

/// Parse a 32 byte word, with or without the `0x` prefix.
pub fn parse_word(s: &str) -> Result<H256, String> {
    let hex = s.strip_prefix("0x").unwrap_or(s);
    if hex.len() != 64 {
        return Err(format!("expected 32 bytes of hex, got {} characters", hex.len()));
    }
    H256::from_str(hex).map_err(|e| format!("invalid word: {e}"))
}

#[cfg(test)]
mod tests {
    use ethers_core::types::H256;

    use super::parse_word;

    #[test]
    fn parse_with_and_without_prefix() {
        let hex = "ab".repeat(32);
        let expected = H256::repeat_byte(0xab);
        assert_eq!(parse_word(&hex), Ok(expected));
        assert_eq!(parse_word(&format!("0x{hex}")), Ok(expected));
        assert!(parse_word("0xab").is_err());
        assert!(parse_word(&"zz".repeat(32)).is_err());
    }
}
