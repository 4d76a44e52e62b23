// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

//! Conversions between storage words and the values endpoints work with.

use ethers_core::types::{Address, H256, U256};
use ethers_core::utils::keccak256;

pub fn to_word(n: U256) -> H256 {
    let mut bz = [0u8; 32];
    n.to_big_endian(&mut bz);
    H256(bz)
}

pub fn from_word(w: &H256) -> U256 {
    U256::from_big_endian(w.as_bytes())
}

/// Storage key of the entry for `who` in the mapping called `name`.
pub fn mapping_key(name: &str, who: Address) -> H256 {
    let mut preimage = name.as_bytes().to_vec();
    preimage.extend_from_slice(who.as_bytes());
    H256(keccak256(preimage))
}

/// Storage key of a single named value.
pub fn value_key(name: &str) -> H256 {
    H256(keccak256(name.as_bytes()))
}
