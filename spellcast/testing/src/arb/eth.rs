// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
use ethers_core::types::{Address, H256, U256};

/// Unlike the ethers types, these can be generated by both `quickcheck` and `arbitrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbAddress(pub Address);

impl quickcheck::Arbitrary for ArbAddress {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let bz: [u8; 20] = std::array::from_fn(|_| <u8 as quickcheck::Arbitrary>::arbitrary(g));
        Self(Address::from(bz))
    }
}

impl arbitrary::Arbitrary<'_> for ArbAddress {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let bz: [u8; 20] = u.arbitrary()?;
        Ok(Self(Address::from(bz)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbWord(pub H256);

impl quickcheck::Arbitrary for ArbWord {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let bz: [u8; 32] = std::array::from_fn(|_| <u8 as quickcheck::Arbitrary>::arbitrary(g));
        Self(H256(bz))
    }
}

impl arbitrary::Arbitrary<'_> for ArbWord {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let bz: [u8; 32] = u.arbitrary()?;
        Ok(Self(H256(bz)))
    }
}

/// Token amounts; kept to 128 bits so sums of a few of them can't overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbU256(pub U256);

impl quickcheck::Arbitrary for ArbU256 {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(U256::from(<u128 as quickcheck::Arbitrary>::arbitrary(g)))
    }
}

impl arbitrary::Arbitrary<'_> for ArbU256 {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self(U256::from(u.arbitrary::<u128>()?)))
    }
}
