// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT
use quickcheck::{Arbitrary, Gen};
use spellcast_testing::arb::ArbAddress;

use crate::{
    CallType, Command, Extension, Flags, SlotRef, COMMAND_INPUTS, END_OF_ARGS, EXTENSION_INPUTS,
};

impl Arbitrary for SlotRef {
    fn arbitrary(g: &mut Gen) -> Self {
        // Dynamic 127 would encode to the sentinel.
        let i = u8::arbitrary(g) % 0x7F;
        if bool::arbitrary(g) {
            SlotRef::Dynamic(i)
        } else {
            SlotRef::Static(i)
        }
    }
}

impl Arbitrary for CallType {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[
            CallType::Delegate,
            CallType::Call,
            CallType::ValueCall,
            CallType::Static,
        ])
        .unwrap()
    }
}

impl Arbitrary for Flags {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            call_type: CallType::arbitrary(g),
            extended: bool::arbitrary(g),
        }
    }
}

/// Reference bytes where the sentinel shows up often enough to matter.
fn arb_ref_bytes<const N: usize>(g: &mut Gen) -> [u8; N] {
    std::array::from_fn(|_| {
        if u8::arbitrary(g) % 4 == 0 {
            END_OF_ARGS
        } else {
            SlotRef::arbitrary(g).to_byte()
        }
    })
}

impl Arbitrary for Command {
    fn arbitrary(g: &mut Gen) -> Self {
        let inputs: [u8; COMMAND_INPUTS] = arb_ref_bytes(g);
        let [output] = arb_ref_bytes::<1>(g);
        Self {
            selector: std::array::from_fn(|_| u8::arbitrary(g)),
            flags: Flags::arbitrary(g),
            inputs,
            output,
            target: ArbAddress::arbitrary(g).0,
        }
    }
}

impl Arbitrary for Extension {
    fn arbitrary(g: &mut Gen) -> Self {
        let inputs: [u8; EXTENSION_INPUTS] = arb_ref_bytes(g);
        let [output] = arb_ref_bytes::<1>(g);
        Self { inputs, output }
    }
}
