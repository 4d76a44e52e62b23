// Copyright 2022-2023 Protocol Labs
// SPDX-License-Identifier: Apache-2.0, MIT

use ethers_core::types::{Bytes, H256};
use serde::{Deserialize, Serialize};
use spellcast_vm_spell::{operand_refs, SlotRef, WORD_LEN};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TapeError {
    #[error("slot {slot} is unset or beyond the end of its region (length {len})")]
    OutOfRange { slot: SlotRef, len: usize },
    #[error("slot {slot} cannot hold a {kind} value")]
    KindMismatch { slot: SlotRef, kind: &'static str },
    #[error("slot {slot} needs a full word but the value is only {len} bytes")]
    ShortWord { slot: SlotRef, len: usize },
}

/// An initial element supplied by the caster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Static(H256),
    Dynamic(Bytes),
}

impl Element {
    fn kind(&self) -> &'static str {
        match self {
            Element::Static(_) => "static",
            Element::Dynamic(_) => "dynamic",
        }
    }
}

/// A value resolved from the tape, borrowed for the duration of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    Word(&'a H256),
    Blob(&'a [u8]),
}

impl<'a> Operand<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            Operand::Word(w) => w.as_bytes(),
            Operand::Blob(b) => b,
        }
    }
}

/// The scratch buffer of one execution.
///
/// Two independent regions, one of words and one of blobs, addressed by the
/// two halves of the slot reference space. Neither ever shrinks; writing
/// past the end grows the region and leaves the skipped slots unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementsTape {
    statics: Vec<Option<H256>>,
    dynamics: Vec<Option<Bytes>>,
}

impl ElementsTape {
    /// Each element is appended to the region of its kind, preserving order within the kind.
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut tape = Self::default();
        for e in elements {
            match e {
                Element::Static(w) => tape.statics.push(Some(w)),
                Element::Dynamic(b) => tape.dynamics.push(Some(b)),
            }
        }
        tape
    }

    pub fn static_len(&self) -> usize {
        self.statics.len()
    }

    pub fn dynamic_len(&self) -> usize {
        self.dynamics.len()
    }

    pub fn get(&self, slot: SlotRef) -> Result<Operand<'_>, TapeError> {
        let value = match slot {
            SlotRef::Static(i) => self
                .statics
                .get(i as usize)
                .and_then(Option::as_ref)
                .map(Operand::Word),
            SlotRef::Dynamic(i) => self
                .dynamics
                .get(i as usize)
                .and_then(Option::as_ref)
                .map(|b| Operand::Blob(b.as_ref())),
        };

        value.ok_or(TapeError::OutOfRange {
            slot,
            len: self.region_len(slot),
        })
    }

    pub fn set(&mut self, slot: SlotRef, value: Element) -> Result<(), TapeError> {
        match (slot, value) {
            (SlotRef::Static(i), Element::Static(w)) => put(&mut self.statics, i, w),
            (SlotRef::Dynamic(i), Element::Dynamic(b)) => put(&mut self.dynamics, i, b),
            (slot, value) => {
                return Err(TapeError::KindMismatch {
                    slot,
                    kind: value.kind(),
                })
            }
        }
        Ok(())
    }

    /// Store a result blob returned by an endpoint.
    ///
    /// A static slot takes the first word of the blob, a dynamic slot the whole of it.
    pub fn capture(&mut self, slot: SlotRef, blob: Bytes) -> Result<(), TapeError> {
        let value = if slot.is_dynamic() {
            Element::Dynamic(blob)
        } else if blob.len() < WORD_LEN {
            return Err(TapeError::ShortWord {
                slot,
                len: blob.len(),
            });
        } else {
            Element::Static(H256::from_slice(&blob[..WORD_LEN]))
        };
        self.set(slot, value)
    }

    /// Resolve slots in order, failing on the first one that isn't set.
    pub fn resolve(
        &self,
        slots: impl IntoIterator<Item = SlotRef>,
    ) -> Result<Vec<Operand<'_>>, TapeError> {
        slots.into_iter().map(|s| self.get(s)).collect()
    }

    /// Resolve raw reference bytes, up to the first `0xFF`.
    pub fn resolve_operands(&self, refs: &[u8]) -> Result<Vec<Operand<'_>>, TapeError> {
        self.resolve(operand_refs(refs))
    }

    fn region_len(&self, slot: SlotRef) -> usize {
        match slot {
            SlotRef::Static(_) => self.statics.len(),
            SlotRef::Dynamic(_) => self.dynamics.len(),
        }
    }
}

fn put<T>(region: &mut Vec<Option<T>>, i: u8, value: T) {
    let i = i as usize;
    if i >= region.len() {
        region.resize_with(i + 1, || None);
    }
    region[i] = Some(value);
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Bytes, H256};
    use quickcheck_macros::quickcheck;
    use spellcast_testing::arb::ArbWord;
    use spellcast_vm_spell::SlotRef;

    use super::{Element, ElementsTape, Operand, TapeError};

    fn word(b: u8) -> H256 {
        H256::repeat_byte(b)
    }

    #[test]
    fn initial_elements_split_by_kind() {
        let tape = ElementsTape::new(vec![
            Element::Static(word(1)),
            Element::Dynamic(Bytes::from(b"abc".to_vec())),
            Element::Static(word(2)),
        ]);

        assert_eq!(tape.static_len(), 2);
        assert_eq!(tape.dynamic_len(), 1);
        assert_eq!(tape.get(SlotRef::Static(1)), Ok(Operand::Word(&word(2))));
        assert_eq!(
            tape.get(SlotRef::Dynamic(0)),
            Ok(Operand::Blob(b"abc".as_slice()))
        );
    }

    #[test]
    fn unset_slots_are_out_of_range() {
        let mut tape = ElementsTape::new(vec![Element::Static(word(1))]);

        assert_eq!(
            tape.get(SlotRef::Static(1)),
            Err(TapeError::OutOfRange {
                slot: SlotRef::Static(1),
                len: 1
            })
        );
        assert!(tape.get(SlotRef::Dynamic(0)).is_err());

        // Writing past the end leaves a gap which still can't be read.
        tape.set(SlotRef::Static(3), Element::Static(word(3)))
            .unwrap();
        assert_eq!(tape.static_len(), 4);
        assert!(tape.get(SlotRef::Static(2)).is_err());
        assert_eq!(tape.get(SlotRef::Static(3)), Ok(Operand::Word(&word(3))));
    }

    #[test]
    fn dynamic_overwrite_replaces_length() {
        let mut tape = ElementsTape::new(vec![Element::Dynamic(Bytes::from(vec![7u8; 100]))]);

        tape.capture(SlotRef::Dynamic(0), Bytes::from(vec![1, 2, 3]))
            .unwrap();

        assert_eq!(
            tape.get(SlotRef::Dynamic(0)),
            Ok(Operand::Blob([1u8, 2, 3].as_slice()))
        );
        assert_eq!(tape.dynamic_len(), 1);
    }

    #[test]
    fn capture_static_keeps_first_word() {
        let mut tape = ElementsTape::default();
        let mut blob = vec![9u8; 32];
        blob.extend([0u8; 32]);

        tape.capture(SlotRef::Static(0), Bytes::from(blob)).unwrap();
        assert_eq!(tape.get(SlotRef::Static(0)), Ok(Operand::Word(&word(9))));

        assert_eq!(
            tape.capture(SlotRef::Static(1), Bytes::from(vec![1u8; 31])),
            Err(TapeError::ShortWord {
                slot: SlotRef::Static(1),
                len: 31
            })
        );
    }

    #[test]
    fn kind_mismatch() {
        let mut tape = ElementsTape::default();
        assert_eq!(
            tape.set(SlotRef::Static(0), Element::Dynamic(Bytes::default())),
            Err(TapeError::KindMismatch {
                slot: SlotRef::Static(0),
                kind: "dynamic"
            })
        );
    }

    #[test]
    fn resolve_operands_stops_at_sentinel() {
        let tape = ElementsTape::new(vec![
            Element::Static(word(1)),
            Element::Dynamic(Bytes::from(b"x".to_vec())),
        ]);

        // The slot after the sentinel doesn't exist, but is never looked at.
        let ops = tape
            .resolve_operands(&[0x80, 0x00, 0xFF, 0x05, 0xFF, 0xFF])
            .unwrap();

        assert_eq!(ops, vec![Operand::Blob(b"x".as_slice()), Operand::Word(&word(1))]);
        assert!(tape.resolve_operands(&[0x00, 0x05]).is_err());
    }

    #[quickcheck]
    fn prop_dynamic_blob_preserved(blobs: Vec<Vec<u8>>, idx: u8) -> bool {
        let idx = idx % 0x7F;
        let mut tape = ElementsTape::default();
        blobs.into_iter().all(|blob| {
            tape.capture(SlotRef::Dynamic(idx), Bytes::from(blob.clone()))
                .unwrap();
            tape.get(SlotRef::Dynamic(idx)) == Ok(Operand::Blob(blob.as_slice()))
        })
    }

    #[quickcheck]
    fn prop_never_shrinks(writes: Vec<(u8, ArbWord)>) -> bool {
        let mut tape = ElementsTape::default();
        let mut len = 0;
        for (i, w) in writes {
            tape.set(SlotRef::Static(i % 0x80), Element::Static(w.0))
                .unwrap();
            if tape.static_len() < len {
                return false;
            }
            len = tape.static_len();
        }
        true
    }

    #[test]
    fn serialize_shows_gaps() {
        let mut tape = ElementsTape::default();
        tape.set(SlotRef::Dynamic(1), Element::Dynamic(Bytes::from(vec![0xab])))
            .unwrap();

        let json = serde_json::to_value(&tape).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "statics": [], "dynamics": [null, "0xab"] })
        );
    }
}
