//! Packing of integers and byte strings into field elements
//!
//! Bytes are packed three per limb, so every packed limb is below 2^24 and
//! therefore canonical. Fixed-width values pack to a fixed number of elements;
//! variable-length byte strings are hashed together with their length.

use p3_baby_bear::BabyBear;

use super::element::{FieldElement, FIELD_ELEMENT_LIMBS};

const BYTES_PER_LIMB: usize = 3;

/// Number of bytes packed into one field element
pub const BYTES_PER_ELEMENT: usize = BYTES_PER_LIMB * FIELD_ELEMENT_LIMBS;

const LIMB_MASK: u64 = (1 << (8 * BYTES_PER_LIMB)) - 1;

fn pack_limb(chunk: &[u8]) -> u32 {
    chunk.iter().rev().fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}

/// Converts bytes to limbs (3 bytes per limb, little-endian, zero-padded)
pub(crate) fn bytes_to_limbs(bytes: &[u8]) -> Vec<BabyBear> {
    bytes.chunks(BYTES_PER_LIMB).map(|chunk| BabyBear::new(pack_limb(chunk))).collect()
}

impl FieldElement {
    /// Encodes an integer as a fixed-width element
    ///
    /// The value is split into 24-bit limbs, so the encoding is injective
    /// over the whole `u64` range.
    pub fn from_u64(value: u64) -> Self {
        let mut limbs = [0u32; FIELD_ELEMENT_LIMBS];
        let mut rest = value;
        for limb in limbs.iter_mut().take(3) {
            *limb = (rest & LIMB_MASK) as u32;
            rest >>= 8 * BYTES_PER_LIMB;
        }
        Self::from_canonical_limbs(limbs)
    }

    /// Encodes a 32-bit integer as a fixed-width element
    pub fn from_u32(value: u32) -> Self { Self::from_u64(u64::from(value)) }

    /// Packs bytes into elements, 24 bytes per element
    ///
    /// Only injective for inputs of a known fixed length; use
    /// [`FieldElement::hash_bytes`] for variable-length data.
    pub fn pack_bytes(bytes: &[u8]) -> Vec<FieldElement> {
        bytes
            .chunks(BYTES_PER_ELEMENT)
            .map(|chunk| {
                let mut limbs = [0u32; FIELD_ELEMENT_LIMBS];
                for (limb, part) in limbs.iter_mut().zip(chunk.chunks(BYTES_PER_LIMB)) {
                    *limb = pack_limb(part);
                }
                Self::from_canonical_limbs(limbs)
            })
            .collect()
    }

    /// Commits to a variable-length byte string
    pub fn hash_bytes(bytes: &[u8]) -> Self {
        let mut inputs = Vec::with_capacity(1 + bytes.len().div_ceil(BYTES_PER_ELEMENT));
        inputs.push(Self::from_u64(bytes.len() as u64));
        inputs.extend(Self::pack_bytes(bytes));
        Self::hash(&inputs)
    }
}
