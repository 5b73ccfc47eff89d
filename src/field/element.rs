//! The canonical 32-byte field element

use std::fmt;

use p3_baby_bear::BabyBear;
use p3_field::PrimeField32;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::encoding::bytes_to_limbs;
use super::poseidon2::hash_limbs;
use crate::errors::EncodingError;
use crate::types::FIELD_ELEMENT_SIZE;

/// Number of BabyBear limbs in a field element
pub const FIELD_ELEMENT_LIMBS: usize = 8;

const LIMB_SIZE: usize = FIELD_ELEMENT_SIZE / FIELD_ELEMENT_LIMBS;

/// A 32-byte value built from eight canonical BabyBear limbs
///
/// The serialized form is the eight limbs as little-endian `u32`s. Each limb
/// is strictly below the BabyBear modulus, so equality of values and
/// equality of serializations coincide.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement([u32; FIELD_ELEMENT_LIMBS]);

impl FieldElement {
    /// The all-zero element
    pub const ZERO: Self = Self([0; FIELD_ELEMENT_LIMBS]);

    /// Builds an element from a sponge digest
    pub(crate) fn from_field_limbs(limbs: [BabyBear; FIELD_ELEMENT_LIMBS]) -> Self {
        Self(limbs.map(|limb| limb.as_canonical_u32()))
    }

    /// Builds an element from limb values that are already reduced
    pub(crate) const fn from_canonical_limbs(limbs: [u32; FIELD_ELEMENT_LIMBS]) -> Self {
        Self(limbs)
    }

    /// Returns the canonical limb values
    pub fn limbs(&self) -> [u32; FIELD_ELEMENT_LIMBS] { self.0 }

    pub(crate) fn field_limbs(&self) -> impl Iterator<Item = BabyBear> + '_ {
        self.0.iter().map(|&limb| BabyBear::new(limb))
    }

    /// Serializes the element to its canonical 32-byte form
    pub fn serialize(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        let mut bytes = [0u8; FIELD_ELEMENT_SIZE];
        for (chunk, limb) in bytes.chunks_exact_mut(LIMB_SIZE).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    /// Deserializes an element from exactly 32 canonical bytes
    ///
    /// # Errors
    /// [`EncodingError::InvalidLength`] if `bytes` is not 32 bytes long and
    /// [`EncodingError::NonCanonicalLimb`] if any limb is not below the modulus.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() != FIELD_ELEMENT_SIZE {
            return Err(EncodingError::InvalidLength {
                field: "field element",
                expected: FIELD_ELEMENT_SIZE,
                actual: bytes.len(),
            });
        }

        let mut limbs = [0u32; FIELD_ELEMENT_LIMBS];
        for (limb, (index, chunk)) in
            limbs.iter_mut().zip(bytes.chunks_exact(LIMB_SIZE).enumerate())
        {
            let value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if value >= BabyBear::ORDER_U32 {
                return Err(EncodingError::NonCanonicalLimb { limb: index, value });
            }
            *limb = value;
        }
        Ok(Self(limbs))
    }

    /// Combines elements into one with the Poseidon2 sponge
    ///
    /// The absorbed stream is prefixed with its own length, so inputs of
    /// different arity never collide.
    pub fn hash(inputs: &[FieldElement]) -> Self { Self::hash_with_domain(&[], inputs) }

    /// Combines elements into one under a domain separation tag
    pub fn hash_with_domain(domain_tag: &[u8], inputs: &[FieldElement]) -> Self {
        let tag_limbs = bytes_to_limbs(domain_tag);
        let payload = 1 + tag_limbs.len() + inputs.len() * FIELD_ELEMENT_LIMBS;

        let stream = std::iter::once(BabyBear::new(payload as u32))
            .chain(std::iter::once(BabyBear::new(domain_tag.len() as u32)))
            .chain(tag_limbs)
            .chain(inputs.iter().flat_map(|input| input.field_limbs()));
        Self::from_field_limbs(hash_limbs(stream))
    }

    /// Returns the bit at `index` of the serialized form, most significant bit first
    ///
    /// Index 0 is the top bit of byte 0. Indices past the last bit read as 0.
    pub fn bit(&self, index: usize) -> u8 {
        let byte_index = index / 8;
        if byte_index >= FIELD_ELEMENT_SIZE {
            return 0;
        }
        let byte = self.serialize()[byte_index];
        (byte >> (7 - index % 8)) & 1
    }

    /// Samples a uniformly random element
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self([(); FIELD_ELEMENT_LIMBS].map(|_| rng.random_range(0..BabyBear::ORDER_U32)))
    }

    /// Hex encoding of the serialized form
    pub fn to_hex(&self) -> String { hex::encode(self.serialize()) }

    /// Parses the hex encoding of a serialized element
    pub fn from_hex(s: &str) -> Result<Self, EncodingError> {
        let bytes = hex::decode(s).map_err(|e| EncodingError::InvalidHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

impl TryFrom<&[u8]> for FieldElement {
    type Error = EncodingError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> { Self::deserialize(bytes) }
}

impl From<FieldElement> for [u8; FIELD_ELEMENT_SIZE] {
    fn from(element: FieldElement) -> Self { element.serialize() }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
