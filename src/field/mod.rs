//! Field elements and the hash primitive
//!
//! Every commitment in the tree is a [`FieldElement`]: eight BabyBear limbs
//! serialized as 32 little-endian bytes. Nodes and leaves are combined with a
//! Poseidon2 sponge through [`FieldElement::hash`].

mod element;
mod encoding;
mod poseidon2;

pub use element::{FieldElement, FIELD_ELEMENT_LIMBS};
pub use encoding::BYTES_PER_ELEMENT;
