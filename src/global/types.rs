//! Proof types of the global commitment tree
//!
//! Both proof kinds carry the sidechain identifier and the sibling hashes of
//! its path, ordered from the leaf up to the root. The left/right direction
//! at each level is the corresponding bit of the identifier.
//!
//! Wire format: `sc_id (32 bytes) || sibling_0 (32 bytes) || ...`.

use serde::{Deserialize, Serialize};

use crate::errors::EncodingError;
use crate::field::FieldElement;
use crate::types::{SidechainId, FIELD_ELEMENT_SIZE};

/// Sibling hashes from the leaf level up to the root
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// `siblings[i]` is the sibling of the path node `i` levels above the leaf
    pub siblings: Vec<FieldElement>,
}

impl MerklePath {
    /// Number of levels covered by the path
    pub fn len(&self) -> usize { self.siblings.len() }

    /// Whether the path has no levels
    pub fn is_empty(&self) -> bool { self.siblings.is_empty() }
}

/// Proof that a sidechain commitment is a leaf of the global tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceProof {
    /// The sidechain whose leaf is proven
    pub sc_id: SidechainId,
    /// Path from the leaf to the root
    pub path: MerklePath,
}

/// Proof that the leaf slot of a sidechain is empty
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceProof {
    /// The sidechain proven absent
    pub sc_id: SidechainId,
    /// Path from the empty leaf slot to the root
    pub path: MerklePath,
}

fn encode(sc_id: &SidechainId, path: &MerklePath) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(FIELD_ELEMENT_SIZE * (1 + path.len()));
    bytes.extend_from_slice(&sc_id.serialize());
    for sibling in &path.siblings {
        bytes.extend_from_slice(&sibling.serialize());
    }
    bytes
}

fn decode(bytes: &[u8]) -> Result<(SidechainId, MerklePath), EncodingError> {
    if bytes.len() < FIELD_ELEMENT_SIZE || bytes.len() % FIELD_ELEMENT_SIZE != 0 {
        return Err(EncodingError::MalformedProof { len: bytes.len() });
    }
    let (id_bytes, rest) = bytes.split_at(FIELD_ELEMENT_SIZE);
    let sc_id = FieldElement::deserialize(id_bytes)?;
    let siblings = rest
        .chunks_exact(FIELD_ELEMENT_SIZE)
        .map(FieldElement::deserialize)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((sc_id, MerklePath { siblings }))
}

impl ExistenceProof {
    /// Serializes the proof
    pub fn to_bytes(&self) -> Vec<u8> { encode(&self.sc_id, &self.path) }

    /// Deserializes a proof
    ///
    /// Only the framing and field encodings are checked here; a path of the
    /// wrong length decodes but fails verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let (sc_id, path) = decode(bytes)?;
        Ok(Self { sc_id, path })
    }
}

impl AbsenceProof {
    /// Serializes the proof
    pub fn to_bytes(&self) -> Vec<u8> { encode(&self.sc_id, &self.path) }

    /// Deserializes a proof
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let (sc_id, path) = decode(bytes)?;
        Ok(Self { sc_id, path })
    }
}
