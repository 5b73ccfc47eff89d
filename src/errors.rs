//! Error types for the sidechain commitment tree
//!
//! This module defines all error types used throughout the library.
//! Lookups of unknown sidechains are not errors: they return `None`.
//! Malformed proofs are not errors either: verification returns `false`.

use thiserror::Error;

use crate::events::EventKind;
use crate::types::SidechainId;

/// The main error type for the sidechain commitment tree library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Byte-level encoding errors
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Event ingestion errors
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    /// Schnorr signature errors
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Errors raised while decoding fixed-width values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodingError {
    /// A fixed-width field had the wrong number of bytes
    #[error("Invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the offending field
        field: &'static str,
        /// The required length in bytes
        expected: usize,
        /// The length that was supplied
        actual: usize,
    },

    /// A field element limb was not reduced modulo the field order
    #[error("Non-canonical field element: limb {limb} is {value}, which is not below the modulus")]
    NonCanonicalLimb {
        /// Index of the offending limb (0-7)
        limb: usize,
        /// The raw limb value
        value: u32,
    },

    /// A proof byte string is not `id || k * sibling`
    #[error("Malformed proof encoding: {len} bytes")]
    MalformedProof {
        /// The length that was supplied
        len: usize,
    },

    /// Hex decoding failed
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Errors that can occur while adding events to the tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommitmentError {
    /// An event field could not be encoded
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The record does not belong to the requested sub-tree
    #[error("Event kind mismatch: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        /// The sub-tree the caller asked for
        expected: EventKind,
        /// The kind of the supplied record
        actual: EventKind,
    },

    /// A global tree config addresses more bits than an identifier has
    #[error("Unsupported key bits: {key_bits}, expected 1..={max}")]
    UnsupportedKeyBits {
        /// The depth requested by the config
        key_bits: usize,
        /// The number of bits in a sidechain identifier
        max: usize,
    },

    /// Another identifier already owns the leaf slot of this one
    #[error("Leaf slot of {sc_id} is held by {occupant}")]
    LeafSlotOccupied {
        /// The identifier being inserted
        sc_id: SidechainId,
        /// The identifier already stored in the slot
        occupant: SidechainId,
    },
}

/// Errors raised by the Schnorr signature boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SignatureError {
    /// The signature bytes could not be decoded
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The signature is well-sized but its scalars are out of range
    #[error("Invalid signature: {0}")]
    OutOfRange(&'static str),

    /// The secret key is not a valid secp256k1 scalar
    #[error("Invalid secret key")]
    InvalidSecretKey,

    /// Signing failed to produce a valid signature
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
