#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Sidechain Commitment Tree
//!
//! An append-only accumulator of sidechain events with a single root
//! commitment, existence proofs for sidechains that have events and absence
//! proofs for those that do not.

// Event ingestion and the query API
pub mod commitment_tree;

// Error types
pub mod errors;

// Event records and their leaf commitments
pub mod events;

// Field elements and the Poseidon2 hash
pub mod field;

// Global sparse Merkle tree and its proofs
pub mod global;

// Schnorr signatures over field element messages
pub mod schnorr;

// Per-sidechain sub-trees
pub mod sidechain;

// Thread-safe handle
pub mod sync;

// Shared types and domain tags
pub mod types;

// Re-export commonly used types and functions
pub use commitment_tree::CommitmentTree;
pub use errors::{Error, Result};
pub use events::{EventKind, EventRecord};
pub use field::FieldElement;
pub use global::{AbsenceProof, ExistenceProof, MerklePath};
pub use schnorr::SchnorrSignature;
pub use sync::SharedCommitmentTree;
pub use types::{ScCommitment, SidechainId};
