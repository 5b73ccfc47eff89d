//! Global commitment tree
//!
//! A sparse Merkle tree keyed by sidechain identifier whose leaves bind each
//! identifier to its combined sidechain commitment. Every identifier has a
//! leaf slot, so the same path structure proves both inclusion of a
//! commitment and emptiness of a slot.

mod builder;
mod config;
mod hasher;
mod keys;
mod proof;
pub mod smt;
mod tree;
mod types;
mod updater;

pub use builder::{build_smt_node_with, build_smt_root_with};
pub use config::SidechainTreeV0Config;
pub use hasher::Poseidon2Hasher;
pub use keys::{encode_node_key, encode_sibling_node_key, root_node_key, NodeKey};
pub use proof::{
    generate_merkle_path, verify_absence, verify_absence_with, verify_existence,
    verify_existence_with,
};
pub use tree::SparseCommitmentTree;
pub use types::{AbsenceProof, ExistenceProof, MerklePath};
pub use updater::update_sc_commitments;
