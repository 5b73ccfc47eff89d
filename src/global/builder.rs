//! Sparse Merkle Tree building functions
//!
//! Computes roots from scratch. The incremental updater must always agree
//! with these functions.

use std::collections::BTreeMap;

use crate::field::FieldElement;
use crate::global::smt::{get_bit_at_depth, hash_node_with, SmtConfig, SmtHasher};
use crate::types::{ScCommitment, SidechainId};

/// Computes the SMT root with custom hasher and config
///
/// # Arguments
/// * `sc_commitments` - Map of sidechain IDs to their combined commitments
/// * `hasher` - The hash function implementation
/// * `config` - The SMT configuration
///
/// # Returns
/// The root hash of the SMT, or the empty hash if there are no sidechains
pub fn build_smt_root_with<H: SmtHasher, C: SmtConfig>(
    sc_commitments: &BTreeMap<SidechainId, ScCommitment>,
    hasher: &H,
    config: &C,
) -> FieldElement {
    let entries: Vec<(SidechainId, ScCommitment)> =
        sc_commitments.iter().map(|(sc_id, commitment)| (*sc_id, *commitment)).collect();
    build_smt_node_with(&entries, 0, hasher, config)
}

/// Builds the SMT node at `depth` covering `entries`
///
/// All entries must share the same first `depth` bits. The entries are split
/// by their bit at `depth` and both halves are built one level deeper. At
/// the leaf depth the (single) entry is hashed into a leaf.
pub fn build_smt_node_with<H: SmtHasher, C: SmtConfig>(
    entries: &[(SidechainId, ScCommitment)],
    depth: usize,
    hasher: &H,
    config: &C,
) -> FieldElement {
    if depth >= config.key_bits() {
        // Entries colliding on every key bit occupy one slot; the last one wins.
        return match entries.last() {
            Some((sc_id, commitment)) => {
                hasher.hash_leaf(config.leaf_domain_tag(), *sc_id, *commitment)
            }
            None => hasher.empty_hash(),
        };
    }
    if entries.is_empty() {
        return hasher.empty_hash();
    }

    let (left, right): (Vec<_>, Vec<_>) =
        entries.iter().copied().partition(|(sc_id, _)| get_bit_at_depth(sc_id, depth) == 0);

    let left_child = build_smt_node_with(&left, depth + 1, hasher, config);
    let right_child = build_smt_node_with(&right, depth + 1, hasher, config);
    hash_node_with(left_child, right_child, hasher, config)
}
