//! Incremental update system for SMT nodes
//!
//! This module updates sidechain commitments and incrementally recomputes the
//! affected SMT nodes. Only the paths of updated identifiers are rehashed;
//! siblings come from the node store.

use std::collections::{BTreeMap, HashMap};

use super::keys::{encode_node_key, encode_sibling_node_key, root_node_key, NodeKey};
use crate::field::FieldElement;
use crate::global::smt::{get_bit_at_depth, hash_node_with, SmtConfig, SmtHasher};
use crate::types::{ScCommitment, SidechainId};

/// Updates sidechain commitments and recomputes all affected SMT nodes
///
/// The function:
/// 1. Recomputes leaf hashes for all updated sidechains
/// 2. Walks up the tree depth by depth, computing shared ancestors once
/// 3. Writes every recomputed node back to `nodes`, dropping empty ones
///
/// # Arguments
/// * `updates` - Map of sidechain ID(s) to new commitment(s)
/// * `nodes` - Stored non-empty nodes of the tree
/// * `hasher` - The hash function implementation
/// * `config` - The SMT configuration
///
/// # Returns
/// The new root hash
pub fn update_sc_commitments<H: SmtHasher, C: SmtConfig>(
    updates: &BTreeMap<SidechainId, ScCommitment>,
    nodes: &mut HashMap<NodeKey, FieldElement>,
    hasher: &H,
    config: &C,
) -> FieldElement {
    let empty = hasher.empty_hash();
    if updates.is_empty() {
        return nodes.get(&root_node_key()).copied().unwrap_or(empty);
    }

    let key_bits = config.key_bits();
    let mut computed: HashMap<NodeKey, FieldElement> = HashMap::new();

    for (sc_id, commitment) in updates {
        let leaf_hash = hasher.hash_leaf(config.leaf_domain_tag(), *sc_id, *commitment);
        computed.insert(encode_node_key(sc_id, key_bits), leaf_hash);
    }

    // Bottom-up: both children of a node are final before the node is hashed.
    for depth in (0..key_bits).rev() {
        for sc_id in updates.keys() {
            let node_key = encode_node_key(sc_id, depth);
            if computed.contains_key(&node_key) {
                continue;
            }

            let child_key = encode_node_key(sc_id, depth + 1);
            let child_hash = computed.get(&child_key).copied().unwrap_or(empty);

            let sibling_key = encode_sibling_node_key(sc_id, depth + 1);
            let sibling_hash = computed
                .get(&sibling_key)
                .or_else(|| nodes.get(&sibling_key))
                .copied()
                .unwrap_or(empty);

            let (left_hash, right_hash) = if get_bit_at_depth(sc_id, depth) == 0 {
                (child_hash, sibling_hash)
            } else {
                (sibling_hash, child_hash)
            };
            computed.insert(node_key, hash_node_with(left_hash, right_hash, hasher, config));
        }
    }

    let root = computed.get(&root_node_key()).copied().unwrap_or(empty);

    for (node_key, node_hash) in computed {
        if node_hash == empty {
            nodes.remove(&node_key);
        } else {
            nodes.insert(node_key, node_hash);
        }
    }

    root
}
