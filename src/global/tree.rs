//! In-memory sparse commitment tree

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use super::builder::build_smt_root_with;
use super::config::SidechainTreeV0Config;
use super::hasher::Poseidon2Hasher;
use super::keys::{encode_node_key, encode_sibling_node_key, root_node_key, NodeKey};
use super::proof::{generate_merkle_path, verify_absence_with, verify_existence_with};
use super::types::{AbsenceProof, ExistenceProof};
use super::updater::update_sc_commitments;
use crate::errors::CommitmentError;
use crate::field::FieldElement;
use crate::global::smt::{SmtConfig, SmtHasher, SmtSiblingProvider};
use crate::types::{ScCommitment, SidechainId, SC_ID_BITS};

/// Sparse Merkle tree mapping sidechain IDs to their commitments
///
/// Only non-empty nodes are stored. Inserting a commitment rehashes the one
/// path it affects; the root is always up to date.
///
/// Every identifier owns one leaf slot, addressed by its first
/// [`SmtConfig::key_bits`] bits. With fewer than 256 key bits two identifiers
/// can share a slot; the second one is rejected.
#[derive(Clone, Debug)]
pub struct SparseCommitmentTree<H = Poseidon2Hasher, C = SidechainTreeV0Config> {
    commitments: BTreeMap<SidechainId, ScCommitment>,
    nodes: HashMap<NodeKey, FieldElement>,
    hasher: H,
    config: C,
}

impl SparseCommitmentTree {
    /// Creates an empty tree with the default hasher and v0 config
    pub fn new() -> Self {
        Self {
            commitments: BTreeMap::new(),
            nodes: HashMap::new(),
            hasher: Poseidon2Hasher,
            config: SidechainTreeV0Config,
        }
    }
}

impl Default for SparseCommitmentTree {
    fn default() -> Self { Self::new() }
}

impl<H: SmtHasher, C: SmtConfig> SparseCommitmentTree<H, C> {
    /// Creates an empty tree with a custom hasher and config
    ///
    /// # Errors
    /// [`CommitmentError::UnsupportedKeyBits`] unless the config uses between
    /// 1 and 256 key bits.
    pub fn with_hasher_and_config(hasher: H, config: C) -> Result<Self, CommitmentError> {
        let key_bits = config.key_bits();
        if key_bits == 0 || key_bits > SC_ID_BITS {
            return Err(CommitmentError::UnsupportedKeyBits { key_bits, max: SC_ID_BITS });
        }
        Ok(Self { commitments: BTreeMap::new(), nodes: HashMap::new(), hasher, config })
    }

    /// Builds a tree holding `commitments`
    pub fn from_commitments(
        commitments: BTreeMap<SidechainId, ScCommitment>,
        hasher: H,
        config: C,
    ) -> Result<Self, CommitmentError> {
        let mut tree = Self::with_hasher_and_config(hasher, config)?;
        tree.insert_batch(commitments)?;
        Ok(tree)
    }

    /// Checks that the leaf slot of `sc_id` is free or already its own
    ///
    /// Always succeeds when identifiers use all 256 key bits.
    pub fn check_slot(&self, sc_id: &SidechainId) -> Result<(), CommitmentError> {
        let key_bits = self.config.key_bits();
        if key_bits >= SC_ID_BITS || self.commitments.contains_key(sc_id) {
            return Ok(());
        }
        let slot = encode_node_key(sc_id, key_bits);
        match self.commitments.keys().find(|id| encode_node_key(id, key_bits) == slot) {
            Some(occupant) => {
                Err(CommitmentError::LeafSlotOccupied { sc_id: *sc_id, occupant: *occupant })
            }
            None => Ok(()),
        }
    }

    /// Inserts or replaces the commitment of one sidechain, returning the new root
    ///
    /// # Errors
    /// [`CommitmentError::LeafSlotOccupied`] if another identifier holds the slot.
    pub fn insert(
        &mut self,
        sc_id: SidechainId,
        commitment: ScCommitment,
    ) -> Result<FieldElement, CommitmentError> {
        self.insert_batch(BTreeMap::from([(sc_id, commitment)]))
    }

    /// Inserts or replaces several commitments at once, returning the new root
    ///
    /// Shared ancestors of the updated leaves are hashed once. The batch is
    /// applied only if every identifier gets a slot of its own.
    pub fn insert_batch(
        &mut self,
        updates: BTreeMap<SidechainId, ScCommitment>,
    ) -> Result<FieldElement, CommitmentError> {
        let key_bits = self.config.key_bits();
        if key_bits < SC_ID_BITS {
            let mut batch_slots = HashMap::new();
            for sc_id in updates.keys() {
                self.check_slot(sc_id)?;
                let slot = encode_node_key(sc_id, key_bits);
                if let Some(occupant) = batch_slots.insert(slot, *sc_id) {
                    return Err(CommitmentError::LeafSlotOccupied { sc_id: *sc_id, occupant });
                }
            }
        }

        let root = update_sc_commitments(&updates, &mut self.nodes, &self.hasher, &self.config);
        self.commitments.extend(updates);
        Ok(root)
    }

    /// The current root
    pub fn root(&self) -> FieldElement {
        self.nodes.get(&root_node_key()).copied().unwrap_or_else(|| self.hasher.empty_hash())
    }

    /// Recomputes the root from the stored commitments, ignoring cached nodes
    pub fn rebuild_root(&self) -> FieldElement {
        build_smt_root_with(&self.commitments, &self.hasher, &self.config)
    }

    /// The commitment of `sc_id`, if present
    pub fn get(&self, sc_id: &SidechainId) -> Option<ScCommitment> {
        self.commitments.get(sc_id).copied()
    }

    /// Whether `sc_id` has a leaf
    pub fn contains(&self, sc_id: &SidechainId) -> bool { self.commitments.contains_key(sc_id) }

    /// All leaves, ordered by sidechain ID
    pub fn commitments(&self) -> &BTreeMap<SidechainId, ScCommitment> { &self.commitments }

    /// Number of sidechains in the tree
    pub fn len(&self) -> usize { self.commitments.len() }

    /// Whether the tree has no sidechains
    pub fn is_empty(&self) -> bool { self.commitments.is_empty() }

    /// Existence proof for `sc_id`, or `None` if it is not in the tree
    pub fn existence_proof(&self, sc_id: &SidechainId) -> Option<ExistenceProof> {
        if !self.contains(sc_id) {
            return None;
        }
        trace!(%sc_id, "generating existence proof");
        let path = generate_merkle_path(sc_id, &self.hasher, &self.config, self);
        Some(ExistenceProof { sc_id: *sc_id, path })
    }

    /// Absence proof for `sc_id`, or `None` if it is in the tree
    pub fn absence_proof(&self, sc_id: &SidechainId) -> Option<AbsenceProof> {
        if self.contains(sc_id) {
            return None;
        }
        trace!(%sc_id, "generating absence proof");
        let path = generate_merkle_path(sc_id, &self.hasher, &self.config, self);
        Some(AbsenceProof { sc_id: *sc_id, path })
    }

    /// Verifies an existence proof with this tree's hasher and config
    pub fn verify_existence(
        &self,
        commitment: ScCommitment,
        proof: &ExistenceProof,
        root: FieldElement,
    ) -> bool {
        verify_existence_with(commitment, proof, root, &self.hasher, &self.config)
    }

    /// Verifies an absence proof with this tree's hasher and config
    pub fn verify_absence(
        &self,
        sc_id: &SidechainId,
        proof: &AbsenceProof,
        root: FieldElement,
    ) -> bool {
        verify_absence_with(sc_id, proof, root, &self.hasher, &self.config)
    }
}

impl<H: SmtHasher, C: SmtConfig> SmtSiblingProvider for SparseCommitmentTree<H, C> {
    fn get_sibling_hash(&self, sc_id: &SidechainId, depth: usize) -> Option<FieldElement> {
        self.nodes.get(&encode_sibling_node_key(sc_id, depth)).copied()
    }
}
