//! Shared handle for multi-threaded use
//!
//! Mutations take the write lock; queries and proof generation share the read
//! lock. Proof verification needs no handle at all.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::commitment_tree::CommitmentTree;
use crate::errors::Result;
use crate::events::{EventKind, EventRecord};
use crate::field::FieldElement;
use crate::global::{AbsenceProof, ExistenceProof};
use crate::types::{ScCommitment, SidechainId};

/// Cloneable, thread-safe handle to one [`CommitmentTree`]
#[derive(Clone, Debug, Default)]
pub struct SharedCommitmentTree {
    inner: Arc<RwLock<CommitmentTree>>,
}

impl SharedCommitmentTree {
    /// Creates a handle to an empty tree
    pub fn new() -> Self { Self::default() }

    /// Wraps an existing tree
    pub fn from_tree(tree: CommitmentTree) -> Self { Self { inner: Arc::new(RwLock::new(tree)) } }

    /// See [`CommitmentTree::try_add_event`]
    pub fn try_add_event(&self, sc_id: SidechainId, record: &EventRecord) -> Result<()> {
        self.inner.write().try_add_event(sc_id, record)
    }

    /// See [`CommitmentTree::add_event`]
    pub fn add_event(&self, sc_id: SidechainId, kind: EventKind, record: &EventRecord) -> bool {
        self.inner.write().add_event(sc_id, kind, record)
    }

    /// The global root
    pub fn commitment(&self) -> FieldElement { self.inner.read().commitment() }

    /// See [`CommitmentTree::get_sc_commitment`]
    pub fn get_sc_commitment(&self, sc_id: &SidechainId) -> Option<ScCommitment> {
        self.inner.read().get_sc_commitment(sc_id)
    }

    /// See [`CommitmentTree::get_sub_commitment`]
    pub fn get_sub_commitment(&self, sc_id: &SidechainId, kind: EventKind) -> Option<FieldElement> {
        self.inner.read().get_sub_commitment(sc_id, kind)
    }

    /// Existence proof together with the root it verifies against
    ///
    /// Both are read under one lock, so the pair is consistent even while
    /// other threads add events.
    pub fn get_sc_existence_proof(
        &self,
        sc_id: &SidechainId,
    ) -> Option<(ExistenceProof, FieldElement)> {
        let tree = self.inner.read();
        tree.get_sc_existence_proof(sc_id).map(|proof| (proof, tree.commitment()))
    }

    /// Absence proof together with the root it verifies against
    pub fn get_sc_absence_proof(&self, sc_id: &SidechainId) -> Option<(AbsenceProof, FieldElement)> {
        let tree = self.inner.read();
        tree.get_sc_absence_proof(sc_id).map(|proof| (proof, tree.commitment()))
    }

    /// Read access for queries not mirrored on the handle
    pub fn read(&self) -> RwLockReadGuard<'_, CommitmentTree> { self.inner.read() }

    /// Owned copy of the current tree
    pub fn snapshot(&self) -> CommitmentTree { self.inner.read().clone() }
}
