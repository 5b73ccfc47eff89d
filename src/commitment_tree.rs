//! The sidechain commitment tree
//!
//! [`CommitmentTree`] ties the pieces together: events become leaves, leaves
//! are appended to their sidechain's sub-trees, and the sidechain's combined
//! commitment is written into the global sparse tree. The global root is the
//! single commitment to everything added so far.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::errors::{CommitmentError, EncodingError, Result};
use crate::events::{
    hash_backward_transfer_request, hash_ceased_sidechain_withdrawal, hash_certificate,
    hash_forward_transfer, hash_sidechain_creation, BackwardTransferRequest,
    CeasedSidechainWithdrawal, Certificate, EventKind, EventRecord, ForwardTransfer, ScCreation,
};
use crate::field::FieldElement;
use crate::global::{
    verify_absence, verify_existence, AbsenceProof, ExistenceProof, SparseCommitmentTree,
};
use crate::sidechain::SidechainState;
use crate::types::{ScCommitment, SidechainId};

/// Accumulator of sidechain events with existence and absence proofs
///
/// Events are only ever appended. Every accepted event changes the
/// commitment of its sidechain and therefore the global root.
#[derive(Clone, Debug, Default)]
pub struct CommitmentTree {
    sidechains: BTreeMap<SidechainId, SidechainState>,
    global: SparseCommitmentTree,
}

impl CommitmentTree {
    /// Creates an empty tree
    pub fn new() -> Self { Self::default() }

    /// Appends `leaf` to the `kind` sub-tree of `sc_id` and updates the global tree
    ///
    /// Every ingestion path goes through here. Nothing changes on error.
    fn try_add_leaf(
        &mut self,
        sc_id: SidechainId,
        kind: EventKind,
        leaf: std::result::Result<FieldElement, EncodingError>,
    ) -> Result<()> {
        let leaf = leaf.map_err(CommitmentError::from)?;
        self.global.check_slot(&sc_id)?;

        let state = self.sidechains.entry(sc_id).or_insert_with(|| SidechainState::new(sc_id));
        state.append(kind, leaf);
        let sc_commitment = state.commitment();

        let root = self.global.insert(sc_id, sc_commitment)?;
        debug!(%sc_id, ?kind, %root, "event added");
        Ok(())
    }

    fn accepted(sc_id: SidechainId, kind: EventKind, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%sc_id, ?kind, %err, "rejected event");
                false
            }
        }
    }

    /// Adds an event to the sub-tree matching its kind
    ///
    /// # Errors
    /// [`CommitmentError::Encoding`] if a fixed-width field has the wrong size.
    /// The tree is left unchanged on error.
    pub fn try_add_event(&mut self, sc_id: SidechainId, record: &EventRecord) -> Result<()> {
        self.try_add_leaf(sc_id, record.kind(), record.commitment())
    }

    /// Adds an event to the `kind` sub-tree
    ///
    /// Returns `false`, leaving the tree unchanged, if the record is malformed
    /// or belongs to a different kind.
    pub fn add_event(&mut self, sc_id: SidechainId, kind: EventKind, record: &EventRecord) -> bool {
        let result = if record.kind() == kind {
            self.try_add_event(sc_id, record)
        } else {
            Err(CommitmentError::KindMismatch { expected: kind, actual: record.kind() }.into())
        };
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a sidechain creation output
    pub fn add_scc(&mut self, sc_id: SidechainId, record: &ScCreation) -> bool {
        let kind = EventKind::ScCreation;
        let result = self.try_add_leaf(sc_id, kind, hash_sidechain_creation(record));
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a forward transfer
    pub fn add_fwt(&mut self, sc_id: SidechainId, record: &ForwardTransfer) -> bool {
        let kind = EventKind::ForwardTransfer;
        let result = self.try_add_leaf(sc_id, kind, hash_forward_transfer(record));
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a backward transfer request
    pub fn add_bwtr(&mut self, sc_id: SidechainId, record: &BackwardTransferRequest) -> bool {
        let kind = EventKind::BackwardTransferRequest;
        let result = self.try_add_leaf(sc_id, kind, hash_backward_transfer_request(record));
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a ceased sidechain withdrawal
    pub fn add_csw(&mut self, sc_id: SidechainId, record: &CeasedSidechainWithdrawal) -> bool {
        let kind = EventKind::CeasedSidechainWithdrawal;
        let result = self.try_add_leaf(sc_id, kind, hash_ceased_sidechain_withdrawal(record));
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a certificate
    pub fn add_cert(&mut self, sc_id: SidechainId, record: &Certificate) -> bool {
        let kind = EventKind::Certificate;
        let result = self.try_add_leaf(sc_id, kind, hash_certificate(record));
        Self::accepted(sc_id, kind, result)
    }

    /// Adds a pre-computed certificate leaf
    pub fn add_cert_leaf(&mut self, sc_id: SidechainId, leaf: FieldElement) -> bool {
        let result = self.try_add_leaf(sc_id, EventKind::Certificate, Ok(leaf));
        Self::accepted(sc_id, EventKind::Certificate, result)
    }

    /// The global root
    ///
    /// An empty tree returns the empty marker.
    pub fn commitment(&self) -> FieldElement { self.global.root() }

    /// Combined commitment of `sc_id`, or `None` if it has no events
    pub fn get_sc_commitment(&self, sc_id: &SidechainId) -> Option<ScCommitment> {
        self.sidechains.get(sc_id).map(SidechainState::commitment)
    }

    /// Root of the `kind` sub-tree of `sc_id`, or `None` if that sub-tree is empty
    pub fn get_sub_commitment(&self, sc_id: &SidechainId, kind: EventKind) -> Option<FieldElement> {
        self.sidechains.get(sc_id)?.sub_commitment(kind)
    }

    /// Root of the sidechain creation sub-tree
    pub fn get_scc_commitment(&self, sc_id: &SidechainId) -> Option<FieldElement> {
        self.get_sub_commitment(sc_id, EventKind::ScCreation)
    }

    /// Root of the forward transfer sub-tree
    pub fn get_fwt_commitment(&self, sc_id: &SidechainId) -> Option<FieldElement> {
        self.get_sub_commitment(sc_id, EventKind::ForwardTransfer)
    }

    /// Root of the backward transfer request sub-tree
    pub fn get_bwtr_commitment(&self, sc_id: &SidechainId) -> Option<FieldElement> {
        self.get_sub_commitment(sc_id, EventKind::BackwardTransferRequest)
    }

    /// Root of the ceased sidechain withdrawal sub-tree
    pub fn get_csw_commitment(&self, sc_id: &SidechainId) -> Option<FieldElement> {
        self.get_sub_commitment(sc_id, EventKind::CeasedSidechainWithdrawal)
    }

    /// Root of the certificate sub-tree
    pub fn get_cert_commitment(&self, sc_id: &SidechainId) -> Option<FieldElement> {
        self.get_sub_commitment(sc_id, EventKind::Certificate)
    }

    /// Leaves of the `kind` sub-tree of `sc_id`, in append order
    pub fn get_leaves(&self, sc_id: &SidechainId, kind: EventKind) -> Option<&[FieldElement]> {
        self.sidechains.get(sc_id).map(|state| state.leaves(kind))
    }

    /// Number of leaves in the `kind` sub-tree of `sc_id`
    ///
    /// `None` if the sidechain is unknown, `Some(0)` if only other kinds have events.
    pub fn get_leaf_count(&self, sc_id: &SidechainId, kind: EventKind) -> Option<usize> {
        self.sidechains.get(sc_id).map(|state| state.leaf_count(kind))
    }

    /// Proof that the commitment of `sc_id` is in the tree, or `None` if it is unknown
    pub fn get_sc_existence_proof(&self, sc_id: &SidechainId) -> Option<ExistenceProof> {
        self.global.existence_proof(sc_id)
    }

    /// Proof that `sc_id` is not in the tree, or `None` if it is present
    pub fn get_sc_absence_proof(&self, sc_id: &SidechainId) -> Option<AbsenceProof> {
        self.global.absence_proof(sc_id)
    }

    /// Verifies that `sc_commitment` is the commitment of `proof.sc_id` under `root`
    pub fn verify_sc_commitment(
        sc_commitment: ScCommitment,
        proof: &ExistenceProof,
        root: FieldElement,
    ) -> bool {
        verify_existence(sc_commitment, proof, root)
    }

    /// Verifies that `sc_id` is absent under `root`
    pub fn verify_sc_absence(sc_id: &SidechainId, proof: &AbsenceProof, root: FieldElement) -> bool {
        verify_absence(sc_id, proof, root)
    }

    /// State of one sidechain
    pub fn sidechain(&self, sc_id: &SidechainId) -> Option<&SidechainState> {
        self.sidechains.get(sc_id)
    }

    /// Identifiers of all sidechains with at least one event, in order
    pub fn sidechain_ids(&self) -> impl Iterator<Item = &SidechainId> + '_ {
        self.sidechains.keys()
    }

    /// Number of sidechains
    pub fn len(&self) -> usize { self.sidechains.len() }

    /// Whether no event has been added
    pub fn is_empty(&self) -> bool { self.sidechains.is_empty() }
}
