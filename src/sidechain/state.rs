//! State of a single sidechain

use std::sync::OnceLock;

use super::subtree::{AppendOnlyMerkleTree, EMPTY_SUBTREE_ROOT};
use crate::events::EventKind;
use crate::field::FieldElement;
use crate::types::{ScCommitment, SidechainId, NUM_EVENT_KINDS};

/// The five event sub-trees of one sidechain
#[derive(Clone, Debug)]
pub struct SidechainState {
    sc_id: SidechainId,
    subtrees: [AppendOnlyMerkleTree; NUM_EVENT_KINDS],
    commitment: OnceLock<ScCommitment>,
}

impl SidechainState {
    /// Creates a sidechain with no events
    pub fn new(sc_id: SidechainId) -> Self {
        Self {
            sc_id,
            subtrees: std::array::from_fn(|_| AppendOnlyMerkleTree::new()),
            commitment: OnceLock::new(),
        }
    }

    /// The sidechain identifier
    pub fn sc_id(&self) -> SidechainId { self.sc_id }

    /// Appends a leaf to the sub-tree of `kind`
    pub fn append(&mut self, kind: EventKind, leaf: FieldElement) {
        self.subtrees[kind.slot()].append(leaf);
        self.commitment = OnceLock::new();
    }

    /// Root of the sub-tree of `kind`, or `None` if it has no events
    pub fn sub_commitment(&self, kind: EventKind) -> Option<FieldElement> {
        self.subtrees[kind.slot()].root()
    }

    /// Leaves of the sub-tree of `kind`, in append order
    pub fn leaves(&self, kind: EventKind) -> &[FieldElement] { self.subtrees[kind.slot()].leaves() }

    /// Number of leaves in the sub-tree of `kind`
    pub fn leaf_count(&self, kind: EventKind) -> usize { self.subtrees[kind.slot()].len() }

    /// Total number of events across all kinds
    pub fn event_count(&self) -> usize { self.subtrees.iter().map(AppendOnlyMerkleTree::len).sum() }

    /// The combined commitment `H(scc, fwt, btr, csw, cert)`
    ///
    /// Kinds without events contribute [`EMPTY_SUBTREE_ROOT`].
    pub fn commitment(&self) -> ScCommitment {
        *self.commitment.get_or_init(|| {
            let roots = EventKind::ALL
                .map(|kind| self.sub_commitment(kind).unwrap_or(EMPTY_SUBTREE_ROOT));
            FieldElement::hash(&roots)
        })
    }
}
