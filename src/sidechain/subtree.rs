//! Append-only binary Merkle tree
//!
//! Leaves are kept in append order and the tree is padded on the right to the
//! next power of two. Internally the tree keeps a frontier: for every set bit
//! `h` of the leaf count, the root of the complete subtree of `2^h` leaves that
//! is still waiting for a right sibling. Appends cost O(log n) hashes and the
//! root is folded from the frontier on demand.

use std::sync::OnceLock;

use crate::field::FieldElement;
use crate::types::{SUBTREE_LEAF_DOMAIN_TAG, SUBTREE_NODE_DOMAIN_TAG};

/// Root of an empty sub-tree and padding value of empty leaf slots
pub const EMPTY_SUBTREE_ROOT: FieldElement = FieldElement::ZERO;

const MAX_HEIGHT: usize = usize::BITS as usize;

static EMPTY_ROOTS: OnceLock<Vec<FieldElement>> = OnceLock::new();

/// Root of a fully padded subtree of height `height`
fn empty_root(height: usize) -> FieldElement {
    let roots = EMPTY_ROOTS.get_or_init(|| {
        let mut roots = Vec::with_capacity(MAX_HEIGHT + 1);
        let mut node = EMPTY_SUBTREE_ROOT;
        roots.push(node);
        for _ in 0..MAX_HEIGHT {
            node = hash_node(node, node);
            roots.push(node);
        }
        roots
    });
    roots[height]
}

pub(crate) fn hash_leaf(leaf: FieldElement) -> FieldElement {
    FieldElement::hash_with_domain(SUBTREE_LEAF_DOMAIN_TAG, &[leaf])
}

pub(crate) fn hash_node(left: FieldElement, right: FieldElement) -> FieldElement {
    FieldElement::hash_with_domain(SUBTREE_NODE_DOMAIN_TAG, &[left, right])
}

/// An append-only Merkle tree over field element leaves
#[derive(Clone, Debug, Default)]
pub struct AppendOnlyMerkleTree {
    leaves: Vec<FieldElement>,
    frontier: Vec<Option<FieldElement>>,
    root: OnceLock<FieldElement>,
}

impl AppendOnlyMerkleTree {
    /// Creates an empty tree
    pub fn new() -> Self { Self::default() }

    /// Appends a leaf and invalidates the cached root
    pub fn append(&mut self, leaf: FieldElement) {
        self.leaves.push(leaf);

        let mut node = hash_leaf(leaf);
        let mut height = 0;
        while let Some(slot) = self.frontier.get_mut(height) {
            match slot.take() {
                Some(left) => {
                    node = hash_node(left, node);
                    height += 1;
                }
                None => break,
            }
        }
        if height == self.frontier.len() {
            self.frontier.push(None);
        }
        self.frontier[height] = Some(node);

        self.root = OnceLock::new();
    }

    /// The leaves in append order
    pub fn leaves(&self) -> &[FieldElement] { &self.leaves }

    /// Number of appended leaves
    pub fn len(&self) -> usize { self.leaves.len() }

    /// Whether no leaf has been appended
    pub fn is_empty(&self) -> bool { self.leaves.is_empty() }

    /// The tree root, or `None` for an empty tree
    pub fn root(&self) -> Option<FieldElement> {
        if self.is_empty() {
            return None;
        }
        Some(*self.root.get_or_init(|| self.compute_root()))
    }

    fn compute_root(&self) -> FieldElement {
        let count = self.leaves.len();
        if count == 0 {
            return EMPTY_SUBTREE_ROOT;
        }
        if count.is_power_of_two() {
            let height = count.trailing_zeros() as usize;
            return self.frontier[height].unwrap_or(EMPTY_SUBTREE_ROOT);
        }

        let depth = count.next_power_of_two().trailing_zeros() as usize;
        let mut acc: Option<FieldElement> = None;
        for height in 0..depth {
            let pending = self.frontier.get(height).copied().flatten();
            acc = match (pending, acc) {
                (Some(left), Some(right)) => Some(hash_node(left, right)),
                (Some(left), None) => Some(hash_node(left, empty_root(height))),
                (None, Some(left)) => Some(hash_node(left, empty_root(height))),
                (None, None) => None,
            };
        }
        acc.unwrap_or(EMPTY_SUBTREE_ROOT)
    }
}
