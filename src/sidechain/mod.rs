//! Per-sidechain aggregation
//!
//! Each sidechain owns one append-only Merkle tree per event kind. The five
//! sub-tree roots are combined, in slot order, into the sidechain commitment
//! stored in the global tree.

mod state;
mod subtree;

pub use state::SidechainState;
pub use subtree::{AppendOnlyMerkleTree, EMPTY_SUBTREE_ROOT};
