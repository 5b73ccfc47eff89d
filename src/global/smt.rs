//! Sparse Merkle Tree traits and abstractions
//!
//! This module defines traits for extensible SMT implementations, allowing
//! different hash functions and configurations to be used while maintaining
//! a consistent interface.
//!
//! Depth conventions: the root sits at depth 0 and leaves at depth
//! [`SmtConfig::key_bits`]. The node at depth `d` on the path of an
//! identifier is addressed by the first `d` bits of that identifier; its two
//! children are split by bit `d`.

use crate::field::FieldElement;
use crate::types::{ScCommitment, SidechainId};

/// Gets the bit value at the given depth from a sidechain ID
///
/// Bit 0 is the most significant bit of the first byte of the identifier's
/// canonical serialization.
///
/// # Example
///
/// ```rust
/// use sc_commitment_tree::global::smt::get_bit_at_depth;
/// use sc_commitment_tree::FieldElement;
///
/// let mut bytes = [0u8; 32];
/// bytes[0] = 0b10100000;
/// let sc_id = FieldElement::deserialize(&bytes).unwrap();
///
/// assert_eq!(get_bit_at_depth(&sc_id, 0), 1);
/// assert_eq!(get_bit_at_depth(&sc_id, 1), 0);
/// assert_eq!(get_bit_at_depth(&sc_id, 2), 1);
/// ```
pub fn get_bit_at_depth(sc_id: &SidechainId, depth: usize) -> u8 { sc_id.bit(depth) }

/// Trait for hash functions used in Sparse Merkle Tree operations
///
/// # Example
///
/// ```rust,no_run
/// use sc_commitment_tree::global::smt::SmtHasher;
/// use sc_commitment_tree::FieldElement;
///
/// struct TaggedHasher;
///
/// impl SmtHasher for TaggedHasher {
///     fn hash_leaf(&self, tag: &[u8], sc_id: FieldElement, commitment: FieldElement) -> FieldElement {
///         FieldElement::hash_with_domain(tag, &[sc_id, commitment])
///     }
///
///     fn hash_internal(&self, tag: &[u8], left: FieldElement, right: FieldElement) -> FieldElement {
///         FieldElement::hash_with_domain(tag, &[left, right])
///     }
///
///     fn empty_hash(&self) -> FieldElement { FieldElement::ZERO }
/// }
/// ```
pub trait SmtHasher {
    /// Computes the hash for a leaf node
    ///
    /// The leaf hash binds the sidechain ID to its commitment, so a proof for
    /// one identifier can never be replayed for another.
    fn hash_leaf(
        &self,
        domain_tag: &[u8],
        sc_id: SidechainId,
        commitment: ScCommitment,
    ) -> FieldElement;

    /// Computes the hash for an internal node from its two children
    fn hash_internal(&self, domain_tag: &[u8], left: FieldElement, right: FieldElement)
        -> FieldElement;

    /// Returns the value of an empty subtree of any height
    ///
    /// This must be consistent across all operations: building, incremental
    /// updates and verification all collapse a pair of empty children into
    /// this same value.
    fn empty_hash(&self) -> FieldElement;
}

/// Trait for SMT configuration parameters
///
/// Allows protocol versioning of domain tags and tree depth.
pub trait SmtConfig {
    /// Returns the domain tag for leaf nodes
    fn leaf_domain_tag(&self) -> &[u8];

    /// Returns the domain tag for internal nodes
    fn internal_domain_tag(&self) -> &[u8];

    /// Returns the number of identifier bits addressing a leaf
    ///
    /// This is the depth of the tree and the length of every proof path.
    /// Must lie in `1..=256`; trees reject other values. Identifiers that
    /// agree on all of these bits share a leaf slot, and a tree admits only
    /// one of them. Production configs use all 256 bits.
    fn key_bits(&self) -> usize;
}

/// Provides sibling hashes for Merkle path generation
///
/// Providers return `None` for an empty sibling subtree; the caller
/// substitutes [`SmtHasher::empty_hash`].
pub trait SmtSiblingProvider {
    /// Gets the sibling of the node at `depth` (1..=key_bits) on the path of `sc_id`
    ///
    /// The sibling is the node at the same depth whose prefix differs from
    /// the path prefix only in bit `depth - 1`.
    fn get_sibling_hash(&self, sc_id: &SidechainId, depth: usize) -> Option<FieldElement>;
}

/// Combines two children into their parent
///
/// Two empty children give an empty parent; any other pair is hashed.
pub fn hash_node_with<H: SmtHasher, C: SmtConfig>(
    left: FieldElement,
    right: FieldElement,
    hasher: &H,
    config: &C,
) -> FieldElement {
    let empty = hasher.empty_hash();
    if left == empty && right == empty {
        empty
    } else {
        hasher.hash_internal(config.internal_domain_tag(), left, right)
    }
}
