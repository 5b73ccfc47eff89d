//! Hasher implementations for SMT operations

use crate::field::FieldElement;
use crate::global::smt::SmtHasher;
use crate::types::{ScCommitment, SidechainId};

/// Poseidon2 hasher implementation for SMT operations
///
/// Leaves hash `(sc_id, commitment)` and internal nodes hash `(left, right)`,
/// each under the domain tag supplied by the configuration. Empty subtrees
/// are [`FieldElement::ZERO`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Poseidon2Hasher;

impl SmtHasher for Poseidon2Hasher {
    fn hash_leaf(
        &self,
        domain_tag: &[u8],
        sc_id: SidechainId,
        commitment: ScCommitment,
    ) -> FieldElement {
        FieldElement::hash_with_domain(domain_tag, &[sc_id, commitment])
    }

    fn hash_internal(&self, domain_tag: &[u8], left: FieldElement, right: FieldElement) -> FieldElement {
        FieldElement::hash_with_domain(domain_tag, &[left, right])
    }

    fn empty_hash(&self) -> FieldElement { FieldElement::ZERO }
}

/// Default hasher instance (Poseidon2)
pub(crate) const DEFAULT_HASHER: Poseidon2Hasher = Poseidon2Hasher;
