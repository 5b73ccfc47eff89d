//! Merkle proof generation and verification
//!
//! Verification is stateless: it needs only the claimed value, the proof,
//! the root, and the hasher/config pair the tree was built with. Malformed
//! proofs verify as `false`.

use super::config::DEFAULT_CONFIG;
use super::hasher::DEFAULT_HASHER;
use super::types::{AbsenceProof, ExistenceProof, MerklePath};
use crate::field::FieldElement;
use crate::global::smt::{
    get_bit_at_depth, hash_node_with, SmtConfig, SmtHasher, SmtSiblingProvider,
};
use crate::types::{ScCommitment, SidechainId};

/// Generates the Merkle path of `sc_id` using a sibling hash provider
///
/// Siblings are collected from the leaf level (depth `key_bits`) up to the
/// children of the root (depth 1). Empty siblings become the empty hash.
pub fn generate_merkle_path<H: SmtHasher, C: SmtConfig, P: SmtSiblingProvider>(
    sc_id: &SidechainId,
    hasher: &H,
    config: &C,
    provider: &P,
) -> MerklePath {
    let empty = hasher.empty_hash();
    let siblings = (1..=config.key_bits())
        .rev()
        .map(|depth| provider.get_sibling_hash(sc_id, depth).unwrap_or(empty))
        .collect();
    MerklePath { siblings }
}

/// Folds a path from a leaf-level value up to a root
///
/// Returns `None` if the path length does not match the tree depth.
fn fold_path<H: SmtHasher, C: SmtConfig>(
    sc_id: &SidechainId,
    leaf_value: FieldElement,
    path: &MerklePath,
    hasher: &H,
    config: &C,
) -> Option<FieldElement> {
    let key_bits = config.key_bits();
    if path.len() != key_bits {
        return None;
    }

    let mut current = leaf_value;
    for (level, sibling) in path.siblings.iter().enumerate() {
        // The parent of a node `level` levels above the leaf splits on this bit.
        let depth = key_bits - 1 - level;
        current = if get_bit_at_depth(sc_id, depth) == 0 {
            hash_node_with(current, *sibling, hasher, config)
        } else {
            hash_node_with(*sibling, current, hasher, config)
        };
    }
    Some(current)
}

/// Verifies that `commitment` is the leaf of `proof.sc_id` under `root`
///
/// # Arguments
/// * `commitment` - The claimed sidechain commitment
/// * `proof` - The existence proof
/// * `root` - The expected global root
///
/// # Returns
/// `true` if the proof is valid, `false` otherwise
pub fn verify_existence(
    commitment: ScCommitment,
    proof: &ExistenceProof,
    root: FieldElement,
) -> bool {
    verify_existence_with(commitment, proof, root, &DEFAULT_HASHER, &DEFAULT_CONFIG)
}

/// Verifies an existence proof with custom hasher and config
pub fn verify_existence_with<H: SmtHasher, C: SmtConfig>(
    commitment: ScCommitment,
    proof: &ExistenceProof,
    root: FieldElement,
    hasher: &H,
    config: &C,
) -> bool {
    let leaf_hash = hasher.hash_leaf(config.leaf_domain_tag(), proof.sc_id, commitment);
    fold_path(&proof.sc_id, leaf_hash, &proof.path, hasher, config) == Some(root)
}

/// Verifies that the leaf slot of `sc_id` is empty under `root`
///
/// # Arguments
/// * `sc_id` - The sidechain claimed absent
/// * `proof` - The absence proof; it must be for `sc_id`
/// * `root` - The expected global root
///
/// # Returns
/// `true` if the proof is valid, `false` otherwise
pub fn verify_absence(sc_id: &SidechainId, proof: &AbsenceProof, root: FieldElement) -> bool {
    verify_absence_with(sc_id, proof, root, &DEFAULT_HASHER, &DEFAULT_CONFIG)
}

/// Verifies an absence proof with custom hasher and config
pub fn verify_absence_with<H: SmtHasher, C: SmtConfig>(
    sc_id: &SidechainId,
    proof: &AbsenceProof,
    root: FieldElement,
    hasher: &H,
    config: &C,
) -> bool {
    if proof.sc_id != *sc_id {
        return false;
    }
    fold_path(sc_id, hasher.empty_hash(), &proof.path, hasher, config) == Some(root)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::global::builder::{build_smt_node_with, build_smt_root_with};
    use crate::global::keys::{encode_node_key, encode_sibling_node_key};
    use crate::global::{Poseidon2Hasher, SidechainTreeV0Config};

    struct TestConfig;

    impl SmtConfig for TestConfig {
        fn leaf_domain_tag(&self) -> &[u8] { b"SCT_SC_v0" }

        fn internal_domain_tag(&self) -> &[u8] { b"SCT_GLOBAL_v0" }

        fn key_bits(&self) -> usize { 3 }
    }

    /// Provider that recomputes siblings from the full commitment map
    struct MapProvider<'a, C: SmtConfig> {
        commitments: &'a BTreeMap<SidechainId, ScCommitment>,
        config: &'a C,
    }

    impl<C: SmtConfig> SmtSiblingProvider for MapProvider<'_, C> {
        fn get_sibling_hash(&self, sc_id: &SidechainId, depth: usize) -> Option<FieldElement> {
            let sibling_key = encode_sibling_node_key(sc_id, depth);
            let entries: Vec<_> = self
                .commitments
                .iter()
                .filter(|(id, _)| encode_node_key(id, depth) == sibling_key)
                .map(|(id, c)| (*id, *c))
                .collect();
            if entries.is_empty() {
                return None;
            }
            Some(build_smt_node_with(&entries, depth, &Poseidon2Hasher, self.config))
        }
    }

    fn id_from_first_byte(byte: u8) -> SidechainId {
        let mut bytes = [0u8; 32];
        bytes[0] = byte;
        FieldElement::deserialize(&bytes).expect("canonical bytes should decode")
    }

    #[test]
    fn test_generate_and_verify_small_tree() {
        let hasher = Poseidon2Hasher;
        let config = TestConfig;
        let mut commitments = BTreeMap::new();
        commitments.insert(id_from_first_byte(0b0010_0000), FieldElement::from_u64(1));
        commitments.insert(id_from_first_byte(0b1010_0000), FieldElement::from_u64(2));
        commitments.insert(id_from_first_byte(0b1110_0000), FieldElement::from_u64(3));
        let root = build_smt_root_with(&commitments, &hasher, &config);
        let provider = MapProvider { commitments: &commitments, config: &config };

        for (sc_id, commitment) in &commitments {
            let path = generate_merkle_path(sc_id, &hasher, &config, &provider);
            let proof = ExistenceProof { sc_id: *sc_id, path };

            assert!(verify_existence_with(*commitment, &proof, root, &hasher, &config));
            assert!(!verify_existence_with(
                FieldElement::from_u64(99),
                &proof,
                root,
                &hasher,
                &config
            ));
        }

        let missing = id_from_first_byte(0b0100_0000);
        let path = generate_merkle_path(&missing, &hasher, &config, &provider);
        let absence = AbsenceProof { sc_id: missing, path };
        assert!(verify_absence_with(&missing, &absence, root, &hasher, &config));

        let present = id_from_first_byte(0b1010_0000);
        let path = generate_merkle_path(&present, &hasher, &config, &provider);
        let forged = AbsenceProof { sc_id: present, path };
        assert!(!verify_absence_with(&present, &forged, root, &hasher, &config));
    }

    #[test]
    fn test_wrong_length_path_rejected() {
        let sc_id = FieldElement::from_u64(1);
        let commitment = FieldElement::from_u64(2);
        let mut commitments = BTreeMap::new();
        commitments.insert(sc_id, commitment);
        let root = build_smt_root_with(&commitments, &Poseidon2Hasher, &SidechainTreeV0Config);
        let short = ExistenceProof { sc_id, path: MerklePath { siblings: vec![] } };

        assert!(!verify_existence(commitment, &short, root));
        assert!(!verify_absence(
            &sc_id,
            &AbsenceProof { sc_id, path: MerklePath { siblings: vec![FieldElement::ZERO; 255] } },
            root
        ));
    }

    #[test]
    fn test_empty_tree_absence() {
        let sc_id = FieldElement::from_u64(5);
        let path = MerklePath { siblings: vec![FieldElement::ZERO; 256] };
        let proof = AbsenceProof { sc_id, path };

        assert!(verify_absence(&sc_id, &proof, FieldElement::ZERO));
        assert!(!verify_absence(&FieldElement::from_u64(6), &proof, FieldElement::ZERO));
    }
}
