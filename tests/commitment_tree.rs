//! End-to-end tests: event ingestion, roots, and existence/absence proofs

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sc_commitment_tree::events::{
    BackwardTransfer, BackwardTransferRequest, CeasedSidechainWithdrawal, Certificate,
    ForwardTransfer, ScCreation,
};
use sc_commitment_tree::global::MerklePath;
use sc_commitment_tree::{
    AbsenceProof, CommitmentTree, EventKind, EventRecord, ExistenceProof, FieldElement,
    SchnorrSignature, SidechainId,
};

fn sc_id(byte: u8) -> SidechainId { FieldElement::hash_bytes(&[byte]) }

fn forward_transfer(amount: u64) -> ForwardTransfer {
    ForwardTransfer {
        amount,
        recipient_key_hash: vec![0x11; 32],
        tx_hash: vec![0x22; 32],
        out_idx: 0,
    }
}

fn backward_transfer_request(rng: &mut SmallRng) -> BackwardTransferRequest {
    BackwardTransferRequest {
        amount: 25,
        recipient_key_hash: vec![0x33; 32],
        request_data: vec![FieldElement::random(rng), FieldElement::random(rng)],
        tx_hash: vec![0x44; 32],
        out_idx: 1,
    }
}

fn ceased_sidechain_withdrawal(rng: &mut SmallRng) -> CeasedSidechainWithdrawal {
    CeasedSidechainWithdrawal {
        amount: 40,
        nullifier: FieldElement::random(rng),
        recipient_key_hash: vec![0x55; 32],
        cert_data_hash: FieldElement::random(rng),
    }
}

fn sidechain_creation(rng: &mut SmallRng) -> ScCreation {
    ScCreation {
        amount: 1_000,
        owner_key_hash: vec![0x66; 32],
        withdrawal_epoch_length: 100,
        custom_data: vec![1, 2, 3, 4, 5],
        constant: Some(FieldElement::random(rng)),
        cert_vk: vec![0x77; 64],
        btr_vk: None,
        csw_vk: None,
        tx_hash: vec![0x88; 32],
        out_idx: 2,
    }
}

fn certificate(rng: &mut SmallRng, backward_transfers: Vec<BackwardTransfer>) -> Certificate {
    Certificate {
        epoch: 3,
        quality: 10,
        cert_data_hash: FieldElement::random(rng),
        backward_transfers,
        bt_merkle_root: FieldElement::random(rng),
        cumulative_comm_tree_hash: FieldElement::random(rng),
    }
}

#[test]
fn test_forward_transfer_then_withdrawal_scenario() -> Result<()> {
    let mut tree = CommitmentTree::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let (s, r, z) = (sc_id(1), sc_id(2), sc_id(3));

    let root_empty = tree.commitment();
    assert_eq!(root_empty, FieldElement::ZERO);

    assert!(tree.add_fwt(s, &forward_transfer(100)));
    let root_a = tree.commitment();
    assert_ne!(root_a, root_empty);
    assert!(tree.get_fwt_commitment(&s).is_some());
    assert!(tree.get_bwtr_commitment(&s).is_none());
    let proof = tree.get_sc_existence_proof(&s).ok_or_else(|| anyhow::anyhow!("S is present"))?;
    let sc_commitment =
        tree.get_sc_commitment(&s).ok_or_else(|| anyhow::anyhow!("S has a commitment"))?;
    assert!(CommitmentTree::verify_sc_commitment(sc_commitment, &proof, root_a));
    assert!(tree.get_sc_absence_proof(&s).is_none());

    assert!(tree.add_csw(r, &ceased_sidechain_withdrawal(&mut rng)));
    let root_b = tree.commitment();
    assert_ne!(root_b, root_a);
    let absence = tree.get_sc_absence_proof(&z).ok_or_else(|| anyhow::anyhow!("Z is absent"))?;
    assert!(CommitmentTree::verify_sc_absence(&z, &absence, root_b));
    assert!(tree.get_sc_existence_proof(&z).is_none());

    // The old proof for S is stale once R changes the root.
    assert!(!CommitmentTree::verify_sc_commitment(sc_commitment, &proof, root_b));
    Ok(())
}

#[test]
fn test_empty_tree_proves_absence() -> Result<()> {
    let tree = CommitmentTree::new();

    for byte in 0..4 {
        let id = sc_id(byte);
        let proof = tree.get_sc_absence_proof(&id).ok_or_else(|| anyhow::anyhow!("absent"))?;
        assert!(CommitmentTree::verify_sc_absence(&id, &proof, tree.commitment()));
        assert!(tree.get_sc_existence_proof(&id).is_none());
    }
    Ok(())
}

#[test]
fn test_every_kind_is_accepted() -> Result<()> {
    let mut tree = CommitmentTree::new();
    let mut rng = SmallRng::seed_from_u64(2);
    let ids: Vec<_> = (10..16).map(sc_id).collect();

    for (id, kind) in ids.iter().zip(EventKind::ALL) {
        assert!(tree.get_sub_commitment(id, kind).is_none());
    }

    let mut roots = vec![tree.commitment()];
    assert!(tree.add_fwt(ids[0], &forward_transfer(5)));
    roots.push(tree.commitment());
    assert!(tree.add_bwtr(ids[1], &backward_transfer_request(&mut rng)));
    roots.push(tree.commitment());
    assert!(tree.add_csw(ids[2], &ceased_sidechain_withdrawal(&mut rng)));
    roots.push(tree.commitment());
    assert!(tree.add_scc(ids[3], &sidechain_creation(&mut rng)));
    roots.push(tree.commitment());
    let transfers = vec![BackwardTransfer { recipient_key_hash: vec![9; 32], amount: 3 }];
    assert!(tree.add_cert(ids[4], &certificate(&mut rng, transfers)));
    roots.push(tree.commitment());
    assert!(tree.add_cert_leaf(ids[5], FieldElement::random(&mut rng)));
    roots.push(tree.commitment());

    for pair in roots.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert!(tree.get_fwt_commitment(&ids[0]).is_some());
    assert!(tree.get_bwtr_commitment(&ids[1]).is_some());
    assert!(tree.get_csw_commitment(&ids[2]).is_some());
    assert!(tree.get_scc_commitment(&ids[3]).is_some());
    assert!(tree.get_cert_commitment(&ids[4]).is_some());
    assert!(tree.get_cert_commitment(&ids[5]).is_some());
    assert_eq!(tree.len(), 6);

    let root = tree.commitment();
    for id in &ids {
        let proof = tree.get_sc_existence_proof(id).ok_or_else(|| anyhow::anyhow!("present"))?;
        let commitment = tree.get_sc_commitment(id).ok_or_else(|| anyhow::anyhow!("present"))?;
        assert!(CommitmentTree::verify_sc_commitment(commitment, &proof, root));
        assert!(tree.get_sc_absence_proof(id).is_none());
    }

    let absent = sc_id(99);
    let absence = tree.get_sc_absence_proof(&absent).ok_or_else(|| anyhow::anyhow!("absent"))?;
    assert!(CommitmentTree::verify_sc_absence(&absent, &absence, root));
    Ok(())
}

#[test]
fn test_building_twice_is_deterministic() {
    let build = || {
        let mut tree = CommitmentTree::new();
        let mut rng = SmallRng::seed_from_u64(3);
        tree.add_scc(sc_id(1), &sidechain_creation(&mut rng));
        tree.add_fwt(sc_id(1), &forward_transfer(7));
        tree.add_bwtr(sc_id(2), &backward_transfer_request(&mut rng));
        tree.commitment()
    };

    assert_eq!(build(), build());
}

#[test]
fn test_order_matters_within_a_sidechain() {
    let id = sc_id(1);
    let mut forward = CommitmentTree::new();
    let mut reverse = CommitmentTree::new();

    for amount in [1, 2, 3] {
        forward.add_fwt(id, &forward_transfer(amount));
    }
    for amount in [3, 2, 1] {
        reverse.add_fwt(id, &forward_transfer(amount));
    }

    assert_ne!(forward.get_sc_commitment(&id), reverse.get_sc_commitment(&id));
    assert_ne!(forward.commitment(), reverse.commitment());
}

#[test]
fn test_order_does_not_matter_across_sidechains() {
    let (a, b) = (sc_id(1), sc_id(2));
    let mut rng = SmallRng::seed_from_u64(4);
    let withdrawal = ceased_sidechain_withdrawal(&mut rng);
    let mut a_first = CommitmentTree::new();
    let mut b_first = CommitmentTree::new();

    a_first.add_fwt(a, &forward_transfer(1));
    a_first.add_fwt(a, &forward_transfer(2));
    a_first.add_csw(b, &withdrawal);

    b_first.add_csw(b, &withdrawal);
    b_first.add_fwt(a, &forward_transfer(1));
    b_first.add_fwt(a, &forward_transfer(2));

    assert_eq!(a_first.commitment(), b_first.commitment());
}

#[test]
fn test_cert_leaf_paths_agree_and_bind_id() {
    let id = sc_id(1);
    let leaf = FieldElement::from_u64(5);
    let mut as_cert = CommitmentTree::new();
    let mut as_event = CommitmentTree::new();

    as_cert.add_cert_leaf(id, leaf);
    as_event.add_event(id, EventKind::Certificate, &EventRecord::CertificateLeaf(leaf));
    let mut other = CommitmentTree::new();
    other.add_cert_leaf(sc_id(2), leaf);

    assert_eq!(as_cert.commitment(), as_event.commitment());
    assert_ne!(as_cert.commitment(), other.commitment());
    assert!(as_cert.get_fwt_commitment(&id).is_none());
}

#[test]
fn test_wrong_width_fields_are_rejected() {
    let mut tree = CommitmentTree::new();
    let mut rng = SmallRng::seed_from_u64(5);
    let id = sc_id(1);

    let mut fwt = forward_transfer(1);
    fwt.recipient_key_hash.truncate(31);
    assert!(!tree.add_fwt(id, &fwt));

    let mut scc = sidechain_creation(&mut rng);
    scc.tx_hash = vec![0; 33];
    assert!(!tree.add_scc(id, &scc));

    let bad_transfer = BackwardTransfer { recipient_key_hash: vec![0; 20], amount: 1 };
    assert!(!tree.add_cert(id, &certificate(&mut rng, vec![bad_transfer])));

    assert!(tree.try_add_event(id, &EventRecord::ForwardTransfer(fwt)).is_err());
    assert!(tree.is_empty());
    assert_eq!(tree.commitment(), FieldElement::ZERO);
}

#[test]
fn test_tampered_proofs_fail() -> Result<()> {
    let mut tree = CommitmentTree::new();
    let (present, absent) = (sc_id(1), sc_id(2));
    tree.add_fwt(present, &forward_transfer(1));
    tree.add_fwt(sc_id(3), &forward_transfer(2));
    let root = tree.commitment();
    let commitment = tree.get_sc_commitment(&present).ok_or_else(|| anyhow::anyhow!("present"))?;

    let proof = tree.get_sc_existence_proof(&present).ok_or_else(|| anyhow::anyhow!("present"))?;
    let mut tampered = proof.clone();
    tampered.path.siblings[0] = FieldElement::from_u64(1);
    assert!(!CommitmentTree::verify_sc_commitment(commitment, &tampered, root));

    let mut wrong_id = proof.clone();
    wrong_id.sc_id = absent;
    assert!(!CommitmentTree::verify_sc_commitment(commitment, &wrong_id, root));

    let mut short = proof.clone();
    short.path.siblings.pop();
    assert!(!CommitmentTree::verify_sc_commitment(commitment, &short, root));

    let absence = tree.get_sc_absence_proof(&absent).ok_or_else(|| anyhow::anyhow!("absent"))?;
    assert!(!CommitmentTree::verify_sc_absence(&present, &absence, root));
    let mut long = absence.clone();
    long.path.siblings.push(FieldElement::ZERO);
    assert!(!CommitmentTree::verify_sc_absence(&absent, &long, root));

    // An existence path reused as an absence proof must not verify.
    let forged = AbsenceProof { sc_id: present, path: proof.path.clone() };
    assert!(!CommitmentTree::verify_sc_absence(&present, &forged, root));
    Ok(())
}

#[test]
fn test_proofs_round_trip_through_bytes() -> Result<()> {
    let mut tree = CommitmentTree::new();
    let id = sc_id(1);
    tree.add_fwt(id, &forward_transfer(1));
    let root = tree.commitment();

    let existence = tree.get_sc_existence_proof(&id).ok_or_else(|| anyhow::anyhow!("present"))?;
    let bytes = existence.to_bytes();
    assert_eq!(bytes.len(), 32 * 257);
    let decoded = ExistenceProof::from_bytes(&bytes)?;
    assert_eq!(decoded, existence);
    assert_eq!(decoded.to_bytes(), bytes);

    let absent = sc_id(2);
    let absence = tree.get_sc_absence_proof(&absent).ok_or_else(|| anyhow::anyhow!("absent"))?;
    let decoded = AbsenceProof::from_bytes(&absence.to_bytes())?;
    assert!(CommitmentTree::verify_sc_absence(&absent, &decoded, root));

    assert!(ExistenceProof::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    let json = serde_json::to_string(&existence)?;
    assert_eq!(serde_json::from_str::<ExistenceProof>(&json)?, existence);
    Ok(())
}

#[test]
fn test_empty_path_never_verifies() {
    let id = sc_id(1);
    let proof = AbsenceProof { sc_id: id, path: MerklePath { siblings: vec![] } };

    assert!(!CommitmentTree::verify_sc_absence(&id, &proof, FieldElement::ZERO));
}

#[test]
fn test_signed_root_verifies() -> Result<()> {
    use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};

    let mut tree = CommitmentTree::new();
    tree.add_fwt(sc_id(1), &forward_transfer(100));
    let secret_key = SecretKey::from_slice(&[0x42; 32])?;
    let public_key = PublicKey::from_secret_key(&Secp256k1::new(), &secret_key);

    let signature = SchnorrSignature::sign(&secret_key, &tree.commitment())?;
    let decoded = SchnorrSignature::deserialize(&signature.serialize(), true)?;

    assert!(decoded.verify(&public_key, &tree.commitment()));
    tree.add_fwt(sc_id(1), &forward_transfer(100));
    assert!(!decoded.verify(&public_key, &tree.commitment()));
    Ok(())
}
