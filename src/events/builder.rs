//! Leaf commitment builders
//!
//! Every builder prefixes its kind's domain tag and then absorbs the fields in
//! declaration order. Amounts, indices, epochs and quality are fixed-width
//! integers; 32-byte hashes pack into two elements; variable-length byte
//! strings are committed with their length.

use std::sync::OnceLock;

use super::records::{
    BackwardTransfer, BackwardTransferRequest, CeasedSidechainWithdrawal, Certificate, EventRecord,
    ForwardTransfer, ScCreation,
};
use crate::errors::EncodingError;
use crate::field::FieldElement;
use crate::types::{
    ABSENT_DOMAIN_TAG, BTR_DOMAIN_TAG, BT_DOMAIN_TAG, CERT_DOMAIN_TAG, CSW_DOMAIN_TAG,
    FWT_DOMAIN_TAG, HASH_SIZE, SCC_DOMAIN_TAG,
};

static ABSENT_SENTINEL: OnceLock<FieldElement> = OnceLock::new();

/// The value committed in place of an absent optional field
pub fn absent_sentinel() -> FieldElement {
    *ABSENT_SENTINEL.get_or_init(|| FieldElement::hash_with_domain(ABSENT_DOMAIN_TAG, &[]))
}

/// Checks the width of a 32-byte hash field and packs it
fn packed_hash(field: &'static str, bytes: &[u8]) -> Result<Vec<FieldElement>, EncodingError> {
    if bytes.len() != HASH_SIZE {
        return Err(EncodingError::InvalidLength {
            field,
            expected: HASH_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(FieldElement::pack_bytes(bytes))
}

fn optional_bytes(bytes: Option<&[u8]>) -> FieldElement {
    bytes.map_or_else(absent_sentinel, FieldElement::hash_bytes)
}

/// Computes the leaf of a sidechain creation output
pub fn hash_sidechain_creation(record: &ScCreation) -> Result<FieldElement, EncodingError> {
    let mut inputs = Vec::with_capacity(12);
    inputs.push(FieldElement::from_u64(record.amount));
    inputs.extend(packed_hash("owner key hash", &record.owner_key_hash)?);
    inputs.push(FieldElement::from_u32(record.withdrawal_epoch_length));
    inputs.push(FieldElement::hash_bytes(&record.custom_data));
    inputs.push(record.constant.map_or_else(absent_sentinel, |c| FieldElement::hash(&[c])));
    inputs.push(FieldElement::hash_bytes(&record.cert_vk));
    inputs.push(optional_bytes(record.btr_vk.as_deref()));
    inputs.push(optional_bytes(record.csw_vk.as_deref()));
    inputs.extend(packed_hash("transaction hash", &record.tx_hash)?);
    inputs.push(FieldElement::from_u32(record.out_idx));

    Ok(FieldElement::hash_with_domain(SCC_DOMAIN_TAG, &inputs))
}

/// Computes the leaf of a forward transfer
pub fn hash_forward_transfer(record: &ForwardTransfer) -> Result<FieldElement, EncodingError> {
    let mut inputs = Vec::with_capacity(6);
    inputs.push(FieldElement::from_u64(record.amount));
    inputs.extend(packed_hash("recipient key hash", &record.recipient_key_hash)?);
    inputs.extend(packed_hash("transaction hash", &record.tx_hash)?);
    inputs.push(FieldElement::from_u32(record.out_idx));

    Ok(FieldElement::hash_with_domain(FWT_DOMAIN_TAG, &inputs))
}

/// Computes the leaf of a backward transfer request
pub fn hash_backward_transfer_request(
    record: &BackwardTransferRequest,
) -> Result<FieldElement, EncodingError> {
    let mut inputs = Vec::with_capacity(7);
    inputs.push(FieldElement::from_u64(record.amount));
    inputs.extend(packed_hash("recipient key hash", &record.recipient_key_hash)?);
    inputs.push(FieldElement::hash(&record.request_data));
    inputs.extend(packed_hash("transaction hash", &record.tx_hash)?);
    inputs.push(FieldElement::from_u32(record.out_idx));

    Ok(FieldElement::hash_with_domain(BTR_DOMAIN_TAG, &inputs))
}

/// Computes the leaf of a ceased sidechain withdrawal
pub fn hash_ceased_sidechain_withdrawal(
    record: &CeasedSidechainWithdrawal,
) -> Result<FieldElement, EncodingError> {
    let mut inputs = Vec::with_capacity(5);
    inputs.push(FieldElement::from_u64(record.amount));
    inputs.push(record.nullifier);
    inputs.extend(packed_hash("recipient key hash", &record.recipient_key_hash)?);
    inputs.push(record.cert_data_hash);

    Ok(FieldElement::hash_with_domain(CSW_DOMAIN_TAG, &inputs))
}

fn hash_backward_transfer(bt: &BackwardTransfer) -> Result<FieldElement, EncodingError> {
    let mut inputs = packed_hash("backward transfer key hash", &bt.recipient_key_hash)?;
    inputs.push(FieldElement::from_u64(bt.amount));
    Ok(FieldElement::hash_with_domain(BT_DOMAIN_TAG, &inputs))
}

/// Computes the leaf of a certificate
pub fn hash_certificate(record: &Certificate) -> Result<FieldElement, EncodingError> {
    let bt_leaves = record
        .backward_transfers
        .iter()
        .map(hash_backward_transfer)
        .collect::<Result<Vec<_>, _>>()?;

    let inputs = [
        FieldElement::from_u32(record.epoch),
        FieldElement::from_u64(record.quality),
        record.cert_data_hash,
        FieldElement::hash(&bt_leaves),
        record.bt_merkle_root,
        record.cumulative_comm_tree_hash,
    ];

    Ok(FieldElement::hash_with_domain(CERT_DOMAIN_TAG, &inputs))
}

/// Computes the leaf of any event record
///
/// # Errors
/// [`EncodingError::InvalidLength`] if a fixed-width field has the wrong size.
pub fn build_leaf(record: &EventRecord) -> Result<FieldElement, EncodingError> {
    match record {
        EventRecord::ScCreation(scc) => hash_sidechain_creation(scc),
        EventRecord::ForwardTransfer(fwt) => hash_forward_transfer(fwt),
        EventRecord::BackwardTransferRequest(btr) => hash_backward_transfer_request(btr),
        EventRecord::CeasedSidechainWithdrawal(csw) => hash_ceased_sidechain_withdrawal(csw),
        EventRecord::Certificate(cert) => hash_certificate(cert),
        EventRecord::CertificateLeaf(leaf) => Ok(*leaf),
    }
}
