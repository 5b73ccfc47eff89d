//! Event record types

use serde::{Deserialize, Serialize};

use super::builder::build_leaf;
use crate::errors::EncodingError;
use crate::field::FieldElement;
use crate::types::NUM_EVENT_KINDS;

/// The five event categories, one sub-tree each
///
/// The declaration order is the slot order of the combined sidechain
/// commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// Sidechain creation output
    ScCreation,
    /// Forward transfer from the mainchain to the sidechain
    ForwardTransfer,
    /// Backward transfer request issued on the mainchain
    BackwardTransferRequest,
    /// Withdrawal from a ceased sidechain
    CeasedSidechainWithdrawal,
    /// Withdrawal certificate
    Certificate,
}

impl EventKind {
    /// All kinds in slot order
    pub const ALL: [EventKind; NUM_EVENT_KINDS] = [
        EventKind::ScCreation,
        EventKind::ForwardTransfer,
        EventKind::BackwardTransferRequest,
        EventKind::CeasedSidechainWithdrawal,
        EventKind::Certificate,
    ];

    /// Position of this kind in the combined commitment
    pub const fn slot(self) -> usize {
        match self {
            EventKind::ScCreation => 0,
            EventKind::ForwardTransfer => 1,
            EventKind::BackwardTransferRequest => 2,
            EventKind::CeasedSidechainWithdrawal => 3,
            EventKind::Certificate => 4,
        }
    }
}

/// Sidechain creation output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScCreation {
    /// Amount locked at creation
    pub amount: u64,
    /// Hash of the owner's public key (32 bytes)
    pub owner_key_hash: Vec<u8>,
    /// Length of a withdrawal epoch in blocks
    pub withdrawal_epoch_length: u32,
    /// Opaque custom data
    pub custom_data: Vec<u8>,
    /// Optional constant
    pub constant: Option<FieldElement>,
    /// Certificate verification key
    pub cert_vk: Vec<u8>,
    /// Optional backward transfer request verification key
    pub btr_vk: Option<Vec<u8>>,
    /// Optional ceased sidechain withdrawal verification key
    pub csw_vk: Option<Vec<u8>>,
    /// Hash of the originating transaction (32 bytes)
    pub tx_hash: Vec<u8>,
    /// Output index within the originating transaction
    pub out_idx: u32,
}

/// Forward transfer output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardTransfer {
    /// Transferred amount
    pub amount: u64,
    /// Hash of the recipient's public key (32 bytes)
    pub recipient_key_hash: Vec<u8>,
    /// Hash of the originating transaction (32 bytes)
    pub tx_hash: Vec<u8>,
    /// Output index within the originating transaction
    pub out_idx: u32,
}

/// Backward transfer request output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardTransferRequest {
    /// Requested amount
    pub amount: u64,
    /// Hash of the recipient's public key (32 bytes)
    pub recipient_key_hash: Vec<u8>,
    /// Request payload
    pub request_data: Vec<FieldElement>,
    /// Hash of the originating transaction (32 bytes)
    pub tx_hash: Vec<u8>,
    /// Output index within the originating transaction
    pub out_idx: u32,
}

/// Ceased sidechain withdrawal input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeasedSidechainWithdrawal {
    /// Withdrawn amount
    pub amount: u64,
    /// Nullifier preventing double withdrawal
    pub nullifier: FieldElement,
    /// Hash of the recipient's public key (32 bytes)
    pub recipient_key_hash: Vec<u8>,
    /// Hash of the certificate data the withdrawal refers to
    pub cert_data_hash: FieldElement,
}

/// One backward transfer output of a certificate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardTransfer {
    /// Hash of the recipient's public key (32 bytes)
    pub recipient_key_hash: Vec<u8>,
    /// Transferred amount
    pub amount: u64,
}

/// Withdrawal certificate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Withdrawal epoch the certificate closes
    pub epoch: u32,
    /// Certificate quality
    pub quality: u64,
    /// Hash of the certificate data
    pub cert_data_hash: FieldElement,
    /// Backward transfer outputs, in order
    pub backward_transfers: Vec<BackwardTransfer>,
    /// Merkle root of the backward transfers
    pub bt_merkle_root: FieldElement,
    /// Cumulative commitment tree hash at the end of the epoch
    pub cumulative_comm_tree_hash: FieldElement,
}

/// A structured event, or a certificate leaf computed elsewhere
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRecord {
    /// Sidechain creation
    ScCreation(ScCreation),
    /// Forward transfer
    ForwardTransfer(ForwardTransfer),
    /// Backward transfer request
    BackwardTransferRequest(BackwardTransferRequest),
    /// Ceased sidechain withdrawal
    CeasedSidechainWithdrawal(CeasedSidechainWithdrawal),
    /// Full certificate
    Certificate(Certificate),
    /// Pre-computed certificate leaf, accepted verbatim
    CertificateLeaf(FieldElement),
}

impl EventRecord {
    /// The sub-tree this record belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            EventRecord::ScCreation(_) => EventKind::ScCreation,
            EventRecord::ForwardTransfer(_) => EventKind::ForwardTransfer,
            EventRecord::BackwardTransferRequest(_) => EventKind::BackwardTransferRequest,
            EventRecord::CeasedSidechainWithdrawal(_) => EventKind::CeasedSidechainWithdrawal,
            EventRecord::Certificate(_) | EventRecord::CertificateLeaf(_) => EventKind::Certificate,
        }
    }

    /// Computes the leaf commitment of this record
    pub fn commitment(&self) -> Result<FieldElement, EncodingError> { build_leaf(self) }
}

impl From<ScCreation> for EventRecord {
    fn from(record: ScCreation) -> Self { EventRecord::ScCreation(record) }
}

impl From<ForwardTransfer> for EventRecord {
    fn from(record: ForwardTransfer) -> Self { EventRecord::ForwardTransfer(record) }
}

impl From<BackwardTransferRequest> for EventRecord {
    fn from(record: BackwardTransferRequest) -> Self { EventRecord::BackwardTransferRequest(record) }
}

impl From<CeasedSidechainWithdrawal> for EventRecord {
    fn from(record: CeasedSidechainWithdrawal) -> Self {
        EventRecord::CeasedSidechainWithdrawal(record)
    }
}

impl From<Certificate> for EventRecord {
    fn from(record: Certificate) -> Self { EventRecord::Certificate(record) }
}
