//! Sidechain events and their leaf commitments
//!
//! Each event record is reduced to exactly one [`FieldElement`] leaf by a
//! fixed, order-sensitive composition of its fields. The leaf is what the
//! per-sidechain sub-trees accumulate.
//!
//! [`FieldElement`]: crate::field::FieldElement

mod builder;
mod records;

pub use builder::{
    absent_sentinel, build_leaf, hash_backward_transfer_request, hash_ceased_sidechain_withdrawal,
    hash_certificate, hash_forward_transfer, hash_sidechain_creation,
};
pub use records::{
    BackwardTransfer, BackwardTransferRequest, CeasedSidechainWithdrawal, Certificate, EventKind,
    EventRecord, ForwardTransfer, ScCreation,
};
