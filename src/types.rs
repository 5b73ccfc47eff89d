//! Core type definitions for the sidechain commitment tree
//!
//! This module defines fundamental types and constants used across multiple
//! modules, providing a common location for shared definitions.

use crate::field::FieldElement;

// ============================================================================
// Fundamental Types
// ============================================================================

/// Type alias for 32-byte arrays (transaction hashes, key hashes)
pub type Bytes32 = [u8; 32];

/// Size in bytes of a serialized field element
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Size in bytes of transaction hashes and public key hashes carried by events
pub const HASH_SIZE: usize = 32;

// ============================================================================
// Sidechain Domain
// ============================================================================

/// Type alias for sidechain identifiers
pub type SidechainId = FieldElement;

/// Type alias for the combined per-sidechain commitment
pub type ScCommitment = FieldElement;

/// Domain separation tag for sidechain creation leaves
pub const SCC_DOMAIN_TAG: &[u8] = b"SCT_SCC_v0";

/// Domain separation tag for forward transfer leaves
pub const FWT_DOMAIN_TAG: &[u8] = b"SCT_FWT_v0";

/// Domain separation tag for backward transfer request leaves
pub const BTR_DOMAIN_TAG: &[u8] = b"SCT_BTR_v0";

/// Domain separation tag for ceased sidechain withdrawal leaves
pub const CSW_DOMAIN_TAG: &[u8] = b"SCT_CSW_v0";

/// Domain separation tag for certificate leaves
pub const CERT_DOMAIN_TAG: &[u8] = b"SCT_CERT_v0";

/// Domain separation tag for backward transfer outputs inside a certificate
pub const BT_DOMAIN_TAG: &[u8] = b"SCT_BT_v0";

/// Domain separation tag of the sentinel standing in for absent optional fields
///
/// Optional event fields are never skipped: an absent value is replaced by the
/// hash of this tag so that positions stay fixed.
pub const ABSENT_DOMAIN_TAG: &[u8] = b"SCT_ABSENT_v0";

// ============================================================================
// Sub-tree Domain
// ============================================================================

/// Domain separation tag for leaves of the per-kind append-only trees
pub const SUBTREE_LEAF_DOMAIN_TAG: &[u8] = b"SCT_SUB_LEAF_v0";

/// Domain separation tag for internal nodes of the per-kind append-only trees
pub const SUBTREE_NODE_DOMAIN_TAG: &[u8] = b"SCT_SUB_NODE_v0";

/// Number of event kinds, and therefore sub-trees, per sidechain
pub const NUM_EVENT_KINDS: usize = 5;

// ============================================================================
// Global Tree Domain
// ============================================================================

/// Number of key bits addressing the global sparse Merkle tree
pub const SC_ID_BITS: usize = FIELD_ELEMENT_SIZE * 8;

// ============================================================================
// Schnorr Signature Domain
// ============================================================================

/// Size in bytes of a serialized Schnorr signature
pub const SCHNORR_SIGNATURE_SIZE: usize = 192;

/// Size in bytes of each of the two scalar slots in a serialized signature
pub const SCHNORR_SCALAR_SLOT_SIZE: usize = SCHNORR_SIGNATURE_SIZE / 2;

/// Domain separation tag for Schnorr challenges
pub const SCHNORR_CHALLENGE_TAG: &[u8] = b"SCT_SCHNORR_v0";

/// Domain separation tag for deterministic Schnorr nonces
pub const SCHNORR_NONCE_TAG: &[u8] = b"SCT_SCHNORR_NONCE_v0";
