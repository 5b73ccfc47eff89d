//! Configuration implementations for SMT operations

use crate::global::smt::SmtConfig;
use crate::types::SC_ID_BITS;

/// Version 0 configuration of the global commitment tree
///
/// Leaves and internal nodes carry distinct domain tags, and every bit of the
/// 32-byte sidechain identifier addresses the tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct SidechainTreeV0Config;

impl SmtConfig for SidechainTreeV0Config {
    fn leaf_domain_tag(&self) -> &[u8] { b"SCT_SC_v0" }

    fn internal_domain_tag(&self) -> &[u8] { b"SCT_GLOBAL_v0" }

    fn key_bits(&self) -> usize { SC_ID_BITS }
}

/// Default config instance (v0)
pub(crate) const DEFAULT_CONFIG: SidechainTreeV0Config = SidechainTreeV0Config;
