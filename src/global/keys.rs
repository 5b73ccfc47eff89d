//! SMT node key encoding
//!
//! A node key is the depth of a node plus the bit-prefix leading to it, with
//! every bit at or past the depth cleared. Keys address the stored nodes of
//! the global tree.

use crate::types::{SidechainId, FIELD_ELEMENT_SIZE};

/// Address of a node in the global tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    depth: u16,
    prefix: [u8; FIELD_ELEMENT_SIZE],
}

impl NodeKey {
    /// Depth of the node (0 = root)
    pub fn depth(&self) -> usize { self.depth as usize }

    /// The masked prefix bytes
    pub fn prefix(&self) -> &[u8; FIELD_ELEMENT_SIZE] { &self.prefix }
}

/// Clears every bit at index `depth` and beyond
fn mask_prefix(mut bytes: [u8; FIELD_ELEMENT_SIZE], depth: usize) -> [u8; FIELD_ELEMENT_SIZE] {
    for (index, byte) in bytes.iter_mut().enumerate() {
        let first_bit = index * 8;
        if first_bit + 8 <= depth {
            continue;
        }
        if first_bit >= depth {
            *byte = 0;
        } else {
            let kept = depth - first_bit;
            *byte &= 0xffu8 << (8 - kept);
        }
    }
    bytes
}

fn key_from_bytes(bytes: [u8; FIELD_ELEMENT_SIZE], depth: usize) -> NodeKey {
    let depth = depth.min(FIELD_ELEMENT_SIZE * 8);
    NodeKey { depth: depth as u16, prefix: mask_prefix(bytes, depth) }
}

/// Key of the root node
pub fn root_node_key() -> NodeKey { NodeKey { depth: 0, prefix: [0u8; FIELD_ELEMENT_SIZE] } }

/// Encodes the key of the node at `depth` on the path of `sc_id`
pub fn encode_node_key(sc_id: &SidechainId, depth: usize) -> NodeKey {
    key_from_bytes(sc_id.serialize(), depth)
}

/// Encodes the key of the sibling of the node at `depth` on the path of `sc_id`
///
/// The sibling shares the first `depth - 1` bits and differs in bit
/// `depth - 1`. The root has no sibling; depth 0 yields the root key.
pub fn encode_sibling_node_key(sc_id: &SidechainId, depth: usize) -> NodeKey {
    if depth == 0 {
        return root_node_key();
    }
    let mut bytes = sc_id.serialize();
    let bit = depth - 1;
    if let Some(byte) = bytes.get_mut(bit / 8) {
        *byte ^= 1 << (7 - bit % 8);
    }
    key_from_bytes(bytes, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;

    fn id_from_first_byte(byte: u8) -> SidechainId {
        let mut bytes = [0u8; 32];
        bytes[0] = byte;
        bytes[1] = 0x55;
        FieldElement::deserialize(&bytes).expect("canonical bytes should decode")
    }

    #[test]
    fn test_encode_node_key_masks_suffix() {
        let sc_id = id_from_first_byte(0b1011_0000);

        let key = encode_node_key(&sc_id, 3);

        assert_eq!(key.depth(), 3);
        assert_eq!(key.prefix()[0], 0b1010_0000);
        assert_eq!(key.prefix()[1..], [0u8; 31]);
        assert_eq!(encode_node_key(&sc_id, 0), root_node_key());
        assert_eq!(encode_node_key(&sc_id, 16).prefix()[1], 0x55);
    }

    #[test]
    fn test_encode_sibling_node_key() {
        let sc_id = id_from_first_byte(0b1000_0000);

        let sibling = encode_sibling_node_key(&sc_id, 1);

        assert_eq!(sibling.depth(), 1);
        assert_eq!(sibling.prefix()[0], 0);
        assert_eq!(sibling, encode_node_key(&id_from_first_byte(0), 1));
        assert_eq!(encode_sibling_node_key(&sc_id, 0), root_node_key());
    }

    #[test]
    fn test_siblings_share_parent() {
        let left = id_from_first_byte(0b0100_0000);
        let right = id_from_first_byte(0b0110_0000);

        assert_eq!(encode_sibling_node_key(&left, 3), encode_node_key(&right, 3));
        assert_eq!(encode_node_key(&left, 2), encode_node_key(&right, 2));
    }

    #[test]
    fn test_full_depth_key() {
        let sc_id = FieldElement::from_u64(0x0012_3456);

        let key = encode_node_key(&sc_id, 256);

        assert_eq!(key.prefix(), &sc_id.serialize());
        assert_ne!(encode_sibling_node_key(&sc_id, 256), key);
    }
}
