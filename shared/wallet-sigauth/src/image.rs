//! Configuration commitment (image hash) hashing.
//!
//! A configuration is a tree of signer leaves folded left to right; the image hash then binds the
//! tree root to the threshold and the checkpoint. On-chain recovery and off-chain encoding both
//! build commitments from these functions so they cannot drift apart.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256, U256};

const NESTED_CONFIG_PREFIX: &[u8] = b"Sequence nested config:\n";
const STATIC_DIGEST_PREFIX: &[u8] = b"Sequence static digest:\n";
const SET_IMAGE_HASH_TYPE: &[u8] = b"SetImageHash(bytes32 imageHash)";

/// Leaf for a signer: `bytes32(uint256(weight) << 160 | uint160(signer))`.
pub fn signer_leaf(signer: Address, weight: u8) -> B256 {
    let mut buf = [0u8; 32];
    buf[11] = weight;
    buf[12..32].copy_from_slice(signer.as_slice());
    B256::from(buf)
}

/// Leaf for a nested configuration, weighted as a whole by `external_weight`.
pub fn nested_leaf(inner_root: B256, inner_threshold: u16, external_weight: u8) -> B256 {
    let mut buf = Vec::with_capacity(NESTED_CONFIG_PREFIX.len() + 32 * 3);
    buf.extend_from_slice(NESTED_CONFIG_PREFIX);
    buf.extend_from_slice(inner_root.as_slice());
    buf.extend_from_slice(&U256::from(inner_threshold).to_be_bytes::<32>());
    buf.extend_from_slice(&U256::from(external_weight).to_be_bytes::<32>());
    keccak256(buf)
}

/// Leaf for a pre-approved subdigest.
pub fn static_digest_leaf(subdigest: B256) -> B256 {
    let mut buf = Vec::with_capacity(STATIC_DIGEST_PREFIX.len() + 32);
    buf.extend_from_slice(STATIC_DIGEST_PREFIX);
    buf.extend_from_slice(subdigest.as_slice());
    keccak256(buf)
}

/// Fold one more node into a tree root. An empty (zero) root is replaced by the node.
pub fn fold_node(root: B256, node: B256) -> B256 {
    if root == B256::ZERO {
        node
    } else {
        hash_pair(root, node)
    }
}

/// Image hash of a configuration with tree root `root`.
pub fn image_hash(root: B256, threshold: u16, checkpoint: u32) -> B256 {
    let with_threshold = hash_pair(root, word(U256::from(threshold)));
    hash_pair(with_threshold, word(U256::from(checkpoint)))
}

/// Digest a configuration signs to hand authority to `image_hash` in a chained signature.
pub fn set_image_hash_digest(image_hash: B256) -> B256 {
    hash_pair(keccak256(SET_IMAGE_HASH_TYPE), image_hash)
}

fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

fn hash_pair(a: B256, b: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(a.as_slice());
    buf[32..].copy_from_slice(b.as_slice());
    keccak256(buf)
}
