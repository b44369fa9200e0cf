//! Legacy and dynamic recovery strategies.
//!
//! Both parse `threshold ‖ checkpoint ‖ tree` and differ only in the threshold width (one byte for
//! legacy, two for dynamic). Neither knows which digest transform produced the subdigest.

use alloy_primitives::{B256, U256};

use crate::{
    bytes::{read_address, read_b32, read_slice, read_u16_be, read_u24_be, read_u32_be, read_u8},
    errors::{DecodeError, SignatureError, SignerError},
    image::{fold_node, image_hash, nested_leaf, signer_leaf, static_digest_leaf},
    signer::{is_valid_signer, recover_signer, SIGNATURE_PART_LEN},
    verifier::SignerVerifier,
};

/// Tree part flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TreeFlag {
    Signature = 0x00,
    Address = 0x01,
    DynamicSignature = 0x02,
    Node = 0x03,
    Branch = 0x04,
    Subdigest = 0x05,
    Nested = 0x06,
}

impl TryFrom<u8> for TreeFlag {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use TreeFlag::*;
        let flag = match value {
            0x00 => Signature,
            0x01 => Address,
            0x02 => DynamicSignature,
            0x03 => Node,
            0x04 => Branch,
            0x05 => Subdigest,
            0x06 => Nested,
            other => return Err(DecodeError::UnknownFlag(other)),
        };
        Ok(flag)
    }
}

/// What a strategy recovered from one payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recovered {
    pub threshold: U256,
    pub weight: U256,
    pub image_hash: B256,
    pub checkpoint: u32,
}

/// A payload recovery strategy: pure function of `(subdigest, payload)`.
pub trait RecoveryStrategy {
    fn recover(&self, subdigest: B256, payload: &[u8]) -> Result<Recovered, SignatureError>;
}

/// Walks a signer tree, summing weight and rebuilding the tree root.
pub struct TreeRecovery<'a, V> {
    verifier: &'a V,
    max_depth: usize,
}

impl<'a, V: SignerVerifier> TreeRecovery<'a, V> {
    pub fn new(verifier: &'a V, max_depth: usize) -> Self {
        Self { verifier, max_depth }
    }

    /// Recover `(root, weight)` of one (sub)tree.
    pub fn recover_branch(
        &self,
        subdigest: B256,
        tree: &[u8],
        depth: usize,
    ) -> Result<(B256, U256), SignatureError> {
        if depth > self.max_depth {
            return Err(DecodeError::TreeTooDeep { max: self.max_depth }.into());
        }

        let mut root = B256::ZERO;
        let mut weight = U256::ZERO;
        let mut i = 0usize;

        while i < tree.len() {
            let flag = TreeFlag::try_from(read_u8(tree, &mut i)?)?;

            let node = match flag {
                TreeFlag::Signature => {
                    let signer_weight = read_u8(tree, &mut i)?;
                    let sig = read_slice(tree, &mut i, SIGNATURE_PART_LEN)?;
                    let signer = recover_signer(self.verifier, subdigest, sig)?;
                    weight = add_weight(weight, U256::from(signer_weight))?;
                    signer_leaf(signer, signer_weight)
                }
                TreeFlag::Address => {
                    let signer_weight = read_u8(tree, &mut i)?;
                    let signer = read_address(tree, &mut i)?;
                    signer_leaf(signer, signer_weight)
                }
                TreeFlag::DynamicSignature => {
                    let signer_weight = read_u8(tree, &mut i)?;
                    let signer = read_address(tree, &mut i)?;
                    let size = read_u24_be(tree, &mut i)?;
                    let sig = read_slice(tree, &mut i, size)?;
                    if !is_valid_signer(self.verifier, subdigest, signer, sig)? {
                        return Err(SignerError::InvalidDynamicSignature { signer }.into());
                    }
                    weight = add_weight(weight, U256::from(signer_weight))?;
                    signer_leaf(signer, signer_weight)
                }
                TreeFlag::Node => read_b32(tree, &mut i)?,
                TreeFlag::Branch => {
                    let size = read_u24_be(tree, &mut i)?;
                    let branch = read_slice(tree, &mut i, size)?;
                    let (branch_root, branch_weight) =
                        self.recover_branch(subdigest, branch, depth + 1)?;
                    weight = add_weight(weight, branch_weight)?;
                    branch_root
                }
                TreeFlag::Subdigest => {
                    let approved = read_b32(tree, &mut i)?;
                    if approved == subdigest {
                        weight = U256::MAX;
                    }
                    static_digest_leaf(approved)
                }
                TreeFlag::Nested => {
                    let external_weight = read_u8(tree, &mut i)?;
                    let internal_threshold = read_u16_be(tree, &mut i)?;
                    let size = read_u24_be(tree, &mut i)?;
                    let inner = read_slice(tree, &mut i, size)?;
                    let (inner_root, inner_weight) =
                        self.recover_branch(subdigest, inner, depth + 1)?;
                    if inner_weight >= U256::from(internal_threshold) {
                        weight = add_weight(weight, U256::from(external_weight))?;
                    }
                    nested_leaf(inner_root, internal_threshold, external_weight)
                }
            };

            root = fold_node(root, node);
        }

        Ok((root, weight))
    }

    fn finish(
        &self,
        subdigest: B256,
        threshold: u16,
        checkpoint: u32,
        tree: &[u8],
    ) -> Result<Recovered, SignatureError> {
        let (root, weight) = self.recover_branch(subdigest, tree, 0)?;
        Ok(Recovered {
            threshold: U256::from(threshold),
            weight,
            image_hash: image_hash(root, threshold, checkpoint),
            checkpoint,
        })
    }
}

fn add_weight(weight: U256, more: U256) -> Result<U256, DecodeError> {
    weight.checked_add(more).ok_or(DecodeError::WeightOverflow)
}

/// `u8 threshold ‖ u32 checkpoint ‖ tree`.
pub struct LegacyStrategy<'a, V>(pub TreeRecovery<'a, V>);

impl<V: SignerVerifier> RecoveryStrategy for LegacyStrategy<'_, V> {
    fn recover(&self, subdigest: B256, payload: &[u8]) -> Result<Recovered, SignatureError> {
        let mut i = 0usize;
        let threshold = read_u8(payload, &mut i)? as u16;
        let checkpoint = read_u32_be(payload, &mut i)?;
        self.0.finish(subdigest, threshold, checkpoint, &payload[i..])
    }
}

/// `u16 threshold ‖ u32 checkpoint ‖ tree`.
pub struct DynamicStrategy<'a, V>(pub TreeRecovery<'a, V>);

impl<V: SignerVerifier> RecoveryStrategy for DynamicStrategy<'_, V> {
    fn recover(&self, subdigest: B256, payload: &[u8]) -> Result<Recovered, SignatureError> {
        let mut i = 0usize;
        let threshold = read_u16_be(payload, &mut i)?;
        let checkpoint = read_u32_be(payload, &mut i)?;
        self.0.finish(subdigest, threshold, checkpoint, &payload[i..])
    }
}
