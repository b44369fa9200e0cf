use std::fmt;

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use wallet_sigauth::{
    image::{fold_node, nested_leaf, signer_leaf, static_digest_leaf},
    signer::{eth_signed_digest, SigKind},
    SignatureType,
};

use crate::types::{Leaf, Proofs, SignerProof, WalletConfig};

const MAX_U24: usize = 0xff_ffff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Legacy envelopes carry a one-byte threshold.
    ThresholdTooLarge(u16),
    /// A branch, nested tree, contract proof or chained link exceeds the u24 length prefix.
    PartTooLarge(usize),
    /// Chained envelopes are built with [`encode_chained`].
    UnsupportedType(SignatureType),
    EmptyChain,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::ThresholdTooLarge(threshold) => {
                write!(f, "threshold {threshold} does not fit a legacy envelope (max 255)")
            }
            EncodeError::PartTooLarge(len) => write!(f, "part of {len} bytes exceeds the u24 length prefix"),
            EncodeError::UnsupportedType(signature_type) => {
                write!(f, "{signature_type:?} envelopes are not encoded from a single configuration")
            }
            EncodeError::EmptyChain => f.write_str("chained envelope needs at least one link"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Root of a signer tree, folded left to right.
pub fn tree_root(tree: &[Leaf]) -> B256 {
    tree.iter().fold(B256::ZERO, |root, leaf| {
        let node = match leaf {
            Leaf::Signer { address, weight } => signer_leaf(*address, *weight),
            Leaf::Node(hash) => *hash,
            Leaf::Subdigest(digest) => static_digest_leaf(*digest),
            Leaf::Branch(branch) => tree_root(branch),
            Leaf::Nested {
                weight,
                threshold,
                tree,
            } => nested_leaf(tree_root(tree), *threshold, *weight),
        };
        fold_node(root, node)
    })
}

/// Image hash the wallet stores for `config`.
pub fn image_hash(config: &WalletConfig) -> B256 {
    wallet_sigauth::image::image_hash(tree_root(&config.tree), config.threshold, config.checkpoint)
}

/// Encode a legacy, dynamic or no-chain-id envelope for `config` with the given proofs.
pub fn encode_signature(
    config: &WalletConfig,
    proofs: &Proofs,
    signature_type: SignatureType,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = vec![signature_type.as_u8()];
    match signature_type {
        SignatureType::Legacy => {
            let threshold =
                u8::try_from(config.threshold).map_err(|_| EncodeError::ThresholdTooLarge(config.threshold))?;
            buf.push(threshold);
        }
        SignatureType::Dynamic | SignatureType::NoChainId => {
            buf.extend_from_slice(&config.threshold.to_be_bytes());
        }
        SignatureType::Chained => return Err(EncodeError::UnsupportedType(signature_type)),
    }
    buf.extend_from_slice(&config.checkpoint.to_be_bytes());
    encode_tree(&config.tree, proofs, &mut buf)?;
    Ok(buf)
}

/// Encode a chained envelope from complete link envelopes, first link signing the digest.
pub fn encode_chained(links: &[Vec<u8>]) -> Result<Vec<u8>, EncodeError> {
    if links.is_empty() {
        return Err(EncodeError::EmptyChain);
    }
    let mut buf = vec![SignatureType::Chained.as_u8()];
    for link in links {
        push_u24(&mut buf, link.len())?;
        buf.extend_from_slice(link);
    }
    Ok(buf)
}

fn encode_tree(tree: &[Leaf], proofs: &Proofs, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    for leaf in tree {
        match leaf {
            Leaf::Signer { address, weight } => match proofs.get(address) {
                Some(SignerProof::Eoa(sig)) => {
                    buf.push(0x00);
                    buf.push(*weight);
                    buf.extend_from_slice(sig);
                }
                Some(SignerProof::Contract(payload)) => {
                    buf.push(0x02);
                    buf.push(*weight);
                    buf.extend_from_slice(address.as_slice());
                    push_u24(buf, payload.len() + 1)?;
                    buf.extend_from_slice(payload);
                    buf.push(SigKind::WalletBytes32 as u8);
                }
                None => {
                    buf.push(0x01);
                    buf.push(*weight);
                    buf.extend_from_slice(address.as_slice());
                }
            },
            Leaf::Node(hash) => {
                buf.push(0x03);
                buf.extend_from_slice(hash.as_slice());
            }
            Leaf::Subdigest(digest) => {
                buf.push(0x05);
                buf.extend_from_slice(digest.as_slice());
            }
            Leaf::Branch(branch) => {
                let mut inner = Vec::new();
                encode_tree(branch, proofs, &mut inner)?;
                buf.push(0x04);
                push_u24(buf, inner.len())?;
                buf.extend_from_slice(&inner);
            }
            Leaf::Nested {
                weight,
                threshold,
                tree,
            } => {
                let mut inner = Vec::new();
                encode_tree(tree, proofs, &mut inner)?;
                buf.push(0x06);
                buf.push(*weight);
                buf.extend_from_slice(&threshold.to_be_bytes());
                push_u24(buf, inner.len())?;
                buf.extend_from_slice(&inner);
            }
        }
    }
    Ok(())
}

fn push_u24(buf: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    if len > MAX_U24 {
        return Err(EncodeError::PartTooLarge(len));
    }
    buf.extend_from_slice(&(len as u32).to_be_bytes()[1..]);
    Ok(())
}

/// Ethereum address of a verifying key: last 20 bytes of `keccak256(x ‖ y)`.
pub fn verifying_key_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}

pub fn signer_address(key: &SigningKey) -> Address {
    verifying_key_address(key.verifying_key())
}

/// Sign a subdigest and produce the 66-byte signature part (`v` in {27, 28}, low `s`).
pub fn sign_digest(
    signing_key: &SigningKey,
    subdigest: B256,
    kind: SigKind,
) -> Result<[u8; 66], k256::ecdsa::Error> {
    let signed = match kind {
        SigKind::Eip712 => subdigest,
        SigKind::EthSign => eth_signed_digest(subdigest),
        SigKind::WalletBytes32 => return Err(k256::ecdsa::Error::new()),
    };

    let (mut signature, mut recovery_id) = signing_key.sign_prehash_recoverable(signed.as_slice())?;
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }
    let (r, s) = signature.split_bytes();

    let mut out = [0u8; 66];
    out[0..32].copy_from_slice(r.as_slice());
    out[32..64].copy_from_slice(s.as_slice());
    out[64] = 27 + recovery_id.is_y_odd() as u8;
    out[65] = kind as u8;
    Ok(out)
}
