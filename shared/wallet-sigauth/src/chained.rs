//! Chained signatures: a list of complete envelopes, each handing authority to the next.
//!
//! Layout after the type byte: one or more `u24 size ‖ envelope` links. Link 0 signs the caller's
//! digest. Every later link signs the `SetImageHash` digest of the configuration recovered just
//! before it. Each link must meet its own threshold and checkpoints may never go down. The folded
//! result is the last link's configuration with link 0's subdigest.

use alloc::vec::Vec;

use alloy_primitives::B256;

use crate::{
    bytes::{read_slice, read_u24_be},
    dispatcher::{RecoveryResult, SignatureRecovery},
    errors::{ChainError, DecodeError, SignatureError},
    image::set_image_hash_digest,
    verifier::SignerVerifier,
};

/// Split a chained envelope (type byte included) into its link envelopes.
pub fn decode_links(signature: &[u8]) -> Result<Vec<&[u8]>, DecodeError> {
    let mut links = Vec::new();
    let mut i = 1usize;
    while i < signature.len() {
        let size = read_u24_be(signature, &mut i)?;
        links.push(read_slice(signature, &mut i, size)?);
    }
    if links.is_empty() {
        return Err(DecodeError::EmptyChain);
    }
    Ok(links)
}

pub(crate) fn chained_recover<V: SignerVerifier>(
    recovery: &SignatureRecovery<V>,
    digest: B256,
    signature: &[u8],
    depth: usize,
) -> Result<RecoveryResult, SignatureError> {
    let max = recovery.limits().max_chain_depth;
    if depth + 1 > max {
        return Err(ChainError::DepthExceeded { max }.into());
    }

    let links = decode_links(signature)?;
    let mut folded: Option<RecoveryResult> = None;

    for (index, link) in links.into_iter().enumerate() {
        let link_digest = match &folded {
            None => digest,
            Some(prev) => set_image_hash_digest(prev.image_hash),
        };

        let next = recovery.recover_at_depth(link_digest, link, depth + 1)?;
        if !next.meets_threshold() {
            return Err(ChainError::LowWeightChainedLink {
                index,
                threshold: next.threshold,
                weight: next.weight,
            }
            .into());
        }

        folded = Some(match folded {
            None => next,
            Some(prev) => {
                if next.checkpoint < prev.checkpoint {
                    return Err(ChainError::CheckpointOrder {
                        previous: prev.checkpoint,
                        next: next.checkpoint,
                    }
                    .into());
                }
                RecoveryResult {
                    subdigest: prev.subdigest,
                    ..next
                }
            }
        });
    }

    folded.ok_or_else(|| DecodeError::EmptyChain.into())
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU64;

    use alloy_primitives::{Address, U256};

    use super::*;
    use crate::{
        dispatcher::RecoveryLimits,
        image::{image_hash, signer_leaf},
        subdigest::WalletContext,
        test_utils::{addr_part, chained, envelope, legacy_payload, sig_part, MockVerifier},
    };

    fn a() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn b() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn recovery(verifier: &MockVerifier) -> SignatureRecovery<&MockVerifier> {
        let context = WalletContext::new(NonZeroU64::new(10).unwrap(), Address::repeat_byte(0x0e));
        SignatureRecovery::new(context, verifier)
    }

    fn legacy_link(signer: Address, checkpoint: u32) -> Vec<u8> {
        envelope(0x00, &legacy_payload(1, checkpoint, &[sig_part(signer, 1)]))
    }

    #[test]
    fn folds_to_the_last_link() {
        let verifier = MockVerifier::default();
        let digest = B256::repeat_byte(0x44);
        let sig = chained(&[legacy_link(a(), 1), legacy_link(b(), 2)]);

        let out = recovery(&verifier).recover(digest, &sig).unwrap();
        assert_eq!(out.checkpoint, 2);
        assert_eq!(out.image_hash, image_hash(signer_leaf(b(), 1), 1, 2));
        assert_eq!(out.subdigest, recovery(&verifier).context().subdigest(digest));
    }

    #[test]
    fn later_links_sign_the_previous_image_hash() {
        let verifier = MockVerifier::default();
        let r = recovery(&verifier);
        let sig = chained(&[legacy_link(a(), 1), legacy_link(b(), 2)]);
        r.recover(B256::ZERO, &sig).unwrap();

        let first_image = image_hash(signer_leaf(a(), 1), 1, 1);
        assert_eq!(
            verifier.last_digest(),
            Some(r.context().subdigest(set_image_hash_digest(first_image)))
        );
    }

    #[test]
    fn decreasing_checkpoints_fail() {
        let verifier = MockVerifier::default();
        let sig = chained(&[legacy_link(a(), 2), legacy_link(b(), 1)]);
        let err = recovery(&verifier).recover(B256::ZERO, &sig).unwrap_err();
        assert_eq!(err, ChainError::CheckpointOrder { previous: 2, next: 1 }.into());
        assert!(err.is_chain_policy());
    }

    #[test]
    fn equal_checkpoints_are_allowed() {
        let verifier = MockVerifier::default();
        let sig = chained(&[legacy_link(a(), 3), legacy_link(b(), 3), legacy_link(a(), 5)]);
        assert_eq!(recovery(&verifier).recover(B256::ZERO, &sig).unwrap().checkpoint, 5);
    }

    #[test]
    fn every_link_must_meet_its_threshold() {
        let verifier = MockVerifier::default();
        let weak = envelope(0x00, &legacy_payload(2, 2, &[sig_part(b(), 1), addr_part(a(), 1)]));
        let sig = chained(&[legacy_link(a(), 1), weak]);
        assert_eq!(
            recovery(&verifier).recover(B256::ZERO, &sig),
            Err(ChainError::LowWeightChainedLink {
                index: 1,
                threshold: U256::from(2),
                weight: U256::from(1),
            }
            .into())
        );
    }

    #[test]
    fn empty_and_truncated_chains_are_decode_errors() {
        let verifier = MockVerifier::default();
        assert_eq!(
            recovery(&verifier).recover(B256::ZERO, &[0x03]),
            Err(DecodeError::EmptyChain.into())
        );
        assert_eq!(
            recovery(&verifier).recover(B256::ZERO, &[0x03, 0x00, 0x00, 0x05, 0x00]),
            Err(DecodeError::Truncated.into())
        );
    }

    #[test]
    fn link_errors_propagate() {
        let verifier = MockVerifier::default();
        let sig = chained(&[legacy_link(a(), 1), vec![0x09]]);
        assert_eq!(
            recovery(&verifier).recover(B256::ZERO, &sig),
            Err(SignatureError::InvalidSignatureType(0x09))
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let verifier = MockVerifier::default();
        let mut sig = legacy_link(a(), 1);
        for _ in 0..3 {
            sig = chained(&[sig]);
        }

        let limited = recovery(&verifier).with_limits(RecoveryLimits {
            max_chain_depth: 2,
            ..RecoveryLimits::default()
        });
        assert_eq!(
            limited.recover(B256::ZERO, &sig),
            Err(ChainError::DepthExceeded { max: 2 }.into())
        );
        assert!(recovery(&verifier).recover(B256::ZERO, &sig).is_ok());
    }
}
