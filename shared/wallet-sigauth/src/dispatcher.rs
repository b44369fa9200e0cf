//! Signature recovery entry point.
//!
//! Reads the envelope type byte and routes to exactly one `(transform, strategy)` pair, or to
//! chained recovery. Unknown type bytes fail closed; strategy failures propagate unchanged.

use alloy_primitives::{B256, U256};

use crate::{
    chained::chained_recover,
    errors::SignatureError,
    signature_type::SignatureType,
    strategy::{DynamicStrategy, LegacyStrategy, Recovered, RecoveryStrategy, TreeRecovery},
    subdigest::WalletContext,
    verifier::SignerVerifier,
};

/// Maximum number of nested chained levels.
pub const MAX_CHAIN_DEPTH_DEFAULT: usize = 8;
/// Maximum branch / nested recursion inside one signer tree.
pub const MAX_TREE_DEPTH_DEFAULT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryLimits {
    pub max_chain_depth: usize,
    pub max_tree_depth: usize,
}

impl Default for RecoveryLimits {
    fn default() -> Self {
        Self {
            max_chain_depth: MAX_CHAIN_DEPTH_DEFAULT,
            max_tree_depth: MAX_TREE_DEPTH_DEFAULT,
        }
    }
}

/// What a signature proves: a configuration (`image_hash`, `threshold`, `checkpoint`), how much
/// weight was presented for it, and the subdigest that weight signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryResult {
    pub threshold: U256,
    pub weight: U256,
    pub image_hash: B256,
    pub subdigest: B256,
    pub checkpoint: u32,
}

impl RecoveryResult {
    fn from_recovered(recovered: Recovered, subdigest: B256) -> Self {
        Self {
            threshold: recovered.threshold,
            weight: recovered.weight,
            image_hash: recovered.image_hash,
            subdigest,
            checkpoint: recovered.checkpoint,
        }
    }

    pub fn meets_threshold(&self) -> bool {
        self.weight >= self.threshold
    }
}

/// Signature recovery bound to one wallet on one network.
pub struct SignatureRecovery<V> {
    context: WalletContext,
    verifier: V,
    limits: RecoveryLimits,
}

impl<V: SignerVerifier> SignatureRecovery<V> {
    pub fn new(context: WalletContext, verifier: V) -> Self {
        Self {
            context,
            verifier,
            limits: RecoveryLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: RecoveryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn context(&self) -> &WalletContext {
        &self.context
    }

    pub fn limits(&self) -> &RecoveryLimits {
        &self.limits
    }

    /// Recover what `signature` proves about `digest`.
    pub fn recover(&self, digest: B256, signature: &[u8]) -> Result<RecoveryResult, SignatureError> {
        self.recover_at_depth(digest, signature, 0)
    }

    /// `depth` counts the chained envelopes enclosing `signature`.
    pub(crate) fn recover_at_depth(
        &self,
        digest: B256,
        signature: &[u8],
        depth: usize,
    ) -> Result<RecoveryResult, SignatureError> {
        let Some((&type_byte, payload)) = signature.split_first() else {
            return Err(SignatureError::EmptySignature);
        };
        let signature_type =
            SignatureType::try_from(type_byte).map_err(SignatureError::InvalidSignatureType)?;

        match signature_type {
            SignatureType::Legacy => {
                let subdigest = self.context.subdigest(digest);
                let recovered = LegacyStrategy(self.tree()).recover(subdigest, payload)?;
                Ok(RecoveryResult::from_recovered(recovered, subdigest))
            }
            SignatureType::Dynamic => {
                let subdigest = self.context.subdigest(digest);
                let recovered = DynamicStrategy(self.tree()).recover(subdigest, payload)?;
                Ok(RecoveryResult::from_recovered(recovered, subdigest))
            }
            SignatureType::NoChainId => {
                let subdigest = self.context.no_chain_id_subdigest(digest);
                let recovered = DynamicStrategy(self.tree()).recover(subdigest, payload)?;
                Ok(RecoveryResult::from_recovered(recovered, subdigest))
            }
            SignatureType::Chained => chained_recover(self, digest, signature, depth),
        }
    }

    fn tree(&self) -> TreeRecovery<'_, V> {
        TreeRecovery::new(&self.verifier, self.limits.max_tree_depth)
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU64;

    use alloy_primitives::Address;

    use super::*;
    use crate::{
        errors::DecodeError,
        image::{image_hash, signer_leaf},
        test_utils::{dynamic_payload, envelope, legacy_payload, sig_part, MockVerifier},
    };

    fn recovery(verifier: &MockVerifier) -> SignatureRecovery<&MockVerifier> {
        let context = WalletContext::new(NonZeroU64::new(1).unwrap(), Address::repeat_byte(0xee));
        SignatureRecovery::new(context, verifier)
    }

    #[test]
    fn unknown_type_bytes_fail_with_the_byte() {
        let verifier = MockVerifier::default();
        for b in 0x04..=0xffu8 {
            assert_eq!(
                recovery(&verifier).recover(B256::ZERO, &[b, 1, 2, 3]),
                Err(SignatureError::InvalidSignatureType(b))
            );
        }
    }

    #[test]
    fn empty_envelope_is_malformed() {
        let verifier = MockVerifier::default();
        let err = recovery(&verifier).recover(B256::ZERO, &[]).unwrap_err();
        assert_eq!(err, SignatureError::EmptySignature);
        assert!(err.is_malformed_envelope());
    }

    #[test]
    fn legacy_meets_threshold_exactly() {
        let verifier = MockVerifier::default();
        let signer = Address::repeat_byte(0x01);
        let digest = B256::repeat_byte(0x99);
        let sig = envelope(0x00, &legacy_payload(3, 1, &[sig_part(signer, 3)]));

        let out = recovery(&verifier).recover(digest, &sig).unwrap();
        assert_eq!(out.weight, out.threshold);
        assert!(out.meets_threshold());
        assert_eq!(out.image_hash, image_hash(signer_leaf(signer, 3), 3, 1));
        assert_eq!(out.subdigest, recovery(&verifier).context().subdigest(digest));
    }

    #[test]
    fn transforms_follow_the_type_byte() {
        let verifier = MockVerifier::default();
        let r = recovery(&verifier);
        let digest = B256::repeat_byte(0x99);
        let payload = dynamic_payload(1, 0, &[sig_part(Address::repeat_byte(1), 1)]);

        let dynamic = r.recover(digest, &envelope(0x01, &payload)).unwrap();
        let no_chain = r.recover(digest, &envelope(0x02, &payload)).unwrap();

        assert_eq!(dynamic.subdigest, r.context().subdigest(digest));
        assert_eq!(no_chain.subdigest, r.context().no_chain_id_subdigest(digest));
        assert_ne!(dynamic.subdigest, no_chain.subdigest);
        assert_eq!(dynamic.image_hash, no_chain.image_hash);
        assert_eq!(verifier.last_digest(), Some(no_chain.subdigest));
    }

    #[test]
    fn recovery_is_deterministic() {
        let verifier = MockVerifier::default();
        let sig = envelope(0x01, &dynamic_payload(2, 4, &[sig_part(Address::repeat_byte(5), 1)]));
        let first = recovery(&verifier).recover(B256::ZERO, &sig);
        let second = recovery(&verifier).recover(B256::ZERO, &sig);
        assert_eq!(first, second);
    }

    #[test]
    fn strategy_errors_propagate_unchanged() {
        let verifier = MockVerifier::default();
        assert_eq!(
            recovery(&verifier).recover(B256::ZERO, &[0x01, 0x00]),
            Err(DecodeError::Truncated.into())
        );
    }
}
