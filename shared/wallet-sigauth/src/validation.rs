//! Pass/fail decision on top of recovery.
//!
//! A signature is valid when the weight it presents reaches the threshold of the configuration it
//! recovers to, and that configuration is the one the wallet currently accepts. Falling short is
//! a `false`, not an error.

use alloy_primitives::{keccak256, B256};

use crate::{
    dispatcher::SignatureRecovery,
    errors::SignatureError,
    image_store::ImageStore,
    interface::{ERC1271_INVALID, ERC1271_MAGIC_VALUE_BYTES, ERC1271_MAGIC_VALUE_BYTES32},
    verifier::SignerVerifier,
};

impl<V: SignerVerifier> SignatureRecovery<V> {
    /// `(is_valid, subdigest)` for `signature` over `digest`.
    pub fn validate<S: ImageStore + ?Sized>(
        &self,
        images: &S,
        digest: B256,
        signature: &[u8],
    ) -> Result<(bool, B256), SignatureError> {
        let recovered = self.recover(digest, signature)?;
        let is_valid = recovered.meets_threshold()
            && images.is_valid_image(self.context().wallet, recovered.image_hash);
        Ok((is_valid, recovered.subdigest))
    }

    /// ERC-1271 `isValidSignature(bytes32,bytes)`.
    pub fn is_valid_signature<S: ImageStore + ?Sized>(
        &self,
        images: &S,
        hash: B256,
        signature: &[u8],
    ) -> Result<[u8; 4], SignatureError> {
        let (is_valid, _) = self.validate(images, hash, signature)?;
        Ok(if is_valid { ERC1271_MAGIC_VALUE_BYTES32 } else { ERC1271_INVALID })
    }

    /// ERC-1271 `isValidSignature(bytes,bytes)`: validates `keccak256(data)`.
    pub fn is_valid_signature_data<S: ImageStore + ?Sized>(
        &self,
        images: &S,
        data: &[u8],
        signature: &[u8],
    ) -> Result<[u8; 4], SignatureError> {
        let (is_valid, _) = self.validate(images, keccak256(data), signature)?;
        Ok(if is_valid { ERC1271_MAGIC_VALUE_BYTES } else { ERC1271_INVALID })
    }
}
