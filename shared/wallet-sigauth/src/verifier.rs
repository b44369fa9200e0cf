use alloy_primitives::{Address, B256};

use crate::errors::SignerError;

/// Host capabilities needed to prove a signer's identity.
///
/// Implemented on-chain over the ecrecover precompile and `staticcall`, off-chain over k256.
pub trait SignerVerifier {
    /// Raw ecrecover: `v` is 27 or 28. Returns the zero address when nothing recovers.
    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Result<Address, SignerError>;

    /// ERC-1271 check against a signer contract.
    fn is_valid_contract_signature(
        &self,
        _signer: Address,
        _digest: B256,
        _signature: &[u8],
    ) -> Result<bool, SignerError> {
        Err(SignerError::NotImplemented)
    }
}

impl<T: SignerVerifier + ?Sized> SignerVerifier for &T {
    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Result<Address, SignerError> {
        (**self).ecrecover(digest, v, r, s)
    }

    fn is_valid_contract_signature(
        &self,
        signer: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<bool, SignerError> {
        (**self).is_valid_contract_signature(signer, digest, signature)
    }
}
