//! k256-backed signer verifier for off-chain recovery.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use wallet_sigauth::{signer::recover_signer, SignerError, SignerVerifier};

use crate::encoder::verifying_key_address;

/// Recovers EOAs locally. Contract signers are modelled as single-owner ERC-1271 wallets whose
/// proof is the owner's 66-byte signature part.
#[derive(Clone, Debug, Default)]
pub struct LocalVerifier {
    contract_owners: BTreeMap<Address, Address>,
}

impl LocalVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contract_signer(mut self, contract: Address, owner: Address) -> Self {
        self.contract_owners.insert(contract, owner);
        self
    }
}

impl SignerVerifier for LocalVerifier {
    fn ecrecover(&self, digest: B256, v: u8, r: B256, s: B256) -> Result<Address, SignerError> {
        let recovery_id = v
            .checked_sub(27)
            .and_then(RecoveryId::from_byte)
            .ok_or(SignerError::InvalidV(v))?;

        let mut rs = [0u8; 64];
        rs[0..32].copy_from_slice(r.as_slice());
        rs[32..64].copy_from_slice(s.as_slice());
        let signature = Signature::from_slice(&rs).map_err(|_| SignerError::RecoveryFailed)?;

        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
            .map_err(|_| SignerError::RecoveryFailed)?;
        Ok(verifying_key_address(&key))
    }

    fn is_valid_contract_signature(
        &self,
        signer: Address,
        digest: B256,
        signature: &[u8],
    ) -> Result<bool, SignerError> {
        let owner = self
            .contract_owners
            .get(&signer)
            .ok_or(SignerError::ContractCallFailed { signer })?;
        Ok(recover_signer(self, digest, signature)? == *owner)
    }
}
