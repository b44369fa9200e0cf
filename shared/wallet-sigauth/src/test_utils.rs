//! Mock signer verifier and payload builders for unit tests.

use core::cell::Cell;
use std::collections::BTreeSet;

use alloy_primitives::{Address, B256};

use crate::{errors::SignerError, signer::SigKind, verifier::SignerVerifier};

/// "Recovers" the address stored in the low 20 bytes of `r`, whatever the digest.
#[derive(Default)]
pub struct MockVerifier {
    contract_signers: BTreeSet<Address>,
    last_digest: Cell<Option<B256>>,
}

impl MockVerifier {
    pub fn with_contract_signer(mut self, signer: Address) -> Self {
        self.contract_signers.insert(signer);
        self
    }

    pub fn last_digest(&self) -> Option<B256> {
        self.last_digest.get()
    }
}

impl SignerVerifier for MockVerifier {
    fn ecrecover(&self, digest: B256, _v: u8, r: B256, _s: B256) -> Result<Address, SignerError> {
        self.last_digest.set(Some(digest));
        Ok(Address::from_slice(&r[12..32]))
    }

    fn is_valid_contract_signature(
        &self,
        signer: Address,
        _digest: B256,
        _signature: &[u8],
    ) -> Result<bool, SignerError> {
        Ok(self.contract_signers.contains(&signer))
    }
}

/// 66-byte signature part the mock recovers to `signer`.
pub fn mock_sig(signer: Address, kind: SigKind) -> Vec<u8> {
    let mut sig = vec![0u8; 66];
    sig[12..32].copy_from_slice(signer.as_slice());
    sig[63] = 1;
    sig[64] = 27;
    sig[65] = kind as u8;
    sig
}

/// Tree part: signer with a mock EIP-712 signature.
pub fn sig_part(signer: Address, weight: u8) -> Vec<u8> {
    let mut part = vec![0x00, weight];
    part.extend_from_slice(&mock_sig(signer, SigKind::Eip712));
    part
}

/// Tree part: signer that did not sign.
pub fn addr_part(signer: Address, weight: u8) -> Vec<u8> {
    let mut part = vec![0x01, weight];
    part.extend_from_slice(signer.as_slice());
    part
}

/// Legacy payload (without the type byte).
pub fn legacy_payload(threshold: u8, checkpoint: u32, parts: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = vec![threshold];
    buf.extend_from_slice(&checkpoint.to_be_bytes());
    parts.iter().for_each(|p| buf.extend_from_slice(p));
    buf
}

/// Dynamic payload (without the type byte).
pub fn dynamic_payload(threshold: u16, checkpoint: u32, parts: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = threshold.to_be_bytes().to_vec();
    buf.extend_from_slice(&checkpoint.to_be_bytes());
    parts.iter().for_each(|p| buf.extend_from_slice(p));
    buf
}

pub fn envelope(ty: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![ty];
    buf.extend_from_slice(payload);
    buf
}

/// Chained envelope from complete link envelopes.
pub fn chained(links: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = vec![0x03];
    for link in links {
        buf.extend_from_slice(&(link.len() as u32).to_be_bytes()[1..]);
        buf.extend_from_slice(link);
    }
    buf
}
