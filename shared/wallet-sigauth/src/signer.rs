//! Single-signer proofs inside a signature tree.
//!
//! A signature part is 66 bytes: `r ‖ s ‖ v ‖ sigType`. Contract signers (ERC-1271) carry an
//! arbitrary payload followed by the sigType byte.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::{errors::SignerError, verifier::SignerVerifier};

pub const SIGNATURE_PART_LEN: usize = 66;

/// n/2 for secp256k1; larger `s` values are rejected (EIP-2).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// How a signer produced its proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SigKind {
    /// ecrecover directly over the subdigest.
    Eip712 = 1,
    /// ecrecover over the `personal_sign` wrapping of the subdigest.
    EthSign = 2,
    /// ERC-1271 call on the signer contract.
    WalletBytes32 = 3,
}

impl TryFrom<u8> for SigKind {
    type Error = SignerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SigKind::Eip712),
            2 => Ok(SigKind::EthSign),
            3 => Ok(SigKind::WalletBytes32),
            other => Err(SignerError::UnsupportedSignatureType(other)),
        }
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" ‖ digest)`.
pub fn eth_signed_digest(digest: B256) -> B256 {
    let mut buf = Vec::with_capacity(28 + 32);
    buf.extend_from_slice(b"\x19Ethereum Signed Message:\n32");
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}

/// Recover the EOA behind a 66-byte signature part.
pub fn recover_signer<V: SignerVerifier>(
    verifier: &V,
    digest: B256,
    sig: &[u8],
) -> Result<Address, SignerError> {
    if sig.len() != SIGNATURE_PART_LEN {
        return Err(SignerError::InvalidSignatureLength(sig.len()));
    }

    let r = B256::from_slice(&sig[0..32]);
    let s = B256::from_slice(&sig[32..64]);
    let v = sig[64];

    if U256::from_be_bytes(s.0) > U256::from_be_slice(&SECP256K1_HALF_ORDER) {
        return Err(SignerError::InvalidSValue);
    }
    if v != 27 && v != 28 {
        return Err(SignerError::InvalidV(v));
    }

    let signed = match SigKind::try_from(sig[65])? {
        SigKind::Eip712 => digest,
        SigKind::EthSign => eth_signed_digest(digest),
        SigKind::WalletBytes32 => return Err(SignerError::UnsupportedSignatureType(sig[65])),
    };

    let recovered = verifier.ecrecover(signed, v, r, s)?;
    if recovered == Address::ZERO {
        return Err(SignerError::RecoveryFailed);
    }
    Ok(recovered)
}

/// Check a dynamic-signature proof for `signer`.
///
/// The last byte selects the proof kind; contract signers receive the bytes before it.
pub fn is_valid_signer<V: SignerVerifier>(
    verifier: &V,
    digest: B256,
    signer: Address,
    sig: &[u8],
) -> Result<bool, SignerError> {
    let Some((&kind, payload)) = sig.split_last() else {
        return Err(SignerError::InvalidSignatureLength(0));
    };

    match SigKind::try_from(kind)? {
        SigKind::Eip712 | SigKind::EthSign => Ok(recover_signer(verifier, digest, sig)? == signer),
        SigKind::WalletBytes32 => verifier.is_valid_contract_signature(signer, digest, payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_sig, MockVerifier};

    #[test]
    fn recovers_eip712_signer() {
        let signer = Address::repeat_byte(0x42);
        let sig = mock_sig(signer, SigKind::Eip712);
        assert_eq!(recover_signer(&MockVerifier::default(), B256::ZERO, &sig), Ok(signer));
    }

    #[test]
    fn eth_sign_wraps_the_digest() {
        let signer = Address::repeat_byte(0x42);
        let verifier = MockVerifier::default();
        let digest = B256::repeat_byte(3);
        recover_signer(&verifier, digest, &mock_sig(signer, SigKind::EthSign)).unwrap();
        assert_eq!(verifier.last_digest(), Some(eth_signed_digest(digest)));
    }

    #[test]
    fn rejects_bad_v_and_high_s() {
        let signer = Address::repeat_byte(0x42);
        let verifier = MockVerifier::default();

        let mut sig = mock_sig(signer, SigKind::Eip712);
        sig[64] = 29;
        assert_eq!(recover_signer(&verifier, B256::ZERO, &sig), Err(SignerError::InvalidV(29)));

        let mut sig = mock_sig(signer, SigKind::Eip712);
        sig[32..64].copy_from_slice(&[0xff; 32]);
        assert_eq!(recover_signer(&verifier, B256::ZERO, &sig), Err(SignerError::InvalidSValue));
    }

    #[test]
    fn rejects_wrong_length_and_unknown_kind() {
        let verifier = MockVerifier::default();
        assert_eq!(
            recover_signer(&verifier, B256::ZERO, &[0u8; 65]),
            Err(SignerError::InvalidSignatureLength(65))
        );
        let mut sig = mock_sig(Address::repeat_byte(1), SigKind::Eip712);
        sig[65] = 9;
        assert_eq!(
            recover_signer(&verifier, B256::ZERO, &sig),
            Err(SignerError::UnsupportedSignatureType(9))
        );
    }

    #[test]
    fn zero_recovery_fails() {
        let sig = mock_sig(Address::ZERO, SigKind::Eip712);
        assert_eq!(
            recover_signer(&MockVerifier::default(), B256::ZERO, &sig),
            Err(SignerError::RecoveryFailed)
        );
    }

    #[test]
    fn contract_signers_use_erc1271() {
        let wallet = Address::repeat_byte(0x77);
        let verifier = MockVerifier::default().with_contract_signer(wallet);
        assert_eq!(is_valid_signer(&verifier, B256::ZERO, wallet, &[0xab, 0xcd, 3]), Ok(true));
        assert_eq!(
            is_valid_signer(&verifier, B256::ZERO, Address::repeat_byte(1), &[3]),
            Ok(false)
        );
        assert_eq!(
            is_valid_signer(&MockVerifier::default(), B256::ZERO, wallet, &[]),
            Err(SignerError::InvalidSignatureLength(0))
        );
    }

    #[test]
    fn dynamic_eoa_proof_must_match_claimed_signer() {
        let signer = Address::repeat_byte(0x42);
        let sig = mock_sig(signer, SigKind::Eip712);
        let verifier = MockVerifier::default();
        assert_eq!(is_valid_signer(&verifier, B256::ZERO, signer, &sig), Ok(true));
        assert_eq!(
            is_valid_signer(&verifier, B256::ZERO, Address::repeat_byte(0x43), &sig),
            Ok(false)
        );
    }
}
