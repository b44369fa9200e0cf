//! Host-backed signer verification.
//!
//! Recovery goes through the EVM `ecrecover` precompile; contract signers are asked through a
//! gas-capped ERC-1271 `staticcall`.

use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use stylus_sdk::{
    alloy_primitives::{address, Address, Bytes, FixedBytes},
    call::RawCall,
};
use wallet_sigauth::{SignerError, SignerVerifier};

use crate::erc::{
    constants::{ECRECOVER_GAS, ERC1271_CALL_GAS, MAGIC_VALUE_BYTES32},
    interfaces::IERC1271,
};

/// Precompile address 0x01.
const ECRECOVER: Address = address!("0000000000000000000000000000000000000001");

#[derive(Clone, Copy, Debug)]
pub struct HostVerifier {
    pub ecrecover_gas: u64,
    pub erc1271_gas: u64,
}

impl Default for HostVerifier {
    fn default() -> Self {
        Self {
            ecrecover_gas: ECRECOVER_GAS,
            erc1271_gas: ERC1271_CALL_GAS,
        }
    }
}

impl SignerVerifier for HostVerifier {
    fn ecrecover(
        &self,
        digest: FixedBytes<32>,
        v: u8,
        r: FixedBytes<32>,
        s: FixedBytes<32>,
    ) -> Result<Address, SignerError> {
        let input = ecrecover_input(digest, v, r, s);
        let out = unsafe { RawCall::new_static().gas(self.ecrecover_gas).call(ECRECOVER, &input) }
            .map_err(|_| SignerError::RecoveryFailed)?;
        // An invalid signature returns no data.
        if out.len() < 32 {
            return Ok(Address::ZERO);
        }
        // precompile returns 32-byte word with address in the low 20 bytes.
        Ok(Address::from_slice(&out[12..32]))
    }

    fn is_valid_contract_signature(
        &self,
        signer: Address,
        digest: FixedBytes<32>,
        signature: &[u8],
    ) -> Result<bool, SignerError> {
        let calldata = erc1271_calldata(digest, signature);
        let out = unsafe { RawCall::new_static().gas(self.erc1271_gas).call(signer, &calldata) }
            .map_err(|_| SignerError::ContractCallFailed { signer })?;
        Ok(out.len() >= 4 && out[0..4] == MAGIC_VALUE_BYTES32[..])
    }
}

/// `digest ‖ uint256(v) ‖ r ‖ s`.
pub fn ecrecover_input(digest: FixedBytes<32>, v: u8, r: FixedBytes<32>, s: FixedBytes<32>) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    // v as 32-byte big-endian word.
    input[63] = v;
    input[64..96].copy_from_slice(r.as_slice());
    input[96..128].copy_from_slice(s.as_slice());
    input
}

pub fn erc1271_calldata(digest: FixedBytes<32>, signature: &[u8]) -> Vec<u8> {
    IERC1271::isValidSignatureCall {
        hash: digest,
        signature: Bytes::copy_from_slice(signature),
    }
    .abi_encode()
}
