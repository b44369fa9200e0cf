//! Digest transforms: bind a caller digest to the wallet (and, usually, the network).
//!
//! Both transforms hash `"\x19\x01" ‖ uint256(chainId) ‖ wallet ‖ digest`; the chain-agnostic one
//! fixes `chainId = 0`. [`WalletContext`] only accepts non-zero chain ids, so the two outputs never
//! coincide for the same wallet and digest.

use core::num::NonZeroU64;

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, B256, U256};

/// The network + wallet a signature is being checked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletContext {
    pub chain_id: NonZeroU64,
    pub wallet: Address,
}

impl WalletContext {
    pub fn new(chain_id: NonZeroU64, wallet: Address) -> Self {
        Self { chain_id, wallet }
    }

    /// Chain-bound subdigest for this wallet.
    pub fn subdigest(&self, digest: B256) -> B256 {
        chain_bound_subdigest(self.chain_id, self.wallet, digest)
    }

    /// Chain-agnostic subdigest for this wallet.
    pub fn no_chain_id_subdigest(&self, digest: B256) -> B256 {
        chain_agnostic_subdigest(self.wallet, digest)
    }
}

pub fn chain_bound_subdigest(chain_id: NonZeroU64, wallet: Address, digest: B256) -> B256 {
    encode_subdigest(U256::from(chain_id.get()), wallet, digest)
}

pub fn chain_agnostic_subdigest(wallet: Address, digest: B256) -> B256 {
    encode_subdigest(U256::ZERO, wallet, digest)
}

fn encode_subdigest(chain_id: U256, wallet: Address, digest: B256) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 20 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(&chain_id.to_be_bytes::<32>());
    buf.extend_from_slice(wallet.as_slice());
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}
