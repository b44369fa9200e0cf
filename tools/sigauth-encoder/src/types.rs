use std::collections::BTreeMap;

use alloy_primitives::{Address, B256};

/// One entry of a signer tree, in fold order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Leaf {
    /// EOA or contract signer.
    Signer { address: Address, weight: u8 },
    /// Opaque subtree hash (keeps the image hash without revealing the subtree).
    Node(B256),
    /// Pre-approved subdigest; a signature over it needs no signer at all.
    Subdigest(B256),
    /// Subtree folded into its own root.
    Branch(Vec<Leaf>),
    /// Inner configuration counted as one signer of `weight` once its own `threshold` is met.
    Nested {
        weight: u8,
        threshold: u16,
        tree: Vec<Leaf>,
    },
}

/// Signer configuration a wallet commits to through its image hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    pub threshold: u16,
    /// Configuration version; chained updates never go back.
    pub checkpoint: u32,
    pub tree: Vec<Leaf>,
}

/// Proof a signer contributes to one signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignerProof {
    /// 66-byte `r ‖ s ‖ v ‖ sigType` from an EOA.
    Eoa([u8; 66]),
    /// Payload handed to the signer contract's ERC-1271 check.
    Contract(Vec<u8>),
}

/// Proofs by signer address; signers without one are encoded as plain address leaves.
pub type Proofs = BTreeMap<Address, SignerProof>;
