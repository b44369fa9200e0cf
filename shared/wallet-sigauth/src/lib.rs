//! Signature recovery and validation for weighted multi-signer smart wallets.
//!
//! A signature envelope is `[type byte][payload]`. The [`dispatcher`] reads the type byte, binds
//! the caller's digest to the right context ([`subdigest`]), and hands the payload to a recovery
//! strategy ([`strategy`]) or to [`chained`] recovery. The [`validation`] gate then compares the
//! recovered weight against the recovered threshold and asks an [`image_store::ImageStore`]
//! whether the recovered configuration is the one currently accepted for the wallet.
//!
//! The crate is `no_std` and shared between the Stylus module and the off-chain tooling; anything
//! that needs the host (ecrecover, ERC-1271 calls, storage) sits behind a trait.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod bytes;
pub mod chained;
pub mod dispatcher;
pub mod errors;
pub mod image;
pub mod image_store;
pub mod interface;
pub mod signature_type;
pub mod signer;
pub mod strategy;
pub mod subdigest;
pub mod validation;
pub mod verifier;

#[cfg(test)]
mod test_utils;

pub use dispatcher::{RecoveryLimits, RecoveryResult, SignatureRecovery};
pub use errors::{ChainError, DecodeError, SignatureError, SignerError, UpdateError};
pub use image_store::{CounterfactualImage, ImageStore, MemoryImageStore};
pub use signature_type::SignatureType;
pub use subdigest::WalletContext;
pub use verifier::SignerVerifier;
