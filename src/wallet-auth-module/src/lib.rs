//! Stylus wallet authentication module.
//!
//! Exposes the `wallet-sigauth` recovery core to EVM callers: ERC-1271 `isValidSignature`,
//! ERC-165 `supportsInterface`, and the self-only `updateImageHash` write path.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod erc;
pub mod errors;
pub mod utils;
pub mod wallet_auth;

pub use wallet_auth::WalletAuth;
