//! ERC-1271 / ERC-165 compatibility shims.
//!
//! Keeps the module ABI-aligned with what wallets, relayers and dapps expect from a smart
//! account, while the recovery logic lives in `wallet-sigauth`.

pub mod constants;
pub mod interfaces;
