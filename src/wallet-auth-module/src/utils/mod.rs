//! Host glue for the auth module.
//!
//! These helpers stay small and deterministic, as they run inside Stylus / WASM.

pub mod crypto;
