//! Return values mirrored from ERC-1271.

use stylus_sdk::alloy_primitives::FixedBytes;
use wallet_sigauth::interface::{
    ERC1271_INVALID, ERC1271_MAGIC_VALUE_BYTES, ERC1271_MAGIC_VALUE_BYTES32,
};

// `isValidSignature(bytes32,bytes)` success.
pub const MAGIC_VALUE_BYTES32: FixedBytes<4> = FixedBytes(ERC1271_MAGIC_VALUE_BYTES32);
// `isValidSignature(bytes,bytes)` success.
pub const MAGIC_VALUE_BYTES: FixedBytes<4> = FixedBytes(ERC1271_MAGIC_VALUE_BYTES);
pub const INVALID_SIGNATURE: FixedBytes<4> = FixedBytes(ERC1271_INVALID);

// Gas forwarded to the ecrecover precompile and to signer contracts.
pub const ECRECOVER_GAS: u64 = 50_000;
pub const ERC1271_CALL_GAS: u64 = 200_000;
