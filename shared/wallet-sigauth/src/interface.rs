//! ERC-165 interface detection and ERC-1271 return values.

use alloy_primitives::keccak256;

pub const ERC165_INTERFACE_ID: [u8; 4] = [0x01, 0xff, 0xc9, 0xa7];

/// `isValidSignature(bytes32,bytes)` success value.
pub const ERC1271_MAGIC_VALUE_BYTES32: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];
/// `isValidSignature(bytes,bytes)` success value.
pub const ERC1271_MAGIC_VALUE_BYTES: [u8; 4] = [0x20, 0xc1, 0x3b, 0x0b];
pub const ERC1271_INVALID: [u8; 4] = [0u8; 4];

pub fn selector(sig: &str) -> [u8; 4] {
    let h = keccak256(sig.as_bytes());
    [h[0], h[1], h[2], h[3]]
}

fn xor(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Both `isValidSignature` overloads.
pub fn erc1271_wallet_interface_id() -> [u8; 4] {
    xor(
        selector("isValidSignature(bytes,bytes)"),
        selector("isValidSignature(bytes32,bytes)"),
    )
}

/// `updateImageHash(bytes32)` + `imageHash()`.
pub fn module_auth_interface_id() -> [u8; 4] {
    xor(selector("updateImageHash(bytes32)"), selector("imageHash()"))
}

/// Interfaces implemented by the wallet auth module, on top of plain ERC-165.
pub fn supports_interface(interface_id: [u8; 4]) -> bool {
    interface_id == erc1271_wallet_interface_id()
        || interface_id == module_auth_interface_id()
        || base_supports_interface(interface_id)
}

fn base_supports_interface(interface_id: [u8; 4]) -> bool {
    interface_id == ERC165_INTERFACE_ID
}
