//! Solidity ABI interface scaffolding for the auth module and its signer contracts.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// Contract signers nested inside a signature tree.
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4);
    }

    interface IModuleAuth {
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4);
        function isValidSignature(bytes data, bytes signature) external view returns (bytes4);
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
        function imageHash() external view returns (bytes32);
        function updateImageHash(bytes32 imageHash) external;
        function signatureRecovery(bytes32 digest, bytes signature)
            external
            view
            returns (uint256 threshold, uint256 weight, bytes32 imageHash, bytes32 subdigest, uint256 checkpoint);
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolCall;
    use wallet_sigauth::interface::{
        erc1271_wallet_interface_id, module_auth_interface_id, ERC165_INTERFACE_ID,
    };

    use super::IModuleAuth;

    fn xor(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
        [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
    }

    #[test]
    fn interface_ids_match_abi() {
        assert_eq!(
            xor(
                IModuleAuth::isValidSignature_0Call::SELECTOR,
                IModuleAuth::isValidSignature_1Call::SELECTOR
            ),
            erc1271_wallet_interface_id()
        );
        assert_eq!(
            xor(
                IModuleAuth::updateImageHashCall::SELECTOR,
                IModuleAuth::imageHashCall::SELECTOR
            ),
            module_auth_interface_id()
        );
        assert_eq!(IModuleAuth::supportsInterfaceCall::SELECTOR, ERC165_INTERFACE_ID);
    }
}
