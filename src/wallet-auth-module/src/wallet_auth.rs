//! Stylus-based weighted multi-signer **auth module** for smart wallets.
//!
//! Design notes:
//! - Recovery is delegated to `wallet-sigauth`; this module supplies the host pieces (chain id,
//!   own address, ecrecover precompile, ERC-1271 calls) and the stored image hash.
//! - The module address is the wallet address: subdigests bind to `address(this)` and only
//!   self-calls may replace the image hash.
//! - An insufficient or stale signature returns the zero magic value; malformed or malicious
//!   signatures revert.

use core::num::NonZeroU64;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
    stylus_core::log,
};

use alloy_sol_types::sol;
use wallet_sigauth::{
    image_store::check_image_update, interface, ImageStore, SignatureRecovery, WalletContext,
};

use crate::{
    erc::constants::{INVALID_SIGNATURE, MAGIC_VALUE_BYTES, MAGIC_VALUE_BYTES32},
    errors::{AuthError, InvalidChainId},
    utils::crypto::HostVerifier,
};

sol! {
    event ImageHashUpdated(bytes32 newImageHash);
}

sol_storage! {
    /// Auth module storage (one wallet per deployment).
    #[entrypoint]
    pub struct WalletAuth {
        /// Image hash of the signer configuration currently accepted by the wallet.
        bytes32 image_hash;
    }
}

/// Snapshot of the stored image hash for one call.
struct StoredImage {
    account: Address,
    image_hash: FixedBytes<32>,
}

impl ImageStore for StoredImage {
    fn is_valid_image(&self, account: Address, image_hash: FixedBytes<32>) -> bool {
        account == self.account && image_hash != FixedBytes::ZERO && image_hash == self.image_hash
    }
}

#[public]
impl WalletAuth {
    /// Currently accepted configuration commitment.
    pub fn image_hash(&self) -> FixedBytes<32> {
        self.image_hash.get()
    }

    /// Replace the accepted configuration. Only callable by the wallet itself.
    pub fn update_image_hash(&mut self, image_hash: FixedBytes<32>) -> Result<(), AuthError> {
        let caller = self.vm().msg_sender();
        let account = self.vm().contract_address();
        check_image_update(caller, account, image_hash)?;

        self.image_hash.set(image_hash);
        log(self.vm(), ImageHashUpdated { newImageHash: image_hash });
        Ok(())
    }

    /// What `signature` proves about `digest`:
    /// `(threshold, weight, imageHash, subdigest, checkpoint)`.
    pub fn signature_recovery(
        &self,
        digest: FixedBytes<32>,
        signature: Bytes,
    ) -> Result<(U256, U256, FixedBytes<32>, FixedBytes<32>, U256), AuthError> {
        let recovered = self.recovery()?.recover(digest, &signature)?;
        Ok((
            recovered.threshold,
            recovered.weight,
            recovered.image_hash,
            recovered.subdigest,
            U256::from(recovered.checkpoint),
        ))
    }

    /// ERC-1271 `isValidSignature(bytes32,bytes)`.
    #[selector(name = "isValidSignature")]
    pub fn is_valid_signature(
        &self,
        hash: FixedBytes<32>,
        signature: Bytes,
    ) -> Result<FixedBytes<4>, AuthError> {
        let (is_valid, _subdigest) =
            self.recovery()?.validate(&self.stored_image(), hash, &signature)?;
        Ok(if is_valid { MAGIC_VALUE_BYTES32 } else { INVALID_SIGNATURE })
    }

    /// ERC-1271 `isValidSignature(bytes,bytes)` (validates `keccak256(data)`).
    #[selector(name = "isValidSignature")]
    pub fn is_valid_signature_data(
        &self,
        data: Bytes,
        signature: Bytes,
    ) -> Result<FixedBytes<4>, AuthError> {
        let magic = self
            .recovery()?
            .is_valid_signature_data(&self.stored_image(), &data, &signature)?;
        Ok(if magic == MAGIC_VALUE_BYTES.0 { MAGIC_VALUE_BYTES } else { INVALID_SIGNATURE })
    }

    /// ERC-165.
    pub fn supports_interface(&self, interface_id: FixedBytes<4>) -> bool {
        interface::supports_interface(interface_id.0)
    }
}

impl WalletAuth {
    fn recovery(&self) -> Result<SignatureRecovery<HostVerifier>, AuthError> {
        let chain_id = NonZeroU64::new(self.vm().chain_id())
            .ok_or(AuthError::InvalidChainId(InvalidChainId {}))?;
        let context = WalletContext::new(chain_id, self.vm().contract_address());
        Ok(SignatureRecovery::new(context, HostVerifier::default()))
    }

    fn stored_image(&self) -> StoredImage {
        StoredImage {
            account: self.vm().contract_address(),
            image_hash: self.image_hash.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use stylus_sdk::{alloy_primitives::keccak256, testing::*};
    use wallet_sigauth::image::{image_hash, static_digest_leaf};

    use super::*;

    /// Dynamic envelope whose only leaf pre-approves `subdigest` (threshold 1, checkpoint 0).
    fn static_envelope(subdigest: FixedBytes<32>) -> Vec<u8> {
        let mut sig = vec![0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x05];
        sig.extend_from_slice(subdigest.as_slice());
        sig
    }

    fn context(vm: &TestVM) -> WalletContext {
        WalletContext::new(NonZeroU64::new(vm.chain_id()).unwrap(), vm.contract_address())
    }

    /// Deploy with the image hash of `static_envelope(subdigest)` accepted.
    fn accepting(vm: &TestVM, subdigest: FixedBytes<32>) -> WalletAuth {
        let mut contract = WalletAuth::from(vm);
        vm.set_sender(vm.contract_address());
        let image = image_hash(static_digest_leaf(subdigest), 1, 0);
        assert!(contract.update_image_hash(image).is_ok());
        contract
    }

    #[test]
    fn only_self_updates_image_hash() {
        let vm = TestVM::default();
        let mut contract = WalletAuth::from(&vm);
        let image = FixedBytes::repeat_byte(0x11);

        vm.set_sender(Address::repeat_byte(0x99));
        assert!(contract.update_image_hash(image).is_err());
        assert_eq!(contract.image_hash(), FixedBytes::ZERO);

        vm.set_sender(vm.contract_address());
        assert!(contract.update_image_hash(FixedBytes::ZERO).is_err());
        assert!(contract.update_image_hash(image).is_ok());
        assert_eq!(contract.image_hash(), image);
    }

    #[test]
    fn reports_supported_interfaces() {
        let vm = TestVM::default();
        let contract = WalletAuth::from(&vm);
        assert!(contract.supports_interface(FixedBytes([0x01, 0xff, 0xc9, 0xa7])));
        assert!(!contract.supports_interface(FixedBytes([0xff; 4])));
    }

    #[test]
    fn validates_against_the_stored_image_hash() {
        let vm = TestVM::default();
        let digest = FixedBytes::repeat_byte(0x42);
        let subdigest = context(&vm).subdigest(digest);
        let contract = accepting(&vm, subdigest);
        let sig = static_envelope(subdigest);

        assert!(matches!(
            contract.is_valid_signature(digest, Bytes::from(sig.clone())),
            Ok(magic) if magic == MAGIC_VALUE_BYTES32
        ));
        assert!(matches!(
            contract.is_valid_signature(FixedBytes::repeat_byte(0x43), Bytes::from(sig)),
            Ok(magic) if magic == INVALID_SIGNATURE
        ));
    }

    #[test]
    fn rejects_a_configuration_the_wallet_does_not_accept() {
        let vm = TestVM::default();
        let digest = FixedBytes::repeat_byte(0x42);
        let subdigest = context(&vm).subdigest(digest);
        let contract = WalletAuth::from(&vm);

        assert!(matches!(
            contract.is_valid_signature(digest, Bytes::from(static_envelope(subdigest))),
            Ok(magic) if magic == INVALID_SIGNATURE
        ));
    }

    #[test]
    fn empty_envelope_reverts() {
        let vm = TestVM::default();
        let contract = WalletAuth::from(&vm);
        assert!(matches!(
            contract.is_valid_signature(FixedBytes::ZERO, Bytes::from(Vec::new())),
            Err(AuthError::EmptySignature(_))
        ));
        assert!(matches!(
            contract.is_valid_signature(FixedBytes::ZERO, Bytes::from(vec![0x07])),
            Err(AuthError::InvalidSignatureType(_))
        ));
    }

    #[test]
    fn validates_hashed_data() {
        let vm = TestVM::default();
        let data = b"transfer 1 ether".to_vec();
        let subdigest = context(&vm).subdigest(keccak256(&data));
        let contract = accepting(&vm, subdigest);

        assert!(matches!(
            contract.is_valid_signature_data(Bytes::from(data), Bytes::from(static_envelope(subdigest))),
            Ok(magic) if magic == MAGIC_VALUE_BYTES
        ));
        assert!(matches!(
            contract.is_valid_signature_data(
                Bytes::from(b"transfer 2 ether".to_vec()),
                Bytes::from(static_envelope(subdigest))
            ),
            Ok(magic) if magic == INVALID_SIGNATURE
        ));
    }

    #[test]
    fn signature_recovery_returns_the_tuple() {
        let vm = TestVM::default();
        let digest = FixedBytes::repeat_byte(0x42);
        let subdigest = context(&vm).subdigest(digest);
        let contract = WalletAuth::from(&vm);

        let Ok((threshold, weight, image, recovered_subdigest, checkpoint)) =
            contract.signature_recovery(digest, Bytes::from(static_envelope(subdigest)))
        else {
            panic!("recovery failed");
        };
        assert_eq!(threshold, U256::from(1));
        assert_eq!(weight, U256::MAX);
        assert_eq!(image, image_hash(static_digest_leaf(subdigest), 1, 0));
        assert_eq!(recovered_subdigest, subdigest);
        assert_eq!(checkpoint, U256::ZERO);
    }
}
