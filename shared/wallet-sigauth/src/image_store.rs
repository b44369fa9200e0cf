//! Which configuration a wallet currently accepts.
//!
//! Recovery only ever reads this state. [`MemoryImageStore::update_image_hash`] is the one write
//! path and only the wallet itself may use it.

use alloc::collections::BTreeMap;

use alloy_primitives::{Address, B256};

use crate::errors::UpdateError;

/// Read side of the wallet configuration state.
pub trait ImageStore {
    fn is_valid_image(&self, account: Address, image_hash: B256) -> bool;
}

impl<T: ImageStore + ?Sized> ImageStore for &T {
    fn is_valid_image(&self, account: Address, image_hash: B256) -> bool {
        (**self).is_valid_image(account, image_hash)
    }
}

/// Preconditions of every image-hash write: self-call, non-zero commitment.
pub fn check_image_update(caller: Address, account: Address, image_hash: B256) -> Result<(), UpdateError> {
    if caller != account {
        return Err(UpdateError::OnlySelf { caller, account });
    }
    if image_hash == B256::ZERO {
        return Err(UpdateError::ImageHashIsZero);
    }
    Ok(())
}

/// Image hashes keyed by wallet address.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageStore {
    images: BTreeMap<Address, B256>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_hash(&self, account: Address) -> Option<B256> {
        self.images.get(&account).copied()
    }

    /// Replace `account`'s configuration. `caller` must be the account itself.
    pub fn update_image_hash(
        &mut self,
        caller: Address,
        account: Address,
        image_hash: B256,
    ) -> Result<(), UpdateError> {
        check_image_update(caller, account, image_hash)?;
        self.images.insert(account, image_hash);
        Ok(())
    }
}

impl ImageStore for MemoryImageStore {
    fn is_valid_image(&self, account: Address, image_hash: B256) -> bool {
        image_hash != B256::ZERO && self.image_hash(account) == Some(image_hash)
    }
}

/// Counterfactual wallets: the initial image hash is the CREATE2 salt of the wallet address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterfactualImage {
    pub factory: Address,
    pub init_code_hash: B256,
}

impl ImageStore for CounterfactualImage {
    fn is_valid_image(&self, account: Address, image_hash: B256) -> bool {
        self.factory.create2(image_hash.0, self.init_code_hash.0) == account
    }
}
