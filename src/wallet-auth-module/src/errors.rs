//! Revert data for the auth module.

use alloy_sol_types::sol;
use stylus_sdk::{alloy_primitives::U256, stylus_proc::SolidityError};
use wallet_sigauth::{ChainError, SignatureError, UpdateError};

sol! {
    error EmptySignature();
    error InvalidSignatureType(uint8 signatureType);
    error MalformedSignature();
    error InvalidSignerSignature();
    error WrongChainedCheckpointOrder(uint256 nextCheckpoint, uint256 checkpoint);
    error LowWeightChainedSignature(uint256 index, uint256 threshold, uint256 weight);
    error ChainedSignatureTooDeep(uint256 maxDepth);
    error OnlySelfAuth(address sender, address account);
    error ImageHashIsZero();
    error InvalidChainId();
}

#[derive(SolidityError)]
pub enum AuthError {
    EmptySignature(EmptySignature),
    InvalidSignatureType(InvalidSignatureType),
    MalformedSignature(MalformedSignature),
    InvalidSignerSignature(InvalidSignerSignature),
    WrongChainedCheckpointOrder(WrongChainedCheckpointOrder),
    LowWeightChainedSignature(LowWeightChainedSignature),
    ChainedSignatureTooDeep(ChainedSignatureTooDeep),
    OnlySelfAuth(OnlySelfAuth),
    ImageHashIsZero(ImageHashIsZero),
    InvalidChainId(InvalidChainId),
}

impl From<SignatureError> for AuthError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::EmptySignature => AuthError::EmptySignature(EmptySignature {}),
            SignatureError::InvalidSignatureType(signature_type) => {
                AuthError::InvalidSignatureType(InvalidSignatureType {
                    signatureType: signature_type,
                })
            }
            SignatureError::Decode(_) => AuthError::MalformedSignature(MalformedSignature {}),
            SignatureError::Signer(_) => AuthError::InvalidSignerSignature(InvalidSignerSignature {}),
            SignatureError::Chain(ChainError::CheckpointOrder { previous, next }) => {
                AuthError::WrongChainedCheckpointOrder(WrongChainedCheckpointOrder {
                    nextCheckpoint: U256::from(next),
                    checkpoint: U256::from(previous),
                })
            }
            SignatureError::Chain(ChainError::LowWeightChainedLink {
                index,
                threshold,
                weight,
            }) => AuthError::LowWeightChainedSignature(LowWeightChainedSignature {
                index: U256::from(index),
                threshold,
                weight,
            }),
            SignatureError::Chain(ChainError::DepthExceeded { max }) => {
                AuthError::ChainedSignatureTooDeep(ChainedSignatureTooDeep {
                    maxDepth: U256::from(max),
                })
            }
        }
    }
}

impl From<UpdateError> for AuthError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::OnlySelf { caller, account } => {
                AuthError::OnlySelfAuth(OnlySelfAuth { sender: caller, account })
            }
            UpdateError::ImageHashIsZero => AuthError::ImageHashIsZero(ImageHashIsZero {}),
        }
    }
}
