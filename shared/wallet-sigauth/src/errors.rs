use alloy_primitives::{Address, U256};

/// Errors while parsing a strategy payload or a signer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Truncated,
    /// Tree part flag outside the known set.
    UnknownFlag(u8),
    /// A chained envelope with no links.
    EmptyChain,
    /// Branch / nested parts recurse deeper than the configured limit.
    TreeTooDeep { max: usize },
    /// Summed signer weight does not fit in 256 bits.
    WeightOverflow,
}

/// Errors while proving a single signer's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Used by verifiers that do not support a proof kind.
    NotImplemented,
    InvalidSignatureLength(usize),
    InvalidV(u8),
    /// `s` is in the upper half of the curve order (malleable signature).
    InvalidSValue,
    UnsupportedSignatureType(u8),
    /// ecrecover produced no address.
    RecoveryFailed,
    /// A dynamic-signature part does not prove its claimed signer.
    InvalidDynamicSignature { signer: Address },
    /// The ERC-1271 call itself failed.
    ContractCallFailed { signer: Address },
}

/// Chained-signature policy violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// A link's checkpoint is lower than the one before it.
    CheckpointOrder { previous: u32, next: u32 },
    /// A link does not carry enough weight for its own configuration.
    LowWeightChainedLink { index: usize, threshold: U256, weight: U256 },
    /// Chained envelopes nested deeper than the configured limit.
    DepthExceeded { max: usize },
}

/// Failures of the single image-hash write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// Only the wallet itself may replace its configuration.
    OnlySelf { caller: Address, account: Address },
    ImageHashIsZero,
}

/// Any failure of signature recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The envelope has no type byte.
    EmptySignature,
    /// The type byte is not a known [`crate::SignatureType`].
    InvalidSignatureType(u8),
    Decode(DecodeError),
    Signer(SignerError),
    Chain(ChainError),
}

impl SignatureError {
    /// Malformed envelope: missing or unknown type byte.
    pub fn is_malformed_envelope(&self) -> bool {
        matches!(
            self,
            SignatureError::EmptySignature | SignatureError::InvalidSignatureType(_)
        )
    }

    /// Chain ordering / depth / link-weight violation.
    pub fn is_chain_policy(&self) -> bool {
        matches!(self, SignatureError::Chain(_))
    }
}

impl From<DecodeError> for SignatureError {
    fn from(err: DecodeError) -> Self {
        SignatureError::Decode(err)
    }
}

impl From<SignerError> for SignatureError {
    fn from(err: SignerError) -> Self {
        SignatureError::Signer(err)
    }
}

impl From<ChainError> for SignatureError {
    fn from(err: ChainError) -> Self {
        SignatureError::Chain(err)
    }
}
