//! Off-chain counterpart of the auth module: builds configurations, signs subdigests with k256 and
//! encodes signature envelopes the recovery core accepts.

pub mod encoder;
pub mod types;
pub mod verifier;


pub use encoder::{
    encode_chained, encode_signature, image_hash, sign_digest, signer_address, tree_root,
    EncodeError,
};
pub use types::{Leaf, Proofs, SignerProof, WalletConfig};
pub use verifier::LocalVerifier;
