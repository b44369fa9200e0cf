use std::{num::NonZeroU64, path::PathBuf};

use alloy_primitives::{Address, B256};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use sigauth_encoder::{
    encode_chained, encode_signature, image_hash, sign_digest, signer_address, tree_root, Leaf,
    LocalVerifier, Proofs, SignerProof,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wallet_sigauth::{
    interface::{ERC1271_INVALID, ERC1271_MAGIC_VALUE_BYTES32}, signer::SigKind, MemoryImageStore, RecoveryLimits,
    SignatureRecovery, SignatureType, WalletContext,
};

mod config;
mod keys;

/// Off-chain companion to the wallet auth module: hash configurations, sign and encode envelopes,
/// and recover or validate them exactly as the contract would.
#[derive(Parser, Debug)]
#[command(name = "sigauth", author, version, about)]
struct Cli {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Network {
    /// Chain id the wallet lives on.
    #[arg(long, env = "CHAIN_ID")]
    chain_id: NonZeroU64,

    /// Wallet address the subdigest binds to.
    #[arg(long, env = "WALLET")]
    wallet: Address,
}

impl Network {
    fn context(&self) -> WalletContext {
        WalletContext::new(self.chain_id, self.wallet)
    }
}

#[derive(clap::Args, Debug)]
struct SignerKeys {
    /// Signer private key (hex string, 0x...). Repeat for several signers.
    #[arg(long = "private-key", env = "PKEY", value_delimiter = ',')]
    private_keys: Vec<String>,

    /// File with one hex private key per line.
    #[arg(long, env = "PRIV_KEY_PATH")]
    private_key_path: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct Limits {
    /// Maximum nesting of chained envelopes.
    #[arg(long, default_value_t = RecoveryLimits::default().max_chain_depth)]
    max_chain_depth: usize,

    /// Maximum nesting of branches and nested configurations.
    #[arg(long, default_value_t = RecoveryLimits::default().max_tree_depth)]
    max_tree_depth: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EnvelopeType {
    Legacy,
    Dynamic,
    NoChainId,
}

impl From<EnvelopeType> for SignatureType {
    fn from(t: EnvelopeType) -> Self {
        match t {
            EnvelopeType::Legacy => SignatureType::Legacy,
            EnvelopeType::Dynamic => SignatureType::Dynamic,
            EnvelopeType::NoChainId => SignatureType::NoChainId,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SignKind {
    Eip712,
    EthSign,
}

impl From<SignKind> for SigKind {
    fn from(k: SignKind) -> Self {
        match k {
            SignKind::Eip712 => SigKind::Eip712,
            SignKind::EthSign => SigKind::EthSign,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree root and image hash of a wallet configuration.
    ImageHash {
        /// Wallet configuration (JSON).
        #[arg(long)]
        config: PathBuf,
    },

    /// Print the subdigest a signer has to sign for `digest`.
    Subdigest {
        #[command(flatten)]
        network: Network,
        #[arg(long)]
        digest: B256,
        /// Chain-agnostic subdigest (chain id 0), for no-chain-id envelopes.
        #[arg(long)]
        no_chain_id: bool,
    },

    /// Sign a subdigest and print the 66-byte signature part.
    Sign {
        #[command(flatten)]
        keys: SignerKeys,
        #[arg(long)]
        subdigest: B256,
        #[arg(long, value_enum, default_value = "eip712")]
        kind: SignKind,
    },

    /// Sign `digest` with every given key that appears in the configuration and encode the envelope.
    Encode {
        #[command(flatten)]
        network: Network,
        #[command(flatten)]
        keys: SignerKeys,
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        digest: B256,
        /// Digest the configuration signs instead of `digest`: the set-image-hash digest of this
        /// image hash (for links after the first in a chain).
        #[arg(long)]
        previous_image_hash: Option<B256>,
        #[arg(long = "type", value_enum, default_value = "dynamic")]
        envelope_type: EnvelopeType,
        #[arg(long, value_enum, default_value = "eip712")]
        kind: SignKind,
    },

    /// Wrap complete link envelopes (hex) into one chained envelope, first link first.
    Chain {
        #[arg(required = true)]
        links: Vec<String>,
    },

    /// Recover threshold, weight, image hash, subdigest and checkpoint from an envelope.
    Recover {
        #[command(flatten)]
        network: Network,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        digest: B256,
        /// Signature envelope (hex).
        #[arg(long)]
        signature: String,
    },

    /// Validate an envelope against the image hash the wallet currently accepts.
    Validate {
        #[command(flatten)]
        network: Network,
        #[command(flatten)]
        limits: Limits,
        #[arg(long)]
        digest: B256,
        #[arg(long)]
        signature: String,
        #[arg(long)]
        image_hash: B256,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let output = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output).context("failed serialising output")?);
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(command: Command) -> Result<Value> {
    match command {
        Command::ImageHash { config } => {
            let config = config::load_wallet_config(&config)?;
            Ok(json!({
                "root": tree_root(&config.tree).to_string(),
                "threshold": config.threshold,
                "checkpoint": config.checkpoint,
                "image_hash": image_hash(&config).to_string(),
            }))
        }
        Command::Subdigest {
            network,
            digest,
            no_chain_id,
        } => {
            let context = network.context();
            let subdigest = if no_chain_id {
                context.no_chain_id_subdigest(digest)
            } else {
                context.subdigest(digest)
            };
            Ok(json!({ "subdigest": subdigest.to_string() }))
        }
        Command::Sign {
            keys,
            subdigest,
            kind,
        } => {
            let keys = keys::collect_signing_keys(&keys.private_keys, keys.private_key_path.as_deref())?;
            let parts = keys
                .iter()
                .map(|key| {
                    let part = sign_digest(key, subdigest, kind.into()).map_err(|e| anyhow!("signing failed: {e}"))?;
                    Ok(json!({
                        "signer": signer_address(key).to_string(),
                        "signature": format!("0x{}", hex::encode(part)),
                    }))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(json!(parts))
        }
        Command::Encode {
            network,
            keys,
            config,
            digest,
            previous_image_hash,
            envelope_type,
            kind,
        } => {
            let config = config::load_wallet_config(&config)?;
            let keys = keys::collect_signing_keys(&keys.private_keys, keys.private_key_path.as_deref())?;
            let signed_digest = match previous_image_hash {
                Some(previous) => wallet_sigauth::image::set_image_hash_digest(previous),
                None => digest,
            };
            let context = network.context();
            let subdigest = match envelope_type {
                EnvelopeType::NoChainId => context.no_chain_id_subdigest(signed_digest),
                EnvelopeType::Legacy | EnvelopeType::Dynamic => context.subdigest(signed_digest),
            };

            let signers = config_signers(&config.tree);
            let mut proofs = Proofs::new();
            for key in &keys {
                let address = signer_address(key);
                if !signers.contains(&address) {
                    warn!(%address, "key does not belong to any signer in the configuration");
                    continue;
                }
                let part = sign_digest(key, subdigest, kind.into()).map_err(|e| anyhow!("signing failed: {e}"))?;
                proofs.insert(address, SignerProof::Eoa(part));
            }
            info!(signed = proofs.len(), signers = signers.len(), %subdigest, "encoding envelope");

            let envelope = encode_signature(&config, &proofs, envelope_type.into())
                .context("encoding failed")?;
            Ok(json!({
                "subdigest": subdigest.to_string(),
                "image_hash": image_hash(&config).to_string(),
                "signature": format!("0x{}", hex::encode(envelope)),
            }))
        }
        Command::Chain { links } => {
            let links = links.iter().map(|l| decode_hex(l)).collect::<Result<Vec<_>>>()?;
            let envelope = encode_chained(&links).context("encoding failed")?;
            Ok(json!({ "signature": format!("0x{}", hex::encode(envelope)) }))
        }
        Command::Recover {
            network,
            limits,
            digest,
            signature,
        } => {
            let recovery = recovery(&network, &limits);
            let signature = decode_hex(&signature)?;
            let recovered = recovery
                .recover(digest, &signature)
                .map_err(|e| anyhow!("recovery failed: {e:?}"))?;
            debug!(?recovered, "recovered");
            Ok(json!({
                "threshold": recovered.threshold.to_string(),
                "weight": recovered.weight.to_string(),
                "image_hash": recovered.image_hash.to_string(),
                "subdigest": recovered.subdigest.to_string(),
                "checkpoint": recovered.checkpoint,
                "meets_threshold": recovered.meets_threshold(),
            }))
        }
        Command::Validate {
            network,
            limits,
            digest,
            signature,
            image_hash,
        } => {
            let recovery = recovery(&network, &limits);
            let signature = decode_hex(&signature)?;
            let mut images = MemoryImageStore::new();
            images
                .update_image_hash(network.wallet, network.wallet, image_hash)
                .map_err(|e| anyhow!("invalid image hash: {e:?}"))?;

            let (is_valid, subdigest) = recovery
                .validate(&images, digest, &signature)
                .map_err(|e| anyhow!("recovery failed: {e:?}"))?;
            let magic = if is_valid { ERC1271_MAGIC_VALUE_BYTES32 } else { ERC1271_INVALID };
            if !is_valid {
                warn!(%subdigest, "signature does not validate against the image hash");
            }
            Ok(json!({
                "valid": is_valid,
                "subdigest": subdigest.to_string(),
                "magic_value": format!("0x{}", hex::encode(magic)),
            }))
        }
    }
}

fn recovery(network: &Network, limits: &Limits) -> SignatureRecovery<LocalVerifier> {
    SignatureRecovery::new(network.context(), LocalVerifier::new()).with_limits(RecoveryLimits {
        max_chain_depth: limits.max_chain_depth,
        max_tree_depth: limits.max_tree_depth,
    })
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).with_context(|| format!("invalid hex: {s}"))
}

/// Every signer address reachable in the tree, nested configurations included.
fn config_signers(tree: &[Leaf]) -> Vec<Address> {
    let mut out = Vec::new();
    for leaf in tree {
        match leaf {
            Leaf::Signer { address, .. } => out.push(*address),
            Leaf::Branch(tree) | Leaf::Nested { tree, .. } => out.extend(config_signers(tree)),
            Leaf::Node(_) | Leaf::Subdigest(_) => {}
        }
    }
    out
}
