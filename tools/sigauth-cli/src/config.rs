//! JSON wallet configuration files.
//!
//! ```json
//! {
//!   "threshold": 2,
//!   "checkpoint": 1,
//!   "tree": [
//!     { "signer": { "address": "0x…", "weight": 1 } },
//!     { "nested": { "weight": 1, "threshold": 1, "tree": [ { "node": "0x…" } ] } }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use serde::Deserialize;
use sigauth_encoder::{Leaf, WalletConfig};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum LeafFile {
    Signer { address: Address, weight: u8 },
    Node(B256),
    Subdigest(B256),
    Branch(Vec<LeafFile>),
    Nested {
        weight: u8,
        threshold: u16,
        tree: Vec<LeafFile>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalletConfigFile {
    pub threshold: u16,
    #[serde(default)]
    pub checkpoint: u32,
    pub tree: Vec<LeafFile>,
}

impl From<LeafFile> for Leaf {
    fn from(leaf: LeafFile) -> Self {
        match leaf {
            LeafFile::Signer { address, weight } => Leaf::Signer { address, weight },
            LeafFile::Node(hash) => Leaf::Node(hash),
            LeafFile::Subdigest(digest) => Leaf::Subdigest(digest),
            LeafFile::Branch(tree) => Leaf::Branch(tree.into_iter().map(Leaf::from).collect()),
            LeafFile::Nested {
                weight,
                threshold,
                tree,
            } => Leaf::Nested {
                weight,
                threshold,
                tree: tree.into_iter().map(Leaf::from).collect(),
            },
        }
    }
}

impl From<WalletConfigFile> for WalletConfig {
    fn from(file: WalletConfigFile) -> Self {
        WalletConfig {
            threshold: file.threshold,
            checkpoint: file.checkpoint,
            tree: file.tree.into_iter().map(Leaf::from).collect(),
        }
    }
}

pub fn parse_wallet_config(json: &str) -> Result<WalletConfig> {
    let file: WalletConfigFile = serde_json::from_str(json).context("invalid wallet configuration")?;
    Ok(file.into())
}

pub fn load_wallet_config(path: &Path) -> Result<WalletConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    parse_wallet_config(&json).with_context(|| format!("failed parsing {}", path.display()))
}
