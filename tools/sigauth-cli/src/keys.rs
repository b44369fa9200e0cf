use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use k256::ecdsa::SigningKey;

/// Parse a hex private key, with or without the `0x` prefix.
pub fn parse_signing_key(hex_key: &str) -> Result<SigningKey> {
    let trimmed = hex_key.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed)).context("private key is not hex")?;
    SigningKey::from_slice(&bytes).map_err(|_| anyhow!("private key is not a valid secp256k1 scalar"))
}

/// One hex private key per non-empty line.
pub fn load_signing_keys(path: &Path) -> Result<Vec<SigningKey>> {
    let contents = fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| parse_signing_key(line).with_context(|| format!("{} key #{}", path.display(), i + 1)))
        .collect()
}

/// Keys given inline and through a key file, inline first.
pub fn collect_signing_keys(inline: &[String], path: Option<&Path>) -> Result<Vec<SigningKey>> {
    let mut keys = inline.iter().map(|k| parse_signing_key(k)).collect::<Result<Vec<_>>>()?;
    if let Some(path) = path {
        keys.extend(load_signing_keys(path)?);
    }
    if keys.is_empty() {
        return Err(anyhow!(
            "missing signer key: provide --private-key or --private-key-path (or set PKEY/PRIV_KEY_PATH)"
        ));
    }
    Ok(keys)
}
