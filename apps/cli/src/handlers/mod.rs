pub mod attrs;
pub mod combinations;
pub mod gift_card;
pub mod quote;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// Resolves a document argument; `-` reads it from stdin.
pub(crate) fn read_document(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_owned());
    }
    let mut xml = String::new();
    io::stdin().read_to_string(&mut xml).context("Failed to read the attribute document from stdin")?;
    Ok(xml.trim_end().to_owned())
}

/// Reads a TOML snapshot file.
pub(crate) fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Malformed snapshot {}", path.display()))
}
