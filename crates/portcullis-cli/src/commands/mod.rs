//! CLI command implementations.

pub mod abilities;
pub mod check;
pub mod config;
pub mod resolve;
pub mod version;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use portcullis_config::PortcullisConfig;
use portcullis_rbac::{Authorizer, DirectorySnapshot, MemoryStore};
use tracing::debug;

/// Reads a directory snapshot. `.toml` files are parsed as TOML, anything
/// else as JSON.
pub fn read_snapshot(path: &Path) -> Result<DirectorySnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read directory snapshot {}", path.display()))?;

    let snapshot = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML snapshot {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON snapshot {}", path.display()))?
    };

    debug!(path = %path.display(), "Directory snapshot read");
    Ok(snapshot)
}

/// Builds an authorizer over the configured snapshot and catalog.
pub fn authorizer(config: &PortcullisConfig) -> Result<Authorizer<MemoryStore>> {
    let snapshot = read_snapshot(&config.directory.snapshot)?;
    let store = MemoryStore::from_snapshot(&snapshot).with_context(|| {
        format!(
            "Invalid directory snapshot {}",
            config.directory.snapshot.display()
        )
    })?;
    Ok(Authorizer::new(store, &config.catalog))
}
