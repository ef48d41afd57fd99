pub mod commands;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use kata_config::Config;

/// Resolve symlinks and relative segments so workspace paths compare by position.
pub fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    path.canonicalize_utf8()
        .with_context(|| format!("Cannot resolve path {path}"))
}

/// `config` with its workspace root made absolute when the root exists.
pub fn with_absolute_root(config: &Config) -> Result<Config> {
    let mut resolved = config.clone();
    if resolved.dir.exists() {
        resolved.dir = absolute(&config.dir)?;
    }
    Ok(resolved)
}
