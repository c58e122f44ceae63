//! Init command - write an example config file

use crate::config::{CONFIG_FILE, EXAMPLE_CONFIG};
use anyhow::{Context, Result};
use std::path::Path;

/// Write `seo.toml` into `dir`
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::write(&path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
