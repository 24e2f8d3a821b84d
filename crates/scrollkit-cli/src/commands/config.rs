use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use scrollkit_core::EngineConfig;

/// Print the effective configuration as TOML
pub async fn show(config: &EngineConfig, path: &Path) -> Result<()> {
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("# Effective configuration ({})", source);
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration to `path`
pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    EngineConfig::default().save_to(path)?;
    info!(path = %path.display(), "Wrote default configuration");
    println!("Configuration written to {}", path.display());
    Ok(())
}
