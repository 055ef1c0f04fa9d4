use std::path::Path;

use anyhow::{Context, Result};

use segue_core::EngineConfig;

pub fn run(config: &EngineConfig, explicit: Option<&Path>, path_only: bool) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(EngineConfig::config_path);

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, using defaults)", path.display());
    }
    let content = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{}", content);

    Ok(())
}
