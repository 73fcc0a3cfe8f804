use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");
const EXAMPLE_CREDENTIALS: &str = include_str!("../../docs/example_api.json");

/// Creates the example configuration and credentials files at the default location
pub fn setup() -> Result<()> {
    let config_path = AppConfig::default_config_path()?;
    let credentials_path = AppConfig::default_credentials_path()?;
    setup_at_paths(&config_path, &credentials_path)
}

/// Writes the example config to `config_path` and an empty credentials
/// template to `credentials_path`. An existing credentials file is kept.
pub fn setup_at_paths<P: AsRef<Path>, Q: AsRef<Path>>(
    config_path: P,
    credentials_path: Q,
) -> Result<()> {
    let config_path = config_path.as_ref();
    let credentials_path = credentials_path.as_ref();

    if config_path.exists() {
        anyhow::bail!(
            "Configuration file already exists at {}",
            config_path.display()
        );
    }

    write_file(config_path, EXAMPLE_CONFIG)?;
    tracing::info!("Created default configuration at {}", config_path.display());

    if credentials_path.exists() {
        tracing::info!(
            "Keeping existing credentials file at {}",
            credentials_path.display()
        );
    } else {
        write_file(credentials_path, EXAMPLE_CREDENTIALS)?;
        tracing::info!(
            "Created credentials template at {}",
            credentials_path.display()
        );
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file to {}", path.display()))
}
