//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use biofacts_extractor::ExtractorConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file path (`~/.biofacts/config.toml`).
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".biofacts").join("config.toml"))
}

/// Load extractor configuration.
///
/// An explicit path must exist. Without one the default path is used when
/// present, otherwise built-in defaults apply. The result is validated.
pub fn load_config(explicit: Option<&Path>) -> Result<ExtractorConfig> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().ok().filter(|p| p.is_file()),
    };

    let config = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            read_config(&path)?
        }
        None => ExtractorConfig::default(),
    };

    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ExtractorConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ExtractorConfig = toml::from_str(&contents)?;
    Ok(config)
}
