//! Configuration module
//!
//! Loads settings from YAML files and environment variables and resolves the
//! provider API key.

mod credentials;
mod settings;

pub use credentials::*;
pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Locate and load settings, falling back to defaults.
///
/// Order: `SEARCH_EXPORTER_SETTINGS_PATH`, `settings.yml`,
/// `config/settings.yml`, then the user config directory.
pub fn load() -> Result<Settings> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var(format!("{ENV_PREFIX}SETTINGS_PATH")) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("search-exporter/settings.yml"));
    }

    let mut settings = match candidates.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}
