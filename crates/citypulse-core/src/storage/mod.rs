mod config;

pub use config::{ApiConfig, Config, PlacesConfig, SessionConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/citypulse[-dev]/` based on CITYPULSE_ENV.
///
/// Set CITYPULSE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CITYPULSE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("citypulse-dev")
    } else {
        base_dir.join("citypulse")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
