mod config;

pub use config::{AudioConfig, Config, SessionDefaults};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the pomocue config directory, creating it if needed.
///
/// `POMOCUE_HOME` overrides the location outright. Otherwise the directory is
/// `<config dir>/pomocue`, or `<config dir>/pomocue-dev` with `POMOCUE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOCUE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::config_dir()
                .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
                .unwrap_or_else(|| PathBuf::from("."));
            let env = std::env::var("POMOCUE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomocue-dev")
            } else {
                base_dir.join("pomocue")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(format!(
        "{}: {e}",
        dir.display()
    )))?;
    Ok(dir)
}
