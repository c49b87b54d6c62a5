mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, SessionConfig, SoundConfig};
pub use database::{Database, NewSession, SessionRecord};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::presets::{CustomPreset, NewCustomPreset};
use crate::stats::SessionStats;

/// Returns the data directory, creating it if needed.
///
/// `STILLWATER_DATA_DIR` wins when set. Otherwise `~/.config/stillwater/`,
/// or `~/.config/stillwater-dev/` with `STILLWATER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("STILLWATER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STILLWATER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("stillwater-dev")
            } else {
                base_dir.join("stillwater")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Persistence for finished sessions and custom presets.
///
/// The session driver only ever calls `create_session`; everything else is
/// used by the history and preset screens.
pub trait SessionStore {
    fn create_session(&self, session: &NewSession) -> Result<SessionRecord>;

    /// Most recent first.
    fn list_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>>;

    fn session_stats(&self) -> Result<SessionStats>;

    fn create_custom_preset(&self, preset: &NewCustomPreset) -> Result<CustomPreset>;

    /// Newest first.
    fn list_custom_presets(&self) -> Result<Vec<CustomPreset>>;

    fn delete_custom_preset(&self, id: &str) -> Result<()>;
}
