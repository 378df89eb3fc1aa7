//! Path management for towork configuration and session files.
//!
//! ```text
//! ~/.config/towork/            # Config directory
//! ├── config.toml              # Client configuration
//! ├── session.json             # "Remember me" session scope
//! └── logs/
//!     └── towork-cli.log.YYYY-MM-DD
//!
//! $XDG_RUNTIME_DIR (or temp)/
//! └── towork-session.json      # Session scope of the current login
//! ```

use std::path::PathBuf;
use towork_core::{Result, ToworkError};

const APP_DIR: &str = "towork";

pub struct ToworkPaths;

impl ToworkPaths {
    /// Returns the towork configuration directory, e.g. `~/.config/towork/`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ToworkError::config("Cannot find config directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Durable session scope.
    pub fn session_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Ephemeral session scope. Lives in the runtime directory when the
    /// platform has one, so it is discarded on logout of the OS session.
    pub fn ephemeral_session_file() -> PathBuf {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("towork-session.json")
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_config_dir() {
        if let Ok(dir) = ToworkPaths::config_dir() {
            assert!(dir.ends_with("towork"));
            assert_eq!(ToworkPaths::config_file().unwrap(), dir.join("config.toml"));
            assert_eq!(ToworkPaths::session_file().unwrap(), dir.join("session.json"));
        }
        assert!(
            ToworkPaths::ephemeral_session_file().ends_with("towork-session.json")
        );
    }
}
