//! Configuration service.
//!
//! Loads `ClientConfig` from `~/.config/towork/config.toml`, writing the
//! defaults on first run, then applies environment overrides.

use crate::paths::ToworkPaths;
use crate::storage::{AtomicFile, FileFormat};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use towork_core::config::ClientConfig;
use towork_core::{Result, ToworkError};

pub const API_URL_ENV: &str = "TOWORK_API_URL";
pub const POLL_INTERVAL_ENV: &str = "TOWORK_POLL_INTERVAL_SECS";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Service reading the platform config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Service reading an explicit file instead of the platform default.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => ToworkPaths::config_file(),
        }
    }

    /// Returns the configuration, loading it from disk if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| ToworkError::internal(e.to_string()))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_config()?;
        apply_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| ToworkError::internal(e.to_string()))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Persists `config` and replaces the cached copy.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        AtomicFile::new(self.config_path()?, FileFormat::Toml).save(config)?;
        let mut write_lock = self
            .config
            .write()
            .map_err(|e| ToworkError::internal(e.to_string()))?;
        *write_lock = Some(config.clone());
        tracing::info!("Configuration saved");
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<ClientConfig> {
        let path = self.config_path()?;
        let file = AtomicFile::<ClientConfig>::new(path.clone(), FileFormat::Toml);

        match file.load()? {
            Some(config) => {
                tracing::debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => {
                let config = ClientConfig::default();
                file.save(&config)?;
                tracing::info!("Created default configuration at {}", path.display());
                Ok(config)
            }
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `TOWORK_*` overrides read through `lookup`.
///
/// Blank values and unparseable intervals are ignored.
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.api_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(POLL_INTERVAL_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.poll_interval_secs = secs,
            _ => tracing::warn!("Ignoring invalid {}={}", POLL_INTERVAL_ENV, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        let mut expected = ClientConfig::default();
        apply_overrides(&mut expected, |key| std::env::var(key).ok());
        assert_eq!(service.get_config().unwrap(), expected);
        assert!(path.exists());
    }

    #[test]
    fn saved_config_is_cached_and_reloaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        let config = ClientConfig {
            language: "en".into(),
            ..ClientConfig::default()
        };
        service.save_config(&config).unwrap();
        assert_eq!(service.get_config().unwrap().language, "en");

        service.invalidate_cache();
        let reloaded = ConfigService::with_path(path).get_config().unwrap();
        assert_eq!(reloaded.language, "en");
    }

    #[test]
    fn overrides_replace_url_and_interval() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, |key| match key {
            API_URL_ENV => Some("https://api.example.com".into()),
            POLL_INTERVAL_ENV => Some("3".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.poll_interval_secs, 3);

        apply_overrides(&mut config, |key| match key {
            POLL_INTERVAL_ENV => Some("soon".into()),
            _ => None,
        });
        assert_eq!(config.poll_interval_secs, 3);
    }
}
