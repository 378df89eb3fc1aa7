use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:9020";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 7;

/// Client settings persisted as `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub language: String,
    pub remember_by_default: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            language: "fr".to_string(),
            remember_by_default: false,
        }
    }
}

impl ClientConfig {
    /// Base URL with any trailing `/` removed.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str("api_url = \"https://api.towork.io/\"").unwrap();
        assert_eq!(config.base_url(), "https://api.towork.io");
        assert_eq!(config.poll_interval_secs, 7);
        assert_eq!(config.language, "fr");
    }
}
