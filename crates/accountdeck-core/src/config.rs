//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: API base
//! URL, request timeout, signup behavior, token storage backend and the last
//! email used to log in.
//!
//! Configuration is stored at `~/.config/accountdeck/config.json`. Missing
//! files yield defaults; `ACCOUNTDECK_*` environment variables override
//! stored values.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::api::ApiClient;
use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, SessionStore, TokenStore};

/// Application name used for config directory paths
pub const APP_NAME: &str = "accountdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "ACCOUNTDECK_API_URL";
pub const ENV_AUTO_LOGIN: &str = "ACCOUNTDECK_AUTO_LOGIN";
pub const ENV_TOKEN_STORE: &str = "ACCOUNTDECK_TOKEN_STORE";

/// Where the bearer token is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    Keyring,
    File,
    Memory,
}

impl std::str::FromStr for TokenBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(TokenBackend::Keyring),
            "file" => Ok(TokenBackend::File),
            "memory" => Ok(TokenBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown token store: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Whether a successful signup also logs the new account in.
    pub auto_login_on_signup: bool,
    pub token_store: TokenBackend,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            auto_login_on_signup: false,
            token_store: TokenBackend::default(),
            last_email: None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(Self::config_path().ok().as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// A missing or unreadable file yields defaults; an invalid override is
    /// an error, so the stored settings are never silently replaced.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load_from(path).unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }),
            None => {
                warn!("Could not find config directory, using defaults");
                Self::default()
            }
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Record the last login email in the stored file. Environment and
    /// command-line overrides held by `self` are not written back.
    pub fn remember_email(&mut self, email: &str) -> Result<()> {
        self.last_email = Some(email.to_string());
        let path = Self::config_path()?;
        let mut stored = Self::load_from(&path)?;
        stored.last_email = self.last_email.clone();
        stored.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Override stored values from the environment. `lookup` is injected so
    /// tests need not touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(value) = lookup(ENV_AUTO_LOGIN) {
            self.auto_login_on_signup = parse_bool(&value)
                .ok_or_else(|| anyhow::anyhow!("Invalid {} value: {}", ENV_AUTO_LOGIN, value))?;
        }
        if let Some(value) = lookup(ENV_TOKEN_STORE) {
            self.token_store = value.parse()?;
        }
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(self.api_base_url.clone(), self.request_timeout())
            .context("Failed to build HTTP client")
    }

    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        Ok(match self.token_store {
            TokenBackend::Keyring => Arc::new(KeyringTokenStore::default()),
            TokenBackend::File => Arc::new(FileTokenStore::in_dir(Self::config_dir()?)),
            TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
        })
    }

    /// Wire up a session store from this configuration.
    pub fn session_store(&self) -> Result<SessionStore> {
        Ok(SessionStore::new(
            self.api_client()?,
            self.token_store()?,
            self.auto_login_on_signup,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.auto_login_on_signup);
        assert_eq!(config.token_store, TokenBackend::Keyring);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_base_url": "https://api.example.com"}"#)
            .expect("Failed to parse config");
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_store, TokenBackend::Keyring);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sub").join("config.json");

        let missing = Config::load_from(&path).expect("Missing file should load defaults");
        assert!(missing.last_email.is_none());

        let config = Config {
            last_email: Some("a@b.co".to_string()),
            token_store: TokenBackend::File,
            ..Config::default()
        };
        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.co"));
        assert_eq!(loaded.token_store, TokenBackend::File);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (ENV_API_URL, "https://accounts.example.com"),
                (ENV_AUTO_LOGIN, "yes"),
                (ENV_TOKEN_STORE, "memory"),
            ]))
            .expect("Overrides should apply");
        assert_eq!(config.api_base_url, "https://accounts.example.com");
        assert!(config.auto_login_on_signup);
        assert_eq!(config.token_store, TokenBackend::Memory);
    }

    #[test]
    fn test_invalid_env_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[(ENV_AUTO_LOGIN, "maybe")])).is_err());
        assert!(config.apply_env(env(&[(ENV_TOKEN_STORE, "vault")])).is_err());
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_base_url": "https://prod.example.com", "token_store": "file"}"#,
        )
        .expect("Failed to write config");

        let result = Config::load_with(Some(&path), env(&[(ENV_AUTO_LOGIN, "maybe")]));
        assert!(result.is_err());

        let config = Config::load_with(Some(&path), env(&[(ENV_AUTO_LOGIN, "1")]))
            .expect("Valid override should load");
        assert_eq!(config.api_base_url, "https://prod.example.com");
        assert_eq!(config.token_store, TokenBackend::File);
        assert!(config.auto_login_on_signup);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults_with_overrides() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").expect("Failed to write config");

        let config = Config::load_with(Some(&path), env(&[(ENV_TOKEN_STORE, "memory")]))
            .expect("Corrupt file should fall back to defaults");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.token_store, TokenBackend::Memory);

        let config = Config::load_with(None, env(&[])).expect("No config dir should load");
        assert_eq!(config.token_store, TokenBackend::Keyring);
    }

    #[test]
    fn test_blank_url_override_is_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env(&[(ENV_API_URL, "  ")]))
            .expect("Overrides should apply");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
