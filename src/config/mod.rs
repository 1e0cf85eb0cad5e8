pub mod schema;

pub use schema::AgentSettings;

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default calldash home directory (~/.calldash).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".calldash"))
        .unwrap_or_else(|| PathBuf::from(".calldash"))
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<AgentSettings> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read calldash config file")?;
        let config: AgentSettings =
            toml::from_str(&contents).context("Failed to parse calldash config (TOML)")?;
        Ok(config)
    } else {
        debug!("No config at {}, using defaults", path.display());
        Ok(AgentSettings::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &AgentSettings, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}

/// Log level to start with: the command-line flag if given, else the
/// settings file's `log_level`. An unreadable file falls back to the default.
pub fn resolve_log_level(flag: Option<&str>, settings_path: &Path) -> String {
    match flag {
        Some(level) => level.to_string(),
        None => load_config(settings_path)
            .map(|config| config.log_level)
            .unwrap_or_else(|_| AgentSettings::default().log_level),
    }
}

/// Read an environment variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AgentSettings {
    /// Apply environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(optional_env);
    }

    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("FIRESTORE_PROJECT_ID") {
            self.firestore.project_id = v;
        }
        if let Some(v) = lookup("LIVEKIT_URL") {
            self.livekit.url = v;
        }
        if let Some(v) = lookup("LIVEKIT_API_KEY") {
            self.livekit.api_key = v;
        }
        if let Some(v) = lookup("SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Some(port) = lookup("SMTP_PORT").and_then(|v| v.parse().ok()) {
            self.smtp.port = port;
        }
    }
}

/// Credentials. Only ever sourced from the environment.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// OAuth bearer token for the Firestore REST API.
    pub firestore_access_token: Option<SecretString>,
    /// Firebase web API key, used when no access token is set.
    pub firebase_api_key: Option<SecretString>,
    pub livekit_api_secret: Option<SecretString>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
}

impl Secrets {
    /// Load credentials from the process environment (and `.env`, if loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(optional_env)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            firestore_access_token: lookup("FIRESTORE_ACCESS_TOKEN").map(SecretString::from),
            firebase_api_key: lookup("FIREBASE_API_KEY").map(SecretString::from),
            livekit_api_secret: lookup("LIVEKIT_API_SECRET").map(SecretString::from),
            smtp_username: lookup("SMTP_USER").or_else(|| lookup("GMAIL_USER")),
            smtp_password: lookup("SMTP_PASSWORD")
                .or_else(|| lookup("GMAIL_APP_PASSWORD"))
                .map(SecretString::from),
        }
    }
}
