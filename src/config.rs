//! Configuration management for rezka-resolver
//!
//! Config is read from ~/.config/rezka-resolver/config.toml (or `--config`),
//! then overridden by environment variables:
//! - `HDREZKA_HOST` - catalog base host
//! - `HDREZKA_LOGIN` / `HDREZKA_PASSWORD` - catalog credentials
//! - `REZKA_RESOLVER_BIND` - listen address for the HTTP service

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "https://rezka.ag";
const DEFAULT_BIND: &str = "0.0.0.0:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 25;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Application configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog base host, e.g. https://rezka.ag
    pub host: String,
    pub login: Option<String>,
    pub password: Option<String>,
    /// HTTP service listen address
    pub bind: String,
    /// Connect + request timeout against the catalog
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Skip TLS certificate verification (some catalog mirrors need it)
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            login: None,
            password: None,
            bind: DEFAULT_BIND.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("bind", &self.bind)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Config {
    /// Default config file path (~/.config/rezka-resolver/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rezka-resolver").join("config.toml"))
    }

    /// Load config from `path` (or the default location), then apply
    /// environment overrides. A missing file yields defaults; an unreadable
    /// or invalid one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::path);
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("HDREZKA_HOST").filter(|s| !s.is_empty()) {
            self.host = host;
        }
        if let Some(login) = lookup("HDREZKA_LOGIN") {
            self.login = Some(login);
        }
        if let Some(password) = lookup("HDREZKA_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(bind) = lookup("REZKA_RESOLVER_BIND").filter(|s| !s.is_empty()) {
            self.bind = bind;
        }
    }

    /// Login and password, only when both are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.login.as_deref(), self.password.as_deref()) {
            (Some(login), Some(password)) if !login.is_empty() && !password.is_empty() => {
                Some((login, password))
            }
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
