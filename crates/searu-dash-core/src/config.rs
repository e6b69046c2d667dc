//! Dashboard configuration management.
//!
//! Holds the API base address and the session cookie policy. The base
//! address is injected into `ApiClient` rather than read from a global, so
//! tests and alternative deployments can point anywhere.
//!
//! Configuration is stored at `~/.config/searu-dash/config.json`; every
//! field can be overridden from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::session::CookieEncoding;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "searu-dash";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// The API server mounts its routes under `/api` on Rocket's default port.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

pub const ENV_API_BASE: &str = "SEARU_API_BASE";
pub const ENV_COOKIE_ENCODING: &str = "SEARU_COOKIE_ENCODING";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SEARU_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub cookie_encoding: CookieEncoding,
    /// No timeout unless set: a hung call hangs its caller.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            cookie_encoding: CookieEncoding::default(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from the default location, apply environment overrides, then
    /// `api_base` (a command-line flag) on top. Validated once, at the end.
    pub fn load(api_base: Option<String>) -> Result<Self> {
        Self::load_from(&Self::config_path()?)?
            .resolve(|key| std::env::var(key).ok(), api_base)
    }

    fn resolve<F>(mut self, lookup: F, api_base: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply_overrides(lookup)?;
        if let Some(base) = api_base {
            self.api_base = base;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a key lookup (the environment, in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(encoding) = lookup(ENV_COOKIE_ENCODING) {
            self.cookie_encoding = encoding
                .parse()
                .with_context(|| format!("Invalid {}", ENV_COOKIE_ENCODING))?;
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_REQUEST_TIMEOUT_SECS, secs))?;
            // 0 means "no timeout", matching the unset default
            self.request_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(())
    }

    /// The base address must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid API base address: {}", self.api_base))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(anyhow::anyhow!(
                "Unsupported scheme {} in API base address {}",
                scheme,
                self.api_base
            )),
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
