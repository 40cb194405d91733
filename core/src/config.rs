//! Client configuration and environment selection.
//!
//! # Design
//! `Config` replaces free-form option merging with named fields and
//! documented defaults. The base URL is derived from `production` unless
//! `base_url` is set, in which case the override wins regardless of the
//! flag. Validation happens once, in `MainPay::new`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MainPayError, Result};

pub const PRODUCTION_BASE_URL: &str = "https://api.mainpay.id";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.mainpay.id";
pub const DEFAULT_SERVER_KEY: &str = "mainpay_server_key";
pub const DEFAULT_API_VERSION: &str = "v1";

const ENV_SERVER_KEY: &str = "MAINPAY_SERVER_KEY";
const ENV_PRODUCTION: &str = "MAINPAY_PRODUCTION";
const ENV_BASE_URL: &str = "MAINPAY_BASE_URL";

/// Settings used to construct a `MainPay` client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Basic-auth username sent with every request.
    pub server_key: String,
    /// Selects between the production and sandbox base URLs.
    pub production: bool,
    /// Explicit base URL; takes precedence over `production` when set.
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_key: DEFAULT_SERVER_KEY.to_string(),
            production: true,
            base_url: None,
        }
    }
}

// Hand-written so the server key never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_key", &"<redacted>")
            .field("production", &self.production)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    pub fn production(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            production: true,
            base_url: None,
        }
    }

    pub fn sandbox(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            production: false,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url,
            None => environment_base_url(self.production),
        }
    }

    /// Load from `MAINPAY_SERVER_KEY`, `MAINPAY_PRODUCTION` and
    /// `MAINPAY_BASE_URL`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(key) = lookup(ENV_SERVER_KEY) {
            config.server_key = key;
        }
        if let Some(raw) = lookup(ENV_PRODUCTION) {
            config.production = parse_flag(&raw).ok_or_else(|| {
                MainPayError::Config(format!("{ENV_PRODUCTION} must be a boolean, got {raw:?}"))
            })?;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = Some(url);
        }
        Ok(config)
    }

    /// Reject a blank server key or a base URL override that is not an
    /// absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.server_key.trim().is_empty() {
            return Err(MainPayError::Config("server key must not be empty".to_string()));
        }
        if let Some(url) = &self.base_url {
            normalize_base_url(url)?;
        }
        Ok(())
    }
}

pub(crate) fn environment_base_url(production: bool) -> &'static str {
    if production {
        PRODUCTION_BASE_URL
    } else {
        SANDBOX_BASE_URL
    }
}

/// Validate `raw` as an absolute http(s) URL without query or fragment and
/// return its serialized form with any trailing `/` stripped.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| MainPayError::Config(format!("invalid base URL {raw:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(MainPayError::Config(format!(
                "base URL must use http or https, got {other:?}"
            )))
        }
    }
    if parsed.cannot_be_a_base() || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(MainPayError::Config(format!(
            "base URL must not carry a query or fragment, got {raw:?}"
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
