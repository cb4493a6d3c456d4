//! Client configuration: API key, base URL and sandbox flag.
//!
//! A `ClientConfig` is fixed once handed to a client. Tests point the client
//! at a mock server through `with_base_url` at construction time.

use std::fmt;

use crate::error::ConfigError;

pub const PRODUCTION_API_BASE: &str = "https://api.lvlup.pro/v4";
pub const SANDBOX_API_BASE: &str = "https://api.sandbox.lvlup.pro/v4";

pub const ENV_API_KEY: &str = "LVLUP_API_KEY";
pub const ENV_SANDBOX: &str = "LVLUP_SANDBOX";
pub const ENV_API_BASE: &str = "LVLUP_API_BASE";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    sandbox: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: PRODUCTION_API_BASE.to_string(),
            sandbox: false,
        }
    }

    /// Switch to the sandbox environment. Only `base_url` and the sandbox
    /// flag change.
    pub fn with_sandbox_mode(mut self) -> Self {
        self.sandbox = true;
        self.base_url = SANDBOX_API_BASE.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Read `LVLUP_API_KEY`, `LVLUP_SANDBOX` and `LVLUP_API_BASE`.
    ///
    /// An explicit `LVLUP_API_BASE` wins over the sandbox URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);

        if let Some(value) = lookup(ENV_SANDBOX) {
            let sandbox = parse_flag(&value).ok_or_else(|| ConfigError::InvalidVar {
                name: ENV_SANDBOX,
                value: value.clone(),
            })?;
            if sandbox {
                config = config.with_sandbox_mode();
            }
        }
        if let Some(base_url) = lookup(ENV_API_BASE).filter(|url| !url.is_empty()) {
            config = config.with_base_url(&base_url);
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
