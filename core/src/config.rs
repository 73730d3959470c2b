//! Client configuration.
//!
//! # Design
//! The API key, base URL and TLS verification mode live on a `Config` value
//! owned by each client, so two clients in one process can disagree and
//! tests never share state.

use std::env;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.chatwork.com/v2";

/// Header carrying the API key on every request.
pub const TOKEN_HEADER: &str = "X-ChatWorkToken";

pub const ENV_API_KEY: &str = "CHATWORK_API_KEY";
pub const ENV_BASE_URL: &str = "CHATWORK_API_BASE_URL";
pub const ENV_INSECURE_TLS: &str = "CHATWORK_INSECURE_TLS";

/// Whether the transport verifies the server certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    #[default]
    Strict,
    /// Skip certificate validation. Only meant for proxies and test rigs.
    Insecure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_key: Option<String>,
    base_url: String,
    tls: TlsMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            tls: TlsMode::Strict,
        }
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Read `CHATWORK_API_KEY`, `CHATWORK_API_BASE_URL` and
    /// `CHATWORK_INSECURE_TLS` from the environment.
    ///
    /// A missing key is not an error here; it surfaces as
    /// [`ApiError::NoApiKey`] on the first request.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            config = config.with_api_key(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(&url);
        }
        if let Some(flag) = lookup(ENV_INSECURE_TLS) {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config = config.with_tls(TlsMode::Insecure);
            }
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API root, e.g. to point at a local mock server.
    /// A trailing slash is stripped.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The API key, or `NoApiKey` when it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str, ApiError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ApiError::NoApiKey)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tls(&self) -> TlsMode {
        self.tls
    }
}
