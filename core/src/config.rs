//! Client configuration.
//!
//! The API key is required. The base URL defaults to the provider's
//! production endpoint and is overridable for mock servers and proxies.

use crate::error::Error;
use crate::http::Credential;

pub const ONFLEET_API_ENDPOINT: &str = "https://onfleet.com/api/v2/";

pub const API_KEY_ENV: &str = "ONFLEET_API_KEY";
pub const BASE_URL_ENV: &str = "ONFLEET_BASE_URL";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: Credential,
    /// Always ends in `/`.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Credential::new(api_key),
            base_url: ONFLEET_API_ENDPOINT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = format!("{}/", base_url.trim_end_matches('/'));
        self
    }

    /// Read `ONFLEET_API_KEY` and, if set, `ONFLEET_BASE_URL`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config(format!("{API_KEY_ENV} is not set")))?;
        let config = Self::new(api_key);
        Ok(match lookup(BASE_URL_ENV).filter(|url| !url.is_empty()) {
            Some(url) => config.with_base_url(&url),
            None => config,
        })
    }
}
