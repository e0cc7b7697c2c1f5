//! Configuration for the Fawry gateway client.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Gateway client configuration.
///
/// Supplied once when the client is built and never mutated afterwards.
#[derive(Clone, Deserialize)]
pub struct FawryConfig {
    /// Merchant code issued by Fawry.
    pub merchant_code: String,
    /// Shared secret used as the final component of every signature.
    pub security_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Retry budget for idempotent GET calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Fawry staging environment.
pub const STAGING_BASE_URL: &str = "https://atfawry.fawrystaging.com";
/// Fawry production environment.
pub const PRODUCTION_BASE_URL: &str = "https://www.atfawry.com";

fn default_base_url() -> String {
    STAGING_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

/// Largest accepted retry budget.
pub const MAX_RETRIES_LIMIT: u32 = 10;

impl FawryConfig {
    pub fn new(
        merchant_code: impl Into<String>,
        security_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            security_key: security_key.into(),
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            merchant_code: env::var("FAWRY_MERCHANT_CODE").map_err(|_| Error::Config {
                message: "FAWRY_MERCHANT_CODE environment variable not set".to_string(),
            })?,
            security_key: env::var("FAWRY_SECURITY_KEY").map_err(|_| Error::Config {
                message: "FAWRY_SECURITY_KEY environment variable not set".to_string(),
            })?,
            base_url: env::var("FAWRY_BASE_URL").unwrap_or_else(|_| default_base_url()),
            timeout_secs: env::var("FAWRY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_timeout_secs),
            connect_timeout_secs: env::var("FAWRY_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_connect_timeout_secs),
            max_retries: env::var("FAWRY_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_retries),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, with `FAWRY_*` environment overrides.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("FAWRY"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.merchant_code.trim().is_empty() {
            return Err(Error::Config {
                message: "merchant_code must not be empty".to_string(),
            });
        }
        if self.security_key.is_empty() {
            return Err(Error::Config {
                message: "security_key must not be empty".to_string(),
            });
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::Config {
                message: format!(
                    "max_retries must be at most {}, got {}",
                    MAX_RETRIES_LIMIT, self.max_retries
                ),
            });
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for FawryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FawryConfig")
            .field("merchant_code", &self.merchant_code)
            .field("security_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
