//! Server configuration.
//!
//! Read from the process environment (and a `.env` file when present):
//!
//! | Variable              | Default                           |
//! |-----------------------|-----------------------------------|
//! | `AUTH0_DOMAIN`        | `coffeshopudacity.eu.auth0.com`   |
//! | `API_AUDIENCE`        | `coffe-shop-udacity`              |
//! | `DRINKS_DB`           | `.coffee-shop/drinks.json`        |
//! | `PORT`                | `5000`                            |
//! | `JWKS_CACHE_TTL_SECS` | `3600`                            |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::DEFAULT_JWKS_TTL;
use crate::error::ConfigError;
use crate::storage::DEFAULT_STORE_PATH;

pub const DEFAULT_AUTH0_DOMAIN: &str = "coffeshopudacity.eu.auth0.com";
pub const DEFAULT_API_AUDIENCE: &str = "coffe-shop-udacity";
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime settings of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Auth0 tenant host, e.g. `tenant.eu.auth0.com`
    pub auth0_domain: String,
    /// Audience tokens must be issued for
    pub api_audience: String,
    /// Drink store file
    pub db_path: PathBuf,
    /// Listen port
    pub port: u16,
    /// How long fetched signing keys are trusted
    pub jwks_cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            auth0_domain: DEFAULT_AUTH0_DOMAIN.to_string(),
            api_audience: DEFAULT_API_AUDIENCE.to_string(),
            db_path: PathBuf::from(DEFAULT_STORE_PATH),
            port: DEFAULT_PORT,
            jwks_cache_ttl: DEFAULT_JWKS_TTL,
        }
    }
}

impl ServerConfig {
    /// Load from the environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(domain) = lookup("AUTH0_DOMAIN") {
            config.auth0_domain = normalize_domain(&domain);
        }
        if let Some(audience) = lookup("API_AUDIENCE") {
            config.api_audience = audience;
        }
        if let Some(path) = lookup("DRINKS_DB") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|e| ConfigError::InvalidVar {
                var: "PORT",
                message: format!("{}", e),
            })?;
        }
        if let Some(ttl) = lookup("JWKS_CACHE_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|e| ConfigError::InvalidVar {
                var: "JWKS_CACHE_TTL_SECS",
                message: format!("{}", e),
            })?;
            config.jwks_cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.auth0_domain)
    }
}

/// Accept `https://tenant.auth0.com/` as well as the bare host.
fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}
