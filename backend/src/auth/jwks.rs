//! Signing keys of the Auth0 tenant.
//!
//! Keys are fetched from `https://{domain}/.well-known/jwks.json` and cached
//! for a configurable time. A fixed key set can be injected instead.
//!
//! When the tenant cannot be reached the last fetched key set stays in use,
//! so an identity provider outage only rejects tokens once nothing was ever
//! fetched.

use jsonwebtoken::jwk::JwkSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{AuthError, AuthResult, ConfigError};
use axum::http::StatusCode;

/// Default time a fetched key set stays valid.
pub const DEFAULT_JWKS_TTL: Duration = Duration::from_secs(3600);

/// Minimum age of the cached key set before a forced refresh refetches it.
pub const DEFAULT_MIN_REFRESH: Duration = Duration::from_secs(10);

/// JWKS location for a tenant domain.
pub fn jwks_url(domain: &str) -> String {
    format!("https://{}/.well-known/jwks.json", domain)
}

struct CachedKeys {
    fetched_at: Instant,
    keys: Arc<JwkSet>,
}

impl CachedKeys {
    fn younger_than(&self, max_age: Duration) -> bool {
        self.fetched_at.elapsed() < max_age
    }
}

struct RemoteKeys {
    url: String,
    client: reqwest::Client,
    ttl: Duration,
    min_refresh: Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl RemoteKeys {
    /// Cached keys younger than `max_age`, otherwise a fetch.
    ///
    /// Concurrent callers that miss the cache wait for a single fetch.
    async fn load(&self, max_age: Duration) -> AuthResult<Arc<JwkSet>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.younger_than(max_age) {
                return Ok(cached.keys.clone());
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref() {
            if cached.younger_than(max_age) {
                return Ok(cached.keys.clone());
            }
        }

        match fetch(&self.client, &self.url).await {
            Ok(keys) => {
                let keys = Arc::new(keys);
                *cache = Some(CachedKeys {
                    fetched_at: Instant::now(),
                    keys: keys.clone(),
                });
                Ok(keys)
            }
            Err(err) => match cache.as_ref() {
                Some(stale) => {
                    tracing::warn!(
                        url = %self.url,
                        age_secs = stale.fetched_at.elapsed().as_secs(),
                        "Keeping previous JWKS after failed refresh"
                    );
                    Ok(stale.keys.clone())
                }
                None => Err(err),
            },
        }
    }
}

enum KeySource {
    Static(Arc<JwkSet>),
    Remote(RemoteKeys),
}

/// Where token signing keys come from.
pub struct JwksProvider {
    source: KeySource,
}

impl JwksProvider {
    /// Fetch keys from the tenant, caching them for `ttl`.
    pub fn remote(domain: &str, ttl: Duration) -> Result<Self, ConfigError> {
        Self::remote_url(jwks_url(domain), ttl)
    }

    /// Fetch keys from an explicit JWKS URL, caching them for `ttl`.
    pub fn remote_url(url: impl Into<String>, ttl: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("coffee-shop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(url, ttl, client))
    }

    pub(crate) fn with_client(url: impl Into<String>, ttl: Duration, client: reqwest::Client) -> Self {
        Self {
            source: KeySource::Remote(RemoteKeys {
                url: url.into(),
                client,
                ttl,
                min_refresh: DEFAULT_MIN_REFRESH,
                cache: RwLock::new(None),
            }),
        }
    }

    /// Always use the given keys.
    pub fn fixed(keys: JwkSet) -> Self {
        Self {
            source: KeySource::Static(Arc::new(keys)),
        }
    }

    /// Change how old the cache must be before [`refresh`](Self::refresh) refetches.
    pub fn with_min_refresh(mut self, min_refresh: Duration) -> Self {
        if let KeySource::Remote(remote) = &mut self.source {
            remote.min_refresh = min_refresh;
        }
        self
    }

    /// Current key set.
    pub async fn keys(&self) -> AuthResult<Arc<JwkSet>> {
        match &self.source {
            KeySource::Static(keys) => Ok(keys.clone()),
            KeySource::Remote(remote) => remote.load(remote.ttl).await,
        }
    }

    /// Key set after the tenant may have rotated its keys.
    ///
    /// Refetches unless the cache is younger than the minimum refresh
    /// interval, which bounds fetches caused by tokens with unknown `kid`s.
    pub async fn refresh(&self) -> AuthResult<Arc<JwkSet>> {
        match &self.source {
            KeySource::Static(keys) => Ok(keys.clone()),
            KeySource::Remote(remote) => remote.load(remote.min_refresh).await,
        }
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> AuthResult<JwkSet> {
    tracing::debug!(url, "Fetching JWKS");

    let unavailable = |reason: String| {
        tracing::error!(url, %reason, "JWKS fetch failed");
        AuthError::new(
            "jwks_unavailable",
            "Unable to fetch the signing keys of the identity provider",
            StatusCode::SERVICE_UNAVAILABLE,
        )
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(unavailable(format!("status {}", response.status())));
    }

    let keys: JwkSet = response
        .json()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if keys.keys.is_empty() {
        return Err(unavailable("key set is empty".to_string()));
    }

    tracing::debug!(count = keys.keys.len(), "JWKS fetched");
    Ok(keys)
}
