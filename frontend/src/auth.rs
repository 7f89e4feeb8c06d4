//! Auth0 session for the implicit login flow.
//!
//! After login, Auth0 redirects to the callback URL with the access token in
//! the URL fragment. The token is kept as-is for the `Authorization` header;
//! its payload is decoded without signature verification only to decide
//! which actions the UI offers. The API verifies every request itself.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::types::{AppError, AppResult};

/// Claims the frontend reads from an access token.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A logged-in user's access token and its decoded payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    token: String,
    payload: TokenPayload,
}

impl Session {
    /// Build a session from a raw JWT.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        let payload = decode_payload(&token)?;
        log::debug!(
            "Session for {} with {} permission(s)",
            payload.sub.as_deref().unwrap_or("unknown"),
            payload.permissions.len()
        );
        Ok(Self { token, payload })
    }

    /// Extract the session from the login redirect fragment.
    ///
    /// Returns `Ok(None)` when the fragment carries no `access_token`.
    pub fn from_callback_fragment(fragment: &str) -> AppResult<Option<Self>> {
        let fragment = fragment.trim_start_matches('#');
        let token = url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned());

        match token {
            Some(token) if !token.is_empty() => Self::new(token).map(Some),
            _ => Ok(None),
        }
    }

    /// The raw access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Decoded payload.
    pub fn payload(&self) -> &TokenPayload {
        &self.payload
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Whether the token grants `permission`.
    pub fn can(&self, permission: &str) -> bool {
        self.payload.permissions.iter().any(|p| p == permission)
    }

    /// Whether the token's `exp` is at or before `now_secs`.
    ///
    /// Tokens without `exp` never expire from the client's point of view.
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.payload.exp.is_some_and(|exp| exp <= now_secs)
    }
}

fn decode_payload(token: &str) -> AppResult<TokenPayload> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AppError::Auth("access token is not a JWT".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::Auth(format!("token payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Auth(format!("token payload is not valid JSON: {}", e)))
}
