//! Auth0 bearer-token authorization.
//!
//! Every protected endpoint goes through [`JwtVerifier::requires_auth`]:
//!
//! 1. [`get_token_auth_header`] - pull the token out of `Authorization: Bearer <token>`
//! 2. [`JwtVerifier::verify_decode_jwt`] - RS256 signature, `kid` lookup in the
//!    tenant JWKS, expiry, audience and issuer
//! 3. [`check_permissions`] - the `permissions` claim must grant the action
//!
//! Failures are [`AuthError`]s with a stable `code` the client can act on.

pub mod jwks;

#[cfg(test)]
pub(crate) mod testing;

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{AuthError, AuthResult, ConfigError};

pub use jwks::{JwksProvider, DEFAULT_JWKS_TTL};

/// Only signature algorithm accepted.
pub const ALGORITHM: Algorithm = Algorithm::RS256;

/// Permissions granted through Auth0 API roles.
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

/// Claims of a verified access token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// String or array of strings
    #[serde(default)]
    pub aud: Option<Value>,
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
    /// RBAC permissions added by Auth0 when enabled on the API
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

// =============================================================================
// Header & permissions
// =============================================================================

/// Extract the raw token from the `Authorization` header.
pub fn get_token_auth_header(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers.get(AUTHORIZATION).ok_or_else(|| {
        AuthError::unauthorized(
            "authorization_header_missing",
            "Authorization header is expected",
        )
    })?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header must be visible ASCII"))?;

    let parts: Vec<&str> = value.split(' ').collect();
    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::invalid_header(
            "Authorization header must start with Bearer",
        ));
    }
    match parts.as_slice() {
        [_, token] if !token.is_empty() => Ok(*token),
        _ => Err(AuthError::invalid_header("Token not found")),
    }
}

/// Require `permission` in the token's `permissions` claim.
pub fn check_permissions(permission: &str, claims: &Claims) -> AuthResult<()> {
    let granted = claims.permissions.as_ref().ok_or_else(|| {
        AuthError::unauthorized("invalid_payload", "permissions is expected")
    })?;

    if !granted.iter().any(|p| p == permission) {
        return Err(AuthError::new(
            "Forbidden",
            "you dont have permission to perform this action",
            StatusCode::FORBIDDEN,
        ));
    }
    Ok(())
}

// =============================================================================
// Verifier
// =============================================================================

/// Verifies access tokens issued by one Auth0 tenant for one API.
pub struct JwtVerifier {
    audience: String,
    issuer: String,
    keys: JwksProvider,
}

impl JwtVerifier {
    pub fn new(domain: &str, audience: impl Into<String>, keys: JwksProvider) -> Self {
        Self {
            audience: audience.into(),
            issuer: format!("https://{}/", domain),
            keys,
        }
    }

    /// Verifier fetching keys from the configured tenant.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let keys = JwksProvider::remote(&config.auth0_domain, config.jwks_cache_ttl)?;
        Ok(Self::new(&config.auth0_domain, config.api_audience.clone(), keys))
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Verify the token and return its claims.
    pub async fn verify_decode_jwt(&self, token: &str) -> AuthResult<Claims> {
        let header =
            decode_header(token).map_err(|_| AuthError::invalid_header("Authorization malformed."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;

        let mut keys = self.keys.keys().await?;
        if keys.find(&kid).is_none() {
            tracing::debug!(%kid, "Unknown key id, refreshing JWKS");
            keys = self.keys.refresh().await?;
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::invalid_header("Unable to find appropriate key"))?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|_| AuthError::invalid_header("Unable to find appropriate key"))?;

        let mut validation = Validation::new(ALGORITHM);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AuthError::unauthorized("token_expired", "token is expired")
            }
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::unauthorized(
                "invalid_claims",
                "incorrect claims, please check the audience and issuer",
            ),
            _ => AuthError::invalid_header("Unable to parse authentication token."),
        })?;

        tracing::debug!(sub = ?data.claims.sub, "Token verified");
        Ok(data.claims)
    }

    /// Header, verification and permission check in one step.
    pub async fn requires_auth(&self, headers: &HeaderMap, permission: &str) -> AuthResult<Claims> {
        let token = get_token_auth_header(headers)?;
        let claims = self.verify_decode_jwt(token).await?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{
        claims_for, sign, sign_with_kid, test_verifier, JwksServer, JWKS, TEST_AUDIENCE,
        TEST_DOMAIN, TEST_KID,
    };
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;
    use std::time::Duration;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_header_missing() {
        let err = get_token_auth_header(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.code, "authorization_header_missing");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_header_shapes() {
        assert_eq!(get_token_auth_header(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(get_token_auth_header(&headers("bearer abc")).unwrap(), "abc");

        let err = get_token_auth_header(&headers("Basic abc")).unwrap_err();
        assert_eq!(err.description, "Authorization header must start with Bearer");

        for value in ["Bearer", "Bearer a b", "Bearer  abc"] {
            let err = get_token_auth_header(&headers(value)).unwrap_err();
            assert_eq!(err.code, "invalid_header", "{}", value);
            assert_eq!(err.description, "Token not found", "{}", value);
        }
    }

    #[test]
    fn test_check_permissions() {
        let claims = Claims {
            permissions: Some(vec!["get:drinks-detail".into()]),
            ..Default::default()
        };
        assert!(check_permissions(permissions::GET_DRINKS_DETAIL, &claims).is_ok());

        let err = check_permissions(permissions::DELETE_DRINKS, &claims).unwrap_err();
        assert_eq!(err.code, "Forbidden");
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err = check_permissions(permissions::DELETE_DRINKS, &Claims::default()).unwrap_err();
        assert_eq!(err.code, "invalid_payload");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let verifier = test_verifier();
        let token = sign(&claims_for(&["post:drinks"]));

        let claims = verifier.verify_decode_jwt(&token).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("auth0|barista"));
        assert_eq!(claims.permissions, Some(vec!["post:drinks".to_string()]));
    }

    #[tokio::test]
    async fn test_verify_expired_token() {
        let mut claims = claims_for(&["post:drinks"]);
        claims["exp"] = json!(1_000_000);

        let err = test_verifier().verify_decode_jwt(&sign(&claims)).await.unwrap_err();
        assert_eq!(err.code, "token_expired");
    }

    #[tokio::test]
    async fn test_verify_wrong_audience_and_issuer() {
        let verifier = test_verifier();

        let mut claims = claims_for(&[]);
        claims["aud"] = json!("another-api");
        let err = verifier.verify_decode_jwt(&sign(&claims)).await.unwrap_err();
        assert_eq!(err.code, "invalid_claims");

        let mut claims = claims_for(&[]);
        claims["iss"] = json!("https://evil.auth0.com/");
        let err = verifier.verify_decode_jwt(&sign(&claims)).await.unwrap_err();
        assert_eq!(err.code, "invalid_claims");
    }

    #[tokio::test]
    async fn test_verify_unknown_or_missing_kid() {
        let verifier = test_verifier();

        let err = verifier
            .verify_decode_jwt(&sign_with_kid(&claims_for(&[]), Some("rotated-away")))
            .await
            .unwrap_err();
        assert_eq!(err.description, "Unable to find appropriate key");

        let err = verifier
            .verify_decode_jwt(&sign_with_kid(&claims_for(&[]), None))
            .await
            .unwrap_err();
        assert_eq!(err.description, "Authorization malformed.");
    }

    #[tokio::test]
    async fn test_verify_garbage_and_tampered_tokens() {
        let verifier = test_verifier();

        let err = verifier.verify_decode_jwt("garbage").await.unwrap_err();
        assert_eq!(err.code, "invalid_header");

        // Payload of one valid token with the signature of another.
        let token = sign(&claims_for(&["get:drinks-detail"]));
        let forged = sign(&claims_for(&["delete:drinks"]));
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged.split('.').nth(1).unwrap();
        let tampered = parts.join(".");

        let err = verifier.verify_decode_jwt(&tampered).await.unwrap_err();
        assert_eq!(err.description, "Unable to parse authentication token.");
    }

    #[tokio::test]
    async fn test_requires_auth() {
        let verifier = test_verifier();
        let token = sign(&claims_for(&["patch:drinks"]));
        let headers = headers(&format!("Bearer {}", token));

        assert!(verifier.requires_auth(&headers, permissions::PATCH_DRINKS).await.is_ok());

        let err = verifier
            .requires_auth(&headers, permissions::DELETE_DRINKS)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rotated_key_picked_up_after_refresh() {
        let server = JwksServer::serving(&JWKS.replace(TEST_KID, "retired-key")).await;
        let keys = server
            .provider(Duration::from_secs(3600))
            .with_min_refresh(Duration::ZERO);
        let verifier = JwtVerifier::new(TEST_DOMAIN, TEST_AUDIENCE, keys);

        let token = sign(&claims_for(&["post:drinks"]));
        let err = verifier.verify_decode_jwt(&token).await.unwrap_err();
        assert_eq!(err.description, "Unable to find appropriate key");
        assert_eq!(server.hits(), 2);

        server.set_body(JWKS);
        let claims = verifier.verify_decode_jwt(&token).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("auth0|barista"));
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_unknown_kid_refresh_is_rate_limited() {
        let server = JwksServer::start().await;
        let verifier = JwtVerifier::new(
            TEST_DOMAIN,
            TEST_AUDIENCE,
            server.provider(Duration::from_secs(3600)),
        );

        for _ in 0..3 {
            let token = sign_with_kid(&claims_for(&[]), Some("never-issued"));
            let err = verifier.verify_decode_jwt(&token).await.unwrap_err();
            assert_eq!(err.code, "invalid_header");
        }
        assert_eq!(server.hits(), 1);
    }
}
