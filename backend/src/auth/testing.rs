//! Token fixtures for tests: an RSA key pair whose public half is served as a
//! fixed JWKS under kid `coffee-shop-test`, and a local HTTP tenant that
//! serves the same JWKS.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{JwksProvider, JwtVerifier, ALGORITHM};

pub const TEST_DOMAIN: &str = "coffeshopudacity.eu.auth0.com";
pub const TEST_AUDIENCE: &str = "coffe-shop-udacity";
pub const TEST_KID: &str = "coffee-shop-test";

const PRIVATE_KEY: &str = include_str!("../../testdata/rsa_private.pem");
pub const JWKS: &str = include_str!("../../testdata/jwks.json");

pub fn test_verifier() -> JwtVerifier {
    let keys: JwkSet = serde_json::from_str(JWKS).expect("fixture JWKS");
    JwtVerifier::new(TEST_DOMAIN, TEST_AUDIENCE, JwksProvider::fixed(keys))
}

/// Valid claims for the test tenant granting `permissions`.
pub fn claims_for(permissions: &[&str]) -> Value {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs();
    json!({
        "sub": "auth0|barista",
        "iss": format!("https://{}/", TEST_DOMAIN),
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value) -> String {
    sign_with_kid(claims, Some(TEST_KID))
}

pub fn sign_with_kid(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(ALGORITHM);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).expect("fixture key");
    encode(&header, claims, &key).expect("signing")
}

pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", sign(&claims_for(permissions)))
}

// =============================================================================
// Local tenant
// =============================================================================

#[derive(Default)]
struct TenantState {
    hits: AtomicUsize,
    failing: AtomicBool,
    body: Mutex<String>,
}

/// JWKS endpoint on an ephemeral local port that counts its requests.
pub struct JwksServer {
    url: String,
    state: Arc<TenantState>,
}

impl JwksServer {
    /// Serve the fixture JWKS.
    pub async fn start() -> Self {
        Self::serving(JWKS).await
    }

    /// Serve `body` as the JWKS document.
    pub async fn serving(body: &str) -> Self {
        let state = Arc::new(TenantState {
            body: Mutex::new(body.to_string()),
            ..Default::default()
        });
        let app = Router::new()
            .route("/.well-known/jwks.json", get(serve_jwks))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}/.well-known/jwks.json", addr),
            state,
        }
    }

    /// Provider pointed at this tenant.
    pub fn provider(&self, ttl: Duration) -> JwksProvider {
        let client = reqwest::Client::builder().no_proxy().build().expect("client");
        JwksProvider::with_client(self.url.clone(), ttl, client)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Answer 500 from now on (or stop doing so).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the served document, as a key rotation does.
    pub fn set_body(&self, body: &str) {
        *self.state.body.lock().expect("body lock") = body.to_string();
    }
}

async fn serve_jwks(State(state): State<Arc<TenantState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let body = state.body.lock().expect("body lock").clone();
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
