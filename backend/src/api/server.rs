//! HTTP Server for the drinks API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Permission          | Description                  |
//! |--------|-------------------|---------------------|------------------------------|
//! | GET    | `/health`         | -                   | Health check                 |
//! | GET    | `/drinks`         | -                   | Public menu                  |
//! | GET    | `/drinks-detail`  | `get:drinks-detail` | Menu with full recipes       |
//! | POST   | `/drinks`         | `post:drinks`       | Create a drink               |
//! | PATCH  | `/drinks/{id}`    | `patch:drinks`      | Replace title and recipe     |
//! | DELETE | `/drinks/{id}`    | `delete:drinks`     | Remove a drink               |

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use super::types::{DeleteResponse, DetailResponse, DrinkResponse, MenuResponse};
use crate::auth::{permissions, JwtVerifier};
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::DrinkInput;
use crate::storage::DrinkStore;

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<DrinkStore>>,
    pub auth: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(store: DrinkStore, auth: JwtVerifier) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth: Arc::new(auth),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/drinks", get(get_drinks).post(create_drink))
        .route("/drinks-detail", get(get_drinks_detail))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = DrinkStore::open(&config.db_path)?;
    let auth = JwtVerifier::from_config(&config)?;
    tracing::info!(
        drinks = store.len(),
        db = %config.db_path.display(),
        issuer = auth.issuer(),
        audience = auth.audience(),
        "Drink store loaded"
    );

    let app = router(AppState::new(store, auth));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Coffee shop API running on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "coffee-shop",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Public menu
async fn get_drinks(State(state): State<AppState>) -> Json<MenuResponse> {
    let store = state.store.read().await;
    Json(MenuResponse {
        success: true,
        drinks: store.list().into_iter().map(|d| d.short()).collect(),
    })
}

/// Menu with ingredient names
async fn get_drinks_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DetailResponse>> {
    state
        .auth
        .requires_auth(&headers, permissions::GET_DRINKS_DETAIL)
        .await?;

    let store = state.store.read().await;
    Ok(Json(DetailResponse {
        success: true,
        drinks: store.list().into_iter().map(|d| d.long()).collect(),
    }))
}

async fn create_drink(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<DrinkResponse>)> {
    state.auth.requires_auth(&headers, permissions::POST_DRINKS).await?;

    let (title, recipe) = parse_input(&body)?.validate()?;
    let drink = state.store.write().await.insert(title, recipe)?;

    Ok((
        StatusCode::CREATED,
        Json(DrinkResponse {
            success: true,
            message: None,
            drinks: drink.long(),
        }),
    ))
}

async fn update_drink(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<DrinkResponse>> {
    let id = parse_id(&id)?;
    state.auth.requires_auth(&headers, permissions::PATCH_DRINKS).await?;

    let mut store = state.store.write().await;
    store.get(id)?;

    let (title, recipe) = parse_input(&body)?.validate()?;
    let drink = store.update(id, title, recipe)?;

    Ok(Json(DrinkResponse {
        success: true,
        message: Some("drink has been updated successfully".to_string()),
        drinks: drink.long(),
    }))
}

async fn delete_drink(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    state.auth.requires_auth(&headers, permissions::DELETE_DRINKS).await?;

    state.store.write().await.delete(id)?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "drink has been deleted successfully".to_string(),
        delete: id,
    }))
}

/// Non-numeric ids do not name a resource.
fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Body must be JSON (400); its shape is checked by the caller (422).
fn parse_input(body: &[u8]) -> ApiResult<DrinkInput> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("body is not JSON: {}", e)))?;
    Ok(DrinkInput::from_value(value)?)
}
