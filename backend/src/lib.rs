//! # Coffee Shop - Drinks menu API
//!
//! Serves the coffee shop menu. Anyone can read the public menu; baristas
//! and managers act on it with Auth0 access tokens whose `permissions`
//! claim grants each action.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Request   │────▶│    Auth     │────▶│   Handler   │────▶│ DrinkStore  │
//! │ (Bearer JWT)│     │ (JWKS, RBAC)│     │ (validate)  │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coffee_shop::{ServerConfig, server::start_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::from_env().unwrap();
//!     start_server(config).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Environment configuration
//! - [`models`] - Drinks and request payloads
//! - [`storage`] - JSON-file drink store
//! - [`auth`] - Bearer token verification and permissions
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod config;
pub mod models;

// Persistence
pub mod storage;

// Authorization
pub mod auth;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, AuthError, ConfigError, StoreError, ValidationError};

pub use config::ServerConfig;

pub use models::{Drink, DrinkInput, DrinkSummary, Ingredient, IngredientSummary, RecipeInput};

pub use storage::{DrinkStore, DEFAULT_STORE_PATH};

pub use auth::{
    check_permissions, get_token_auth_header, permissions, Claims, JwksProvider, JwtVerifier,
};

pub use api::{router, AppState};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
