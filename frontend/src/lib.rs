//! Coffee Shop - Frontend library
//!
//! Everything the Coffee Shop user interface needs besides rendering:
//! the environment it runs in, the Auth0 session, and the drinks API client.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   login_link()    ┌──────────────────────┐
//! │  EnvironmentConfig   │──────────────────▶│       Auth0          │
//! │  (dev / production)  │                   │  (implicit flow)     │
//! └──────────┬───────────┘                   └──────────┬───────────┘
//!            │ api_url()                                │ #access_token=...
//!            ▼                                          ▼
//! ┌──────────────────────┐   Bearer token    ┌──────────────────────┐
//! │    DrinksService     │◀──────────────────│       Session        │
//! └──────────┬───────────┘                   └──────────────────────┘
//!            ▼
//!      drinks API (backend)
//! ```
//!
//! # Modules
//!
//! - [`environment`] - Environment variants and Auth0 settings
//! - [`auth`] - Session built from the Auth0 redirect
//! - [`types`] - Wire types and errors
//! - [`services`] - Drinks API client

// =============================================================================
// Module declarations
// =============================================================================

pub mod environment;
pub mod auth;
pub mod types;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use environment::{Auth0Config, BuildOverrides, EnvironmentConfig};

// Session
pub use auth::{Session, TokenPayload};

// Types
pub use types::{
    // Drinks
    Drink, RecipePart,
    // API
    DrinksResponse, DrinkResponse, DeleteResponse, ApiErrorBody,
    // Errors
    AppError, AppResult,
};

// Services
pub use services::DrinksService;

/// Permission names granted by the Auth0 API roles.
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}
