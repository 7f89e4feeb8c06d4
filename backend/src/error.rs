//! Error types for the drinks API.
//!
//! - [`ConfigError`] - Environment/startup configuration errors
//! - [`ValidationError`] - Unusable drink payloads
//! - [`StoreError`] - Drink store errors
//! - [`AuthError`] - Authorization failures (always answered to the client)
//! - [`ApiError`] - Top-level HTTP errors, rendered by [`crate::api`]
//!
//! Conversion into [`ApiError`] is automatic via `From`, so handlers use `?`
//! across layers.

use axum::http::StatusCode;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but unusable.
    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },

    /// HTTP client for the key set could not be created.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a drink payload is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("recipe must contain at least one ingredient")]
    EmptyRecipe,

    #[error("malformed drink: {0}")]
    Malformed(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the drink store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No drink with this id.
    #[error("Drink not found: {0}")]
    NotFound(u64),

    /// Titles are unique.
    #[error("A drink titled '{0}' already exists")]
    DuplicateTitle(String),

    /// The highest id is already `u64::MAX`.
    #[error("No drink ids left to assign")]
    IdsExhausted,

    /// IO error.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Authorization Errors
// =============================================================================

/// A standardized authorization failure.
///
/// `code` and `description` are sent to the client verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
    pub status: StatusCode,
}

impl AuthError {
    pub fn new(code: &'static str, description: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            description: description.into(),
            status,
        }
    }

    /// 401 with the given code.
    pub fn unauthorized(code: &'static str, description: impl Into<String>) -> Self {
        Self::new(code, description, StatusCode::UNAUTHORIZED)
    }

    /// 401 `invalid_header`.
    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::unauthorized("invalid_header", description)
    }
}

// =============================================================================
// API Errors (top-level)
// =============================================================================

/// Errors a request handler can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("resource not found")]
    NotFound,

    /// 405, route exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// 400, body is not JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 422, body is JSON but not an acceptable drink.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// 401/403
    #[error("Authorization failed: {0}")]
    Auth(#[from] AuthError),

    /// 500
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(err) => err.status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::DuplicateTitle(_) => ApiError::Unprocessable(err.to_string()),
            StoreError::IdsExhausted | StoreError::Io(_) | StoreError::Json(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for authorization checks.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;
