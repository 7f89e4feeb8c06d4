//! Common types used across the frontend library.
//!
//! # Categories
//!
//! - **Drink Types** - Menu items as the API returns them
//! - **API Types** - Response envelopes from the backend
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Drink Types
// =============================================================================

/// One ingredient of a drink recipe.
///
/// The public menu (`GET /drinks`) omits `name`; the detailed view
/// includes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipePart {
    /// Ingredient name (detail view only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display color, any CSS color string
    pub color: String,
    /// Relative number of parts in the cup
    pub parts: u32,
}

/// A drink on the menu.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    /// Server-assigned id, `None` for a drink not saved yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Unique title
    pub title: String,
    /// Recipe parts, in pour order
    pub recipe: Vec<RecipePart>,
}

impl Drink {
    /// Total parts in the recipe, used to scale the cup rendering.
    pub fn total_parts(&self) -> u32 {
        self.recipe.iter().map(|p| p.parts).sum()
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Response from `GET /drinks` and `GET /drinks-detail`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrinksResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// Response from `POST /drinks` and `PATCH /drinks/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrinkResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub drinks: Drink,
}

/// Response from `DELETE /drinks/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub delete: u64,
}

/// Error body returned by the backend.
///
/// Generic errors carry `message`; authorization failures carry
/// `code` and `description`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable text in the body.
    pub fn text(&self) -> Option<&str> {
        self.description.as_deref().or(self.message.as_deref())
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend library errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Environment configuration is unusable.
    Config(String),
    /// Access token missing or malformed.
    Auth(String),
    /// Network/HTTP transport error.
    Network(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Auth(msg) => write!(f, "Auth error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Api { status, message } => write!(f, "API error ({}): {}", status, message),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
