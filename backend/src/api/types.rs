//! REST API response types.
//!
//! Every body carries `success`. Errors add the numeric status in `error`
//! and either a `message` or, for authorization failures, `code` and
//! `description`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::{Drink, DrinkSummary};

/// `GET /drinks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

/// Public menu body.
pub type MenuResponse = DrinksResponse<DrinkSummary>;

/// `GET /drinks-detail` body.
pub type DetailResponse = DrinksResponse<Drink>;

/// `POST /drinks` and `PATCH /drinks/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub drinks: Drink,
}

/// `DELETE /drinks/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub delete: u64,
}

/// Generic error body.
pub fn error_response(status: StatusCode, message: &str) -> Value {
    json!({
        "success": false,
        "error": status.as_u16(),
        "message": message,
    })
}

/// Fixed client-facing message for a status.
fn status_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "resource not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        StatusCode::UNPROCESSABLE_ENTITY => "Unprocessable Entity",
        StatusCode::BAD_REQUEST => "bad request",
        _ => "server error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Auth(err) => {
                tracing::warn!(code = err.code, status = status.as_u16(), "Authorization failed");
                json!({
                    "success": false,
                    "error": status.as_u16(),
                    "code": err.code,
                    "description": err.description,
                })
            }
            ApiError::Internal(reason) => {
                tracing::error!(%reason, "Request failed");
                error_response(status, status_message(status))
            }
            other => {
                tracing::debug!(error = %other, "Request rejected");
                error_response(status, status_message(status))
            }
        };
        (status, Json(body)).into_response()
    }
}
