//! HTTP client for the drinks API.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::Session;
use crate::environment::EnvironmentConfig;
use crate::types::{
    ApiErrorBody, AppError, AppResult, DeleteResponse, Drink, DrinkResponse, DrinksResponse,
};

/// HTTP method used to save a drink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMethod {
    /// New drink, `POST /drinks`
    Post,
    /// Existing drink, `PATCH /drinks/{id}`
    Patch,
}

/// Client bound to one environment's API server.
#[derive(Clone, Debug)]
pub struct DrinksService {
    env: EnvironmentConfig,
}

impl DrinksService {
    pub fn new(env: EnvironmentConfig) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.env
    }

    /// Public menu (recipes without ingredient names).
    pub async fn get_drinks(&self) -> AppResult<Vec<Drink>> {
        let request = Request::get(&self.env.api_url("/drinks"));
        let body: DrinksResponse = send(request).await?;
        Ok(body.drinks)
    }

    /// Full recipes. Requires `get:drinks-detail`.
    pub async fn get_drinks_detail(&self, session: &Session) -> AppResult<Vec<Drink>> {
        let request = Request::get(&self.env.api_url("/drinks-detail"))
            .header("Authorization", &session.bearer());
        let body: DrinksResponse = send(request).await?;
        Ok(body.drinks)
    }

    /// Method and URL that [`save_drink`](Self::save_drink) uses for `drink`.
    pub fn save_target(&self, drink: &Drink) -> (SaveMethod, String) {
        match drink.id {
            Some(id) => (SaveMethod::Patch, self.env.api_url(&format!("/drinks/{}", id))),
            None => (SaveMethod::Post, self.env.api_url("/drinks")),
        }
    }

    /// Create (`post:drinks`) or update (`patch:drinks`) depending on
    /// whether the drink already has an id.
    pub async fn save_drink(&self, session: &Session, drink: &Drink) -> AppResult<Drink> {
        let request = match self.save_target(drink) {
            (SaveMethod::Patch, url) => Request::patch(&url),
            (SaveMethod::Post, url) => Request::post(&url),
        }
        .header("Authorization", &session.bearer());

        let payload = serde_json::json!({
            "title": drink.title,
            "recipe": drink.recipe,
        });
        let request = request
            .json(&payload)
            .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;
        let body: DrinkResponse = read_json(response).await?;
        Ok(body.drinks)
    }

    /// Remove a drink. Requires `delete:drinks`.
    pub async fn delete_drink(&self, session: &Session, id: u64) -> AppResult<u64> {
        let request = Request::delete(&self.env.api_url(&format!("/drinks/{}", id)))
            .header("Authorization", &session.bearer());
        let body: DeleteResponse = send(request).await?;
        log::info!("Deleted drink {}", body.delete);
        Ok(body.delete)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> AppResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        log::warn!("API error {}: {}", status, text);
        return Err(api_error(status, &text));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

/// Turn an error response into [`AppError::Api`].
fn api_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.text().map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            }
        });
    AppError::Api { status, message }
}
