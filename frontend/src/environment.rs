//! Environment configuration.
//!
//! Deployment-specific values for the Coffee Shop frontend: where the drinks
//! API runs and which Auth0 tenant/application issues its tokens.
//!
//! Two variants are compiled in. The `production` cargo feature selects the
//! production variant; otherwise [`EnvironmentConfig::current`] yields the
//! development one. Either can be customized at build time through the
//! `COFFEE_SHOP_*` variables listed on [`BuildOverrides`].
//!
//! The serialized shape is shared with the deployment tooling and must not
//! change:
//!
//! ```text
//! { "production": bool, "apiServerUrl": string,
//!   "auth0": { "url": string, "audience": string,
//!              "clientId": string, "callbackURL": string } }
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{AppError, AppResult};

/// Backend API server for local development (the drinks API default port).
pub const DEV_API_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Auth0 tenant prefix; the tenant host is `{prefix}.auth0.com`.
pub const AUTH0_TENANT: &str = "coffeshopudacity.eu";

/// Audience configured for the drinks API in Auth0.
pub const AUTH0_AUDIENCE: &str = "coffe-shop-udacity";

/// Public client id of the frontend application in Auth0.
pub const AUTH0_CLIENT_ID: &str = "klTK55yZLJozKpj5eCGsFiK8ZYs8YE5W";

/// Where the frontend is served locally; Auth0 redirects back here.
pub const DEV_CALLBACK_URL: &str = "http://127.0.0.1:8100/";

// =============================================================================
// Configuration record
// =============================================================================

/// Environment configuration record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Deployment mode
    pub production: bool,
    /// Base URL of the drinks API server
    pub api_server_url: String,
    /// Identity provider settings
    pub auth0: Auth0Config,
}

/// Auth0 settings for the implicit login flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auth0Config {
    /// Tenant prefix (`{url}.auth0.com`)
    pub url: String,
    /// API audience requested for access tokens
    pub audience: String,
    /// Public client identifier
    pub client_id: String,
    /// Redirect target after login
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

impl EnvironmentConfig {
    /// Development variant.
    pub fn development() -> Self {
        Self {
            production: false,
            api_server_url: DEV_API_SERVER_URL.to_string(),
            auth0: Auth0Config {
                url: AUTH0_TENANT.to_string(),
                audience: AUTH0_AUDIENCE.to_string(),
                client_id: AUTH0_CLIENT_ID.to_string(),
                callback_url: DEV_CALLBACK_URL.to_string(),
            },
        }
    }

    /// Production variant.
    ///
    /// Same tenant and client as development. The URLs are placeholders
    /// meant to be replaced per deployment with [`BuildOverrides`].
    pub fn production() -> Self {
        Self {
            production: true,
            ..Self::development()
        }
    }

    /// The variant selected by the build, with build overrides applied.
    pub fn current() -> Self {
        #[cfg(feature = "production")]
        let base = Self::production();
        #[cfg(not(feature = "production"))]
        let base = Self::development();

        base.with_build_overrides()
    }

    /// Like [`current`](Self::current), but rejects an unusable result.
    pub fn load() -> AppResult<Self> {
        let env = Self::current();
        env.validate()?;
        log::debug!(
            "Environment loaded: production={}, api={}",
            env.production,
            env.api_server_url
        );
        Ok(env)
    }

    /// Apply the `COFFEE_SHOP_*` values captured at compile time.
    pub fn with_build_overrides(self) -> Self {
        BuildOverrides::from_build_env().apply(self)
    }

    /// Parse a deployment config file and validate it.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let env: Self = serde_json::from_str(text)
            .map_err(|e| AppError::Config(format!("Invalid environment JSON: {}", e)))?;
        env.validate()?;
        Ok(env)
    }

    /// Serialize in the deployment file shape.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> AppResult<()> {
        parse_http_url("apiServerUrl", &self.api_server_url)?;
        self.auth0.validate()
    }

    /// Absolute URL of an API endpoint.
    ///
    /// ```
    /// use coffee_shop_frontend::EnvironmentConfig;
    ///
    /// let env = EnvironmentConfig::development();
    /// assert_eq!(env.api_url("/drinks"), "http://127.0.0.1:5000/drinks");
    /// ```
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::current()
    }
}

impl Auth0Config {
    fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("auth0.url", &self.url),
            ("auth0.audience", &self.audience),
            ("auth0.clientId", &self.client_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", field)));
            }
        }
        parse_http_url("auth0.callbackURL", &self.callback_url)?;
        Ok(())
    }

    /// Tenant host name.
    pub fn tenant_domain(&self) -> String {
        format!("{}.auth0.com", self.url)
    }

    /// Expected `iss` claim of tokens issued by the tenant.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.tenant_domain())
    }

    /// Location of the tenant's signing keys.
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.tenant_domain())
    }

    /// Implicit-flow authorize URL.
    ///
    /// `callback_path` is appended to the callback URL, so the application
    /// can land on a specific page after login.
    pub fn login_link(&self, callback_path: &str) -> AppResult<String> {
        let redirect = format!("{}{}", self.callback_url, callback_path);
        let link = Url::parse_with_params(
            &format!("https://{}/authorize", self.tenant_domain()),
            &[
                ("audience", self.audience.as_str()),
                ("response_type", "token"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect.as_str()),
            ],
        )
        .map_err(|e| AppError::Config(format!("Invalid Auth0 tenant '{}': {}", self.url, e)))?;
        Ok(link.into())
    }

    /// Logout URL returning to the application root.
    pub fn logout_link(&self) -> AppResult<String> {
        let link = Url::parse_with_params(
            &format!("https://{}/v2/logout", self.tenant_domain()),
            &[
                ("client_id", self.client_id.as_str()),
                ("returnTo", self.callback_url.as_str()),
            ],
        )
        .map_err(|e| AppError::Config(format!("Invalid Auth0 tenant '{}': {}", self.url, e)))?;
        Ok(link.into())
    }
}

fn parse_http_url(field: &str, value: &str) -> AppResult<Url> {
    let url = Url::parse(value)
        .map_err(|e| AppError::Config(format!("{} is not a valid URL ({}): {}", field, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

// =============================================================================
// Build overrides
// =============================================================================

/// Values injected by the build pipeline.
///
/// | Variable                          | Field                |
/// |-----------------------------------|----------------------|
/// | `COFFEE_SHOP_API_SERVER_URL`      | `apiServerUrl`       |
/// | `COFFEE_SHOP_AUTH0_URL`           | `auth0.url`          |
/// | `COFFEE_SHOP_AUTH0_AUDIENCE`      | `auth0.audience`     |
/// | `COFFEE_SHOP_AUTH0_CLIENT_ID`     | `auth0.clientId`     |
/// | `COFFEE_SHOP_AUTH0_CALLBACK_URL`  | `auth0.callbackURL`  |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    pub api_server_url: Option<&'static str>,
    pub auth0_url: Option<&'static str>,
    pub auth0_audience: Option<&'static str>,
    pub auth0_client_id: Option<&'static str>,
    pub auth0_callback_url: Option<&'static str>,
}

impl BuildOverrides {
    /// Capture the variables present when this crate was compiled.
    pub fn from_build_env() -> Self {
        Self {
            api_server_url: option_env!("COFFEE_SHOP_API_SERVER_URL"),
            auth0_url: option_env!("COFFEE_SHOP_AUTH0_URL"),
            auth0_audience: option_env!("COFFEE_SHOP_AUTH0_AUDIENCE"),
            auth0_client_id: option_env!("COFFEE_SHOP_AUTH0_CLIENT_ID"),
            auth0_callback_url: option_env!("COFFEE_SHOP_AUTH0_CALLBACK_URL"),
        }
    }

    /// Replace every field that has an override.
    pub fn apply(&self, mut env: EnvironmentConfig) -> EnvironmentConfig {
        let slots = [
            (self.api_server_url, &mut env.api_server_url),
            (self.auth0_url, &mut env.auth0.url),
            (self.auth0_audience, &mut env.auth0.audience),
            (self.auth0_client_id, &mut env.auth0.client_id),
            (self.auth0_callback_url, &mut env.auth0.callback_url),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value.to_string();
            }
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_development_variant() {
        let env = EnvironmentConfig::development();

        assert!(!env.production);
        assert_eq!(env.api_server_url, "http://127.0.0.1:5000");
        assert_eq!(env.auth0.url, "coffeshopudacity.eu");
        assert_eq!(env.auth0.audience, "coffe-shop-udacity");
        assert_eq!(env.auth0.client_id, "klTK55yZLJozKpj5eCGsFiK8ZYs8YE5W");
        assert_eq!(env.auth0.callback_url, "http://127.0.0.1:8100/");
    }

    #[test]
    fn test_production_variant_only_flips_mode() {
        let dev = EnvironmentConfig::development();
        let prod = EnvironmentConfig::production();

        assert!(prod.production);
        assert_eq!(prod.auth0, dev.auth0);
        assert_eq!(prod.api_server_url, dev.api_server_url);
    }

    #[test]
    fn test_every_variant_has_exact_shape() {
        for env in [EnvironmentConfig::development(), EnvironmentConfig::production()] {
            let value = serde_json::to_value(&env).unwrap();

            let top: Vec<&String> = value.as_object().unwrap().keys().collect();
            assert_eq!(top.len(), 3);
            assert!(value["production"].is_boolean());
            assert!(value["apiServerUrl"].is_string());

            let auth0 = value["auth0"].as_object().unwrap();
            assert_eq!(auth0.len(), 4);
            for key in ["url", "audience", "clientId", "callbackURL"] {
                assert!(auth0[key].is_string(), "{} should be a string", key);
            }

            assert!(Url::parse(value["auth0"]["callbackURL"].as_str().unwrap()).is_ok());
            assert!(env.validate().is_ok());
        }
    }

    #[test]
    fn test_from_json_accepts_deployment_file() {
        let text = json!({
            "production": true,
            "apiServerUrl": "https://api.coffee.example",
            "auth0": {
                "url": "coffee-prod",
                "audience": "coffee",
                "clientId": "abc123",
                "callbackURL": "https://coffee.example/"
            }
        })
        .to_string();

        let env = EnvironmentConfig::from_json(&text).unwrap();
        assert!(env.production);
        assert_eq!(env.auth0.callback_url, "https://coffee.example/");

        let back: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
        assert_eq!(back["auth0"]["clientId"], "abc123");
    }

    #[test]
    fn test_from_json_rejects_unknown_and_missing_fields() {
        let mut value = serde_json::to_value(EnvironmentConfig::development()).unwrap();
        value["auth0"]["domain"] = json!("extra");
        assert!(EnvironmentConfig::from_json(&value.to_string()).is_err());

        let mut value = serde_json::to_value(EnvironmentConfig::development()).unwrap();
        value.as_object_mut().unwrap().remove("apiServerUrl");
        assert!(EnvironmentConfig::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_callback() {
        let mut env = EnvironmentConfig::development();
        env.auth0.callback_url = "127.0.0.1:8100".into();
        assert!(matches!(env.validate(), Err(AppError::Config(_))));

        env.auth0.callback_url = "ftp://127.0.0.1/".into();
        let err = env.validate().unwrap_err();
        assert!(err.to_string().contains("auth0.callbackURL"));
    }

    #[test]
    fn test_validate_rejects_empty_client_id() {
        let mut env = EnvironmentConfig::development();
        env.auth0.client_id = "  ".into();
        let err = env.validate().unwrap_err();
        assert!(err.to_string().contains("auth0.clientId"));
    }

    #[test]
    fn test_api_url_joins_single_slash() {
        let mut env = EnvironmentConfig::development();
        assert_eq!(env.api_url("drinks"), "http://127.0.0.1:5000/drinks");

        env.api_server_url = "http://127.0.0.1:5000/".into();
        assert_eq!(env.api_url("/drinks/3"), "http://127.0.0.1:5000/drinks/3");
    }

    #[test]
    fn test_auth0_endpoints() {
        let auth0 = EnvironmentConfig::development().auth0;

        assert_eq!(auth0.tenant_domain(), "coffeshopudacity.eu.auth0.com");
        assert_eq!(auth0.issuer(), "https://coffeshopudacity.eu.auth0.com/");
        assert_eq!(
            auth0.jwks_url(),
            "https://coffeshopudacity.eu.auth0.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_login_link() {
        let auth0 = EnvironmentConfig::development().auth0;
        let link = Url::parse(&auth0.login_link("tabs/user-page").unwrap()).unwrap();

        assert_eq!(link.host_str(), Some("coffeshopudacity.eu.auth0.com"));
        assert_eq!(link.path(), "/authorize");

        let params: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(
            params,
            vec![
                ("audience".to_string(), "coffe-shop-udacity".to_string()),
                ("response_type".to_string(), "token".to_string()),
                ("client_id".to_string(), AUTH0_CLIENT_ID.to_string()),
                ("redirect_uri".to_string(), "http://127.0.0.1:8100/tabs/user-page".to_string()),
            ]
        );
    }

    #[test]
    fn test_logout_link() {
        let auth0 = EnvironmentConfig::development().auth0;
        let link = Url::parse(&auth0.logout_link().unwrap()).unwrap();

        assert_eq!(link.path(), "/v2/logout");
        assert!(link
            .query_pairs()
            .any(|(k, v)| k == "returnTo" && v == "http://127.0.0.1:8100/"));
    }

    #[test]
    fn test_build_overrides_replace_only_present_values() {
        let overrides = BuildOverrides {
            api_server_url: Some("https://api.coffee.example"),
            auth0_callback_url: Some("https://coffee.example/"),
            ..Default::default()
        };

        let env = overrides.apply(EnvironmentConfig::production());
        assert_eq!(env.api_server_url, "https://api.coffee.example");
        assert_eq!(env.auth0.callback_url, "https://coffee.example/");
        assert_eq!(env.auth0.client_id, AUTH0_CLIENT_ID);
        assert!(env.production);
    }

    #[test]
    fn test_empty_overrides_are_identity() {
        let env = BuildOverrides::default().apply(EnvironmentConfig::development());
        assert_eq!(env, EnvironmentConfig::development());
    }
}
