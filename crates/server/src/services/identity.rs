//! Hosted identity provider client.
//!
//! Registration, login, and password management are delegated to an
//! external identity service; this client is a thin JSON wrapper and holds
//! no credential or token logic of its own.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Failures talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the request (bad credentials, duplicate
    /// email, weak password).
    #[error("{0}")]
    Rejected(String),

    /// The supplied access token is missing, expired, or invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// The provider could not be reached or answered with a server error.
    #[error("identity provider unavailable")]
    Unavailable,
}

/// Authenticated identity as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the hosted identity provider.
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl IdentityClient {
    /// Create a new identity client.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    /// Create a credential record; returns the provider-assigned identity.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, IdentityError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        parse(response).await
    }

    /// Exchange email and password for an access token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        let token: TokenResponse = parse(response).await?;
        Ok(token.access_token)
    }

    /// Introspect an access token.
    pub async fn get_user(&self, token: &str) -> Result<IdentityUser, IdentityError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        parse(response).await
    }

    /// Replace the password on the identity bound to the token.
    pub async fn update_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let response = self
            .client
            .put(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for(response).await)
        }
    }
}

fn transport_error(error: reqwest::Error) -> IdentityError {
    tracing::error!(error = %error, "identity provider request failed");
    IdentityError::Unavailable
}

async fn parse<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityError> {
    if response.status().is_success() {
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "identity provider returned a malformed response");
            IdentityError::Unavailable
        })
    } else {
        Err(error_for(response).await)
    }
}

async fn error_for(response: reqwest::Response) -> IdentityError {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return IdentityError::Unauthorized;
    }

    if status.is_client_error() {
        let body: ProviderErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .msg
            .or(body.error)
            .unwrap_or_else(|| "request rejected by identity provider".to_string());
        return IdentityError::Rejected(message);
    }

    tracing::error!(status = %status, "identity provider error");
    IdentityError::Unavailable
}
