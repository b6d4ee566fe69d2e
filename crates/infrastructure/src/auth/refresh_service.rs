//! HTTP-backed token refresh service.
//!
//! Implements the `AuthService` port by exchanging a long-lived refresh
//! credential for a new access token against the authentication backend's
//! token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use relay_application::{AuthError, AuthService};
use relay_domain::AccessToken;

/// Token response from the refresh endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Error response from the refresh endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Refresh service that POSTs the refresh credential to a token endpoint.
///
/// The single-flight guarantee lives in the coordinator, not here: this
/// adapter simply performs one network exchange per invocation.
pub struct HttpRefreshService {
    client: reqwest::Client,
    token_url: Url,
    refresh_credential: String,
}

impl HttpRefreshService {
    /// Creates a refresh service for the given token endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(token_url: Url, refresh_credential: impl Into<String>) -> Result<Self, AuthError> {
        // A refresh that outlives the transport timeout is treated as a
        // failed refresh by the coordinator.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            token_url,
            refresh_credential: refresh_credential.into(),
        })
    }

    /// Creates a refresh service with a custom reqwest client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        token_url: Url,
        refresh_credential: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url,
            refresh_credential: refresh_credential.into(),
        }
    }

    /// Extracts the access token from a parsed response, folding a missing
    /// or empty token into a refresh failure. The coordinator treats that
    /// identically to a rejected credential, so callers observe one shape
    /// of session expiry.
    fn token_from_response(response: TokenResponse) -> Result<AccessToken, AuthError> {
        match response.access_token {
            Some(raw) if !raw.is_empty() => Ok(AccessToken::new(raw)),
            _ => Err(AuthError::RefreshFailed {
                message: "token endpoint returned no access token".to_string(),
            }),
        }
    }
}

#[async_trait]
impl AuthService for HttpRefreshService {
    async fn refresh_token(&self) -> Result<AccessToken, AuthError> {
        debug!(url = %self.token_url, "exchanging refresh credential");

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_credential.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<TokenErrorResponse>(&error_text) {
                return Err(AuthError::RefreshFailed {
                    message: error_response
                        .error_description
                        .unwrap_or(error_response.error),
                });
            }
            return Err(AuthError::RefreshFailed {
                message: format!("token request failed: {error_text}"),
            });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| AuthError::Network {
                message: format!("failed to parse token response: {e}"),
            })?;

        Self::token_from_response(token_response)
    }
}
