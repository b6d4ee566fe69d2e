//! Authentication service port

use async_trait::async_trait;
use thiserror::Error;

use relay_domain::AccessToken;

/// Errors raised by the authentication backend during a refresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend rejected the refresh credential.
    #[error("refresh failed: {message}")]
    RefreshFailed {
        /// Error description from the backend.
        message: String,
    },

    /// The refresh call could not reach the backend.
    #[error("network error during refresh: {message}")]
    Network {
        /// Error description.
        message: String,
    },
}

/// Port for the external token-refresh operation.
///
/// The [`crate::RefreshCoordinator`] guarantees at most one outstanding
/// invocation of [`AuthService::refresh_token`] at any instant, regardless
/// of how many requests fail concurrently.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges the long-lived refresh credential for a new access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credential or cannot be
    /// reached. Implementations must also fold a response carrying no
    /// usable token into [`AuthError::RefreshFailed`]; the coordinator
    /// treats both shapes identically (terminal session expiry).
    async fn refresh_token(&self) -> Result<AccessToken, AuthError>;
}
