//! Application error types

use thiserror::Error;

use crate::ports::TransportError;
use relay_domain::DomainError;

/// Classified failures surfaced to callers of [`crate::Dispatcher::send`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the credentials and no refresh applies
    /// (wrong credentials on a login attempt, or a 401 from an exempt
    /// endpoint). Not a session issue.
    #[error("unauthorized")]
    Unauthorized,

    /// The session could not be recovered: the token refresh failed, or a
    /// request failed with 401 again after already being retried. The
    /// caller should discard local session state and re-authenticate.
    #[error("session expired")]
    SessionExpired,

    /// A transport-level failure, passed through unmodified.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A domain validation error occurred while building the request.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ClientError {
    /// Returns true if the caller should force re-authentication.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
