//! HTTP transport port

use async_trait::async_trait;
use thiserror::Error;

use relay_domain::{RequestDescriptor, ResponseSpec};

/// Errors raised by the transport while sending a request.
///
/// These are passed through to callers unmodified; the dispatch layer
/// never retries them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The target URL is invalid or could not be joined to the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// application layer to be independent of specific HTTP libraries. A
/// response is returned for every status code the server answers with;
/// errors are reserved for failures to obtain a response at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Transmits a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport-level problems.
    async fn execute(&self, request: &RequestDescriptor) -> Result<ResponseSpec, TransportError>;
}
