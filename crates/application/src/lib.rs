//! Relay Application - Authenticated dispatch with single-flight refresh
//!
//! This crate contains the core of the client layer:
//! - [`TokenStore`]: holds the current access token
//! - [`AuthDecorator`]: attaches `Authorization` headers outside the
//!   exempt-path allowlist
//! - [`RefreshCoordinator`]: collapses concurrent authentication failures
//!   into one token refresh shared by all in-flight requests
//! - [`Dispatcher`]: sends a request end-to-end and classifies failures
//!
//! Ports (traits) define the boundaries to the transport and to the
//! authentication backend; adapters live in `relay-infrastructure`.

pub mod auth;
pub mod dispatcher;
pub mod error;
pub mod ports;

pub use auth::{AuthDecorator, ExemptPaths, RefreshCoordinator, RefreshOutcome, TokenStore};
pub use dispatcher::Dispatcher;
pub use error::{ClientError, ClientResult};
pub use ports::{AuthError, AuthService, HttpTransport, TransportError};
