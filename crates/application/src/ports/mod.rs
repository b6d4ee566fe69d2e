//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer.

mod auth_service;
mod transport;

pub use auth_service::{AuthError, AuthService};
pub use transport::{HttpTransport, TransportError};
