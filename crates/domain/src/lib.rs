//! Relay Domain - Core types for the authenticated HTTP client
//!
//! This crate defines the domain model for the Relay client layer.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod token;

pub use error::{DomainError, DomainResult};
pub use request::{Header, Headers, HttpMethod, RequestDescriptor, AUTHORIZATION};
pub use response::{ResponseSpec, StatusCode};
pub use token::AccessToken;
