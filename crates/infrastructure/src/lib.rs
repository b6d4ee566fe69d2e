//! Relay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: a reqwest-backed transport and an HTTP
//! refresh service, plus tracing setup for embedding binaries.

pub mod adapters;
pub mod auth;
pub mod telemetry;

pub use adapters::ReqwestTransport;
pub use auth::HttpRefreshService;
pub use telemetry::init_tracing;
