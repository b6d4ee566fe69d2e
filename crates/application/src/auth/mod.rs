//! Authentication components for the Relay client.
//!
//! This module provides:
//! - Thread-safe storage for the current access token
//! - Header decoration with an exempt-path allowlist
//! - Single-flight coordination of token refreshes

mod coordinator;
mod decorator;
mod token_store;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use decorator::{AuthDecorator, ExemptPaths};
pub use token_store::TokenStore;
