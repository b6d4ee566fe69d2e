//! In-memory access token storage.
//!
//! This module provides a thread-safe store for the current access token.
//! The store itself does no coordination beyond atomic read/write; the
//! refresh coordinator is the only writer during normal operation.

use std::sync::Arc;
use tokio::sync::RwLock;

use relay_domain::AccessToken;

/// Thread-safe store for the current access token.
///
/// Absence of a token means the client is unauthenticated. Clones share
/// the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a store seeded with an existing token.
    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token))),
        }
    }

    /// Returns the current token, if any.
    pub async fn get(&self) -> Option<AccessToken> {
        let token = self.token.read().await;
        token.clone()
    }

    /// Replaces the current token.
    pub async fn set(&self, token: AccessToken) {
        let mut slot = self.token.write().await;
        *slot = Some(token);
    }

    /// Clears the current token.
    pub async fn clear(&self) {
        let mut slot = self.token.write().await;
        *slot = None;
    }

    /// Returns true if a token is present.
    pub async fn is_authenticated(&self) -> bool {
        let token = self.token.read().await;
        token.is_some()
    }
}
