//! Authorization header decoration.
//!
//! The decorator attaches `Authorization: Bearer <token>` to outgoing
//! requests, except on the allowlist of unauthenticated paths (login,
//! registration, token refresh). The exemption keeps a stale or absent
//! token off the very endpoints used to establish or renew
//! authentication, and keeps the refresh call itself from ever being a
//! refresh trigger.

use relay_domain::{RequestDescriptor, AUTHORIZATION};

use crate::auth::TokenStore;

/// The fixed allowlist of paths that never carry an `Authorization` header.
///
/// Supplied at construction; the refresh path is tracked separately so the
/// dispatcher can also exclude it from triggering refresh cycles.
#[derive(Debug, Clone)]
pub struct ExemptPaths {
    paths: Vec<String>,
    refresh: String,
}

impl ExemptPaths {
    /// Creates an allowlist from the unauthenticated paths and the refresh
    /// path. The refresh path is exempt whether or not it also appears in
    /// `paths`.
    #[must_use]
    pub fn new<I, S>(paths: I, refresh: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            refresh: refresh.into(),
        }
    }

    /// Returns true if the path is exempt from token attachment.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.refresh == path || self.paths.iter().any(|p| p == path)
    }

    /// Returns true if the path is the token-refresh endpoint.
    #[must_use]
    pub fn is_refresh(&self, path: &str) -> bool {
        self.refresh == path
    }
}

/// Attaches `Authorization` headers based on the token store and the
/// exempt-path allowlist.
#[derive(Debug, Clone)]
pub struct AuthDecorator {
    store: TokenStore,
    exempt: ExemptPaths,
}

impl AuthDecorator {
    /// Creates a decorator over the given store and allowlist.
    #[must_use]
    pub const fn new(store: TokenStore, exempt: ExemptPaths) -> Self {
        Self { store, exempt }
    }

    /// Attaches the `Authorization` header iff a token is present and the
    /// target path is not exempt. Leaves the descriptor untouched
    /// otherwise.
    pub async fn decorate(&self, descriptor: &mut RequestDescriptor) {
        if self.exempt.is_exempt(&descriptor.path) {
            return;
        }
        if let Some(token) = self.store.get().await {
            descriptor.headers.set(AUTHORIZATION, token.bearer());
        }
    }

    /// The allowlist this decorator consults.
    #[must_use]
    pub const fn exempt_paths(&self) -> &ExemptPaths {
        &self.exempt
    }

    /// The token store this decorator reads from.
    #[must_use]
    pub const fn token_store(&self) -> &TokenStore {
        &self.store
    }
}
