//! Request dispatch.
//!
//! The dispatcher sends a request end-to-end: decorate, transmit,
//! classify. A recoverable 401 hands off to the refresh coordinator and
//! the request is resubmitted once with the fresh token; everything else
//! is returned to the caller untouched.

use std::sync::Arc;

use tracing::debug;

use relay_domain::{RequestDescriptor, ResponseSpec};

use crate::auth::{AuthDecorator, ExemptPaths, RefreshCoordinator, RefreshOutcome, TokenStore};
use crate::error::{ClientError, ClientResult};
use crate::ports::{AuthService, HttpTransport};

/// Sends requests with transparent token attachment and refresh.
///
/// Cheap to clone via the contained `Arc`s; all clones share one token
/// store and one refresh coordinator, which is what makes the
/// single-flight guarantee hold across every caller in the process.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    decorator: AuthDecorator,
    coordinator: Arc<RefreshCoordinator>,
}

impl Dispatcher {
    /// Wires up a dispatcher from its collaborators.
    ///
    /// The same `store` backs both the decorator and the coordinator, so a
    /// refreshed token is visible to the next decoration pass without any
    /// extra plumbing.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthService>,
        store: TokenStore,
        exempt: ExemptPaths,
    ) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(auth, store.clone()));
        Self {
            transport,
            decorator: AuthDecorator::new(store, exempt),
            coordinator,
        }
    }

    /// Sends a request, refreshing the token once if needed.
    ///
    /// Classification of the response:
    /// - any non-401 status: returned unchanged, success or not
    /// - 401 on an exempt path (login, registration, refresh): returned as
    ///   [`ClientError::Unauthorized`]; the refresh endpoint in particular
    ///   must never trigger another refresh
    /// - 401 on an already-retried request: [`ClientError::SessionExpired`]
    /// - first 401 otherwise: joins or starts a refresh episode, then
    ///   resubmits with the fresh token
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] for transport-level failures,
    /// which are never retried by this layer.
    pub async fn send(&self, mut descriptor: RequestDescriptor) -> ClientResult<ResponseSpec> {
        loop {
            self.decorator.decorate(&mut descriptor).await;
            let response = self.transport.execute(&descriptor).await?;

            if !response.status.is_unauthorized() {
                return Ok(response);
            }

            let exempt = self.decorator.exempt_paths();
            if exempt.is_refresh(&descriptor.path) {
                // A 401 from the refresh endpoint must never start
                // another refresh.
                return Err(ClientError::Unauthorized);
            }
            if exempt.is_exempt(&descriptor.path) {
                // Wrong credentials on login/registration, not a session
                // issue.
                return Err(ClientError::Unauthorized);
            }

            if descriptor.retried {
                debug!(path = %descriptor.path, "401 after retry, giving up");
                return Err(ClientError::SessionExpired);
            }

            match self.coordinator.recover().await {
                RefreshOutcome::Refreshed(_) => {
                    debug!(path = %descriptor.path, "resubmitting with fresh token");
                    descriptor.mark_retried();
                    // Loop resubmits; the decorator picks up the new token.
                }
                RefreshOutcome::SessionExpired => return Err(ClientError::SessionExpired),
            }
        }
    }

    /// Explicit logout: clears the stored token, serialized against any
    /// in-flight refresh.
    pub async fn logout(&self) {
        self.coordinator.logout().await;
    }

    /// The token store shared by all clones of this dispatcher.
    #[must_use]
    pub const fn token_store(&self) -> &TokenStore {
        self.decorator.token_store()
    }

    /// The refresh coordinator shared by all clones of this dispatcher.
    #[must_use]
    pub const fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
