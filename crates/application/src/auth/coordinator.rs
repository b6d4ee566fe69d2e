//! Single-flight token refresh coordination.
//!
//! When a request fails with 401, exactly one flow performs the refresh
//! call; every other flow that fails while that call is outstanding is
//! parked on a oneshot channel and resolved with the same outcome. This
//! collapses N concurrently-failing requests into one refresh, so no
//! caller ever has to know that sibling requests exist.

use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use relay_domain::AccessToken;

use crate::auth::TokenStore;
use crate::ports::AuthService;

/// Outcome of one refresh episode.
///
/// The triggering flow and every waiter parked during the same episode
/// observe the same value; partial success across the group cannot happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new token was obtained and stored; the request should be marked
    /// retried and resubmitted.
    Refreshed(AccessToken),
    /// The refresh failed; the token store has been cleared and the caller
    /// must re-authenticate.
    SessionExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshState {
    Idle,
    Refreshing,
}

/// State shared by all request flows, guarded by a single lock.
struct Shared {
    state: RefreshState,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Coordinates token refreshes across concurrent request flows.
///
/// At most one refresh operation is outstanding at any instant. The state
/// flag and the waiter queue live behind one [`Mutex`]; the lock is held
/// only for state transitions, never across the refresh network call.
pub struct RefreshCoordinator {
    auth: Arc<dyn AuthService>,
    store: TokenStore,
    shared: Mutex<Shared>,
}

impl RefreshCoordinator {
    /// Creates a coordinator over the given auth service and token store.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>, store: TokenStore) -> Self {
        Self {
            auth,
            store,
            shared: Mutex::new(Shared {
                state: RefreshState::Idle,
                waiters: Vec::new(),
            }),
        }
    }

    /// Joins or starts a refresh episode and waits for its outcome.
    ///
    /// The first caller in an episode performs the refresh call; every
    /// later caller is parked on a oneshot receiver until the refresher
    /// drains the queue. On success the new token is already in the store
    /// when this returns; on failure the store has been cleared.
    pub async fn recover(&self) -> RefreshOutcome {
        let waiter = {
            let mut shared = self.shared.lock().await;
            match shared.state {
                RefreshState::Refreshing => {
                    let (tx, rx) = oneshot::channel();
                    shared.waiters.push(tx);
                    debug!(queued = shared.waiters.len(), "joined in-flight refresh");
                    Some(rx)
                }
                RefreshState::Idle => {
                    shared.state = RefreshState::Refreshing;
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            // The sender cannot be dropped unresolved while the episode is
            // alive; a closed channel still resolves to expiry.
            return rx.await.unwrap_or(RefreshOutcome::SessionExpired);
        }

        self.run_refresh().await
    }

    /// Performs the refresh call, applies the result, and drains the queue.
    async fn run_refresh(&self) -> RefreshOutcome {
        info!("access token rejected, refreshing");
        let outcome = match self.auth.refresh_token().await {
            Ok(token) if !token.is_empty() => {
                self.store.set(token.clone()).await;
                info!("token refresh succeeded");
                RefreshOutcome::Refreshed(token)
            }
            Ok(_) => {
                // An empty token is folded into failure: the observable
                // behavior (forced logout) is identical either way.
                warn!("token refresh returned an empty token");
                self.store.clear().await;
                RefreshOutcome::SessionExpired
            }
            Err(error) => {
                warn!(%error, "token refresh failed");
                self.store.clear().await;
                RefreshOutcome::SessionExpired
            }
        };

        let waiters = {
            let mut shared = self.shared.lock().await;
            shared.state = RefreshState::Idle;
            std::mem::take(&mut shared.waiters)
        };

        debug!(drained = waiters.len(), "draining refresh waiters");
        for tx in waiters {
            // A waiter that gave up (dropped its receiver) is skipped.
            let _ = tx.send(outcome.clone());
        }

        outcome
    }

    /// Clears the token store, serialized against refresh transitions.
    ///
    /// This is the explicit logout path; it takes the coordination lock so
    /// the clear cannot race a refresh completion writing a fresh token.
    pub async fn logout(&self) {
        let _shared = self.shared.lock().await;
        self.store.clear().await;
    }

    /// Returns true if a refresh is currently in flight.
    pub async fn is_refreshing(&self) -> bool {
        let shared = self.shared.lock().await;
        shared.state == RefreshState::Refreshing
    }

    /// Number of flows currently parked on the in-flight refresh.
    pub async fn pending_waiters(&self) -> usize {
        let shared = self.shared.lock().await;
        shared.waiters.len()
    }

    /// The token store this coordinator writes to.
    #[must_use]
    pub const fn token_store(&self) -> &TokenStore {
        &self.store
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::AuthError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Auth service that blocks until released, counting invocations.
    struct GatedAuth {
        calls: AtomicUsize,
        started: Notify,
        release: Notify,
        result: Result<AccessToken, AuthError>,
    }

    impl GatedAuth {
        fn new(result: Result<AccessToken, AuthError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                started: Notify::new(),
                release: Notify::new(),
                result,
            })
        }
    }

    #[async_trait]
    impl AuthService for GatedAuth {
        async fn refresh_token(&self) -> Result<AccessToken, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            self.result.clone()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_recover_calls_share_one_refresh() {
        let auth = GatedAuth::new(Ok(AccessToken::new("t2")));
        let store = TokenStore::with_token(AccessToken::new("t1"));
        let coordinator = Arc::new(RefreshCoordinator::new(auth.clone(), store));

        let trigger = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.recover().await })
        };
        auth.started.notified().await;
        assert!(coordinator.is_refreshing().await);

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.recover().await })
            })
            .collect();
        while coordinator.pending_waiters().await < 4 {
            tokio::task::yield_now().await;
        }

        auth.release.notify_one();

        let outcome = trigger.await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Refreshed(AccessToken::new("t2")));
        for waiter in waiters {
            assert_eq!(
                waiter.await.unwrap(),
                RefreshOutcome::Refreshed(AccessToken::new("t2"))
            );
        }

        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_refreshing().await);
        assert_eq!(
            coordinator.token_store().get().await,
            Some(AccessToken::new("t2"))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_refresh_expires_every_participant() {
        let auth = GatedAuth::new(Err(AuthError::RefreshFailed {
            message: "revoked".to_string(),
        }));
        let store = TokenStore::with_token(AccessToken::new("t1"));
        let coordinator = Arc::new(RefreshCoordinator::new(auth.clone(), store));

        let trigger = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.recover().await })
        };
        auth.started.notified().await;

        let waiter = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.recover().await })
        };
        while coordinator.pending_waiters().await < 1 {
            tokio::task::yield_now().await;
        }

        auth.release.notify_one();

        assert_eq!(trigger.await.unwrap(), RefreshOutcome::SessionExpired);
        assert_eq!(waiter.await.unwrap(), RefreshOutcome::SessionExpired);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
        assert!(coordinator.token_store().get().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_token_is_folded_into_expiry() {
        let auth = GatedAuth::new(Ok(AccessToken::new("")));
        let store = TokenStore::with_token(AccessToken::new("t1"));
        let coordinator = RefreshCoordinator::new(auth.clone(), store);

        auth.release.notify_one();
        let outcome = coordinator.recover().await;

        assert_eq!(outcome, RefreshOutcome::SessionExpired);
        assert!(coordinator.token_store().get().await.is_none());
    }

    #[tokio::test]
    async fn test_new_episode_after_completion() {
        let auth = GatedAuth::new(Ok(AccessToken::new("t2")));
        let coordinator = RefreshCoordinator::new(auth.clone(), TokenStore::new());

        auth.release.notify_one();
        coordinator.recover().await;
        assert!(!coordinator.is_refreshing().await);

        // The coordinator is cyclic: a later 401 starts a fresh episode.
        auth.release.notify_one();
        coordinator.recover().await;
        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let store = TokenStore::with_token(AccessToken::new("t1"));
        let auth = GatedAuth::new(Ok(AccessToken::new("t2")));
        let coordinator = RefreshCoordinator::new(auth, store);

        coordinator.logout().await;
        assert!(coordinator.token_store().get().await.is_none());
    }
}
