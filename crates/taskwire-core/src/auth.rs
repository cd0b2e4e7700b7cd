use async_trait::async_trait;
use std::sync::RwLock;
use tokio::sync::{oneshot, Mutex};

use crate::error::CoreError;
use crate::session::{Session, SessionStore};

/// Lifecycle state of the client session.
///
/// `NoSession -> Authenticated -> Refreshing -> Authenticated` on a
/// successful refresh, or `Refreshing -> NoSession` when the refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoSession,
    Authenticated,
    Refreshing,
}

/// The single outbound call that trades a refresh token for a new session.
/// Production uses the `POST /auth/refresh` endpoint; tests use fakes.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<Session, CoreError>;
}

struct RefreshGate {
    state: AuthState,
    /// Requests that hit a 401 while a refresh was already in flight. Each
    /// suspends here and is resolved with the new session (retry once) or
    /// `None` (reject) when the episode ends.
    waiters: Vec<oneshot::Sender<Option<Session>>>,
}

/// Owns the session slot and serializes the refresh protocol.
///
/// The slot is read-mostly: `bearer_token` may run concurrently with an
/// in-flight refresh and observes the stale token until the episode
/// completes. Mutation happens only on login, logout, and inside the refresh
/// critical section, and is mirrored to the [`SessionStore`].
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    gate: Mutex<RefreshGate>,
}

impl SessionManager {
    /// Builds the manager from whatever session the store already holds.
    pub fn new(store: Box<dyn SessionStore>) -> Result<Self, CoreError> {
        let session = store.load()?;
        let state = if session.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::NoSession
        };
        Ok(Self {
            store,
            session: RwLock::new(session),
            gate: Mutex::new(RefreshGate {
                state,
                waiters: Vec::new(),
            }),
        })
    }

    /// The access token to attach as a bearer header, if a session exists.
    /// Pure read; never fails.
    pub fn bearer_token(&self) -> Option<String> {
        self.session
            .read()
            .expect("session slot poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("session slot poisoned").clone()
    }

    pub async fn state(&self) -> AuthState {
        self.gate.lock().await.state
    }

    /// Installs a freshly issued session (login path).
    pub async fn install(&self, session: Session) -> Result<(), CoreError> {
        let mut gate = self.gate.lock().await;
        self.store.save(&session)?;
        *self.session.write().expect("session slot poisoned") = Some(session);
        gate.state = AuthState::Authenticated;
        Ok(())
    }

    /// Clears the session unconditionally. Continuations parked on an
    /// in-flight refresh are failed rather than left hanging.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let mut gate = self.gate.lock().await;
        self.clear_slot(&mut gate);
        Ok(())
    }

    /// Recovers from an expired access token: the `handleUnauthorized` core.
    ///
    /// Callers arriving while a refresh is already in flight enqueue a
    /// continuation and suspend; they are resolved strictly after that
    /// refresh resolves. Otherwise the caller becomes the episode leader and
    /// issues the single refresh call. Either way, exactly one call goes
    /// through `refresher` per failure episode, and every caller returns the
    /// same outcome: the new session, or a closed-session failure.
    pub async fn refresh_with(&self, refresher: &dyn TokenRefresher) -> Result<Session, CoreError> {
        let waiter = {
            let mut gate = self.gate.lock().await;
            match gate.state {
                AuthState::NoSession => return Err(CoreError::AuthenticationRequired),
                AuthState::Refreshing => {
                    let (tx, rx) = oneshot::channel();
                    gate.waiters.push(tx);
                    Some(rx)
                }
                AuthState::Authenticated => {
                    gate.state = AuthState::Refreshing;
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return match rx.await {
                Ok(Some(session)) => Ok(session),
                _ => Err(CoreError::AuthenticationFailed),
            };
        }

        // Episode leader: the only caller allowed to touch the refresh
        // endpoint until the gate reopens.
        let refresh_token = self
            .session
            .read()
            .expect("session slot poisoned")
            .as_ref()
            .and_then(|s| s.refresh_token.clone());

        let outcome = match refresh_token {
            None => {
                tracing::warn!("session has no refresh token; failing closed");
                Err(CoreError::AuthenticationRequired)
            }
            Some(token) => {
                tracing::debug!("refreshing expired access token");
                refresher.refresh(&token).await
            }
        };

        let mut gate = self.gate.lock().await;
        if gate.state != AuthState::Refreshing {
            // A logout closed the episode while the refresh was in flight;
            // its outcome must not resurrect the cleared session.
            return Err(CoreError::AuthenticationRequired);
        }
        match outcome {
            Ok(session) => {
                if let Err(e) = self.store.save(&session) {
                    // The in-memory session is still valid for this process.
                    tracing::warn!(error = %e, "failed to persist refreshed session");
                }
                *self.session.write().expect("session slot poisoned") = Some(session.clone());
                gate.state = AuthState::Authenticated;
                for waiter in gate.waiters.drain(..) {
                    let _ = waiter.send(Some(session.clone()));
                }
                tracing::debug!("token refresh succeeded");
                Ok(session)
            }
            Err(error) => {
                tracing::warn!(error = %error, "token refresh failed; clearing session");
                self.clear_slot(&mut gate);
                match error {
                    CoreError::AuthenticationRequired => Err(CoreError::AuthenticationRequired),
                    _ => Err(CoreError::AuthenticationFailed),
                }
            }
        }
    }

    fn clear_slot(&self, gate: &mut RefreshGate) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
        *self.session.write().expect("session slot poisoned") = None;
        gate.state = AuthState::NoSession;
        for waiter in gate.waiters.drain(..) {
            let _ = waiter.send(None);
        }
    }
}
