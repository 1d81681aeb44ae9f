//! services/client/src/session.rs
//!
//! The session store: exclusive owner of the current authentication state.
//! Every other component reads the session through here, never mutates it.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use controlpet_core::domain::{Role, Session};
use controlpet_core::gate::{self, GateDecision, SessionResolution};
use controlpet_core::ports::{
    ApiError, AuthApi, AuthError, Credentials, RegisterRequest, TokenStore,
};

/// Shared handle to the in-memory bearer token: written only by the session
/// store, read by the REST adapter's request interceptor. This is the one
/// shared mutable resource of the whole client.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still guards a valid `Option`; take the guard anyway
    // rather than abandoning the session over an unrelated panic.
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, token: &str) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
    }

    pub fn clear(&self) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

pub struct SessionStore {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    cell: TokenCell,
    resolution: SessionResolution,
}

impl SessionStore {
    /// Seeds the shared token cell from the persisted token, if any.
    /// Resolution starts `Pending` until `resolve_current_session` runs.
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>, cell: TokenCell) -> Self {
        if let Some(token) = store.load() {
            cell.set(&token);
        }
        Self {
            auth,
            store,
            cell,
            resolution: SessionResolution::Pending,
        }
    }

    /// Authenticates against the backend, persists the returned token, and
    /// resolves the full identity behind it.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        let outcome = self.auth.login(credentials).await.map_err(|err| match err {
            // The backend answers a wrong password with 401 (or 400 on some
            // deployments); both mean the same thing to the user.
            ApiError::Unauthenticated | ApiError::ValidationRejected(_) => {
                AuthError::InvalidCredentials
            }
            other => AuthError::from(other),
        })?;

        self.cell.set(&outcome.token);
        if let Err(err) = self.store.save(&outcome.token) {
            // The in-memory session is still valid; only re-login after a
            // restart is affected.
            warn!("Failed to persist session token: {err}");
        }

        let info = self.auth.me().await.map_err(AuthError::from)?;
        let session = Session {
            token: outcome.token,
            user_id: info.id,
            display_name: info.nome,
            role: info.tipo_usuario,
        };
        info!("Login succeeded for user {}", session.user_id);
        self.resolution = SessionResolution::Authenticated(session.clone());
        Ok(session)
    }

    /// Creates a new account. The flow lands back at the login screen, so
    /// the token the backend returns is not adopted and the current session
    /// is left untouched.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        self.auth
            .register(request)
            .await
            .map(|_| ())
            .map_err(|err| match err {
                ApiError::ValidationRejected(message) => AuthError::Other(message),
                ApiError::Conflict { message, .. } => AuthError::Other(message),
                other => AuthError::from(other),
            })
    }

    /// App-start (or reload) resolution of the persisted token.
    ///
    /// An explicit 401/403 clears the token: the backend rejected it. A
    /// network failure does NOT: connectivity blips never log the user out,
    /// and resolution stays `Pending` so the caller can retry.
    pub async fn resolve_current_session(&mut self) -> Result<Session, AuthError> {
        let Some(token) = self.cell.get() else {
            self.resolution = SessionResolution::Anonymous;
            return Err(AuthError::Unauthenticated);
        };

        self.resolution = SessionResolution::Pending;
        match self.auth.me().await {
            Ok(info) => {
                let session = Session {
                    token,
                    user_id: info.id,
                    display_name: info.nome,
                    role: info.tipo_usuario,
                };
                self.resolution = SessionResolution::Authenticated(session.clone());
                Ok(session)
            }
            Err(ApiError::Unauthenticated) | Err(ApiError::Forbidden(_)) => {
                info!("Persisted token rejected by the backend, discarding it");
                self.discard_token();
                self.resolution = SessionResolution::Anonymous;
                Err(AuthError::Unauthenticated)
            }
            Err(ApiError::Network(msg)) => Err(AuthError::Network(msg)),
            Err(other) => Err(AuthError::from(other)),
        }
    }

    /// Clears the persisted token and in-memory session unconditionally.
    /// Never blocks on a network call.
    pub fn logout(&mut self) {
        self.discard_token();
        self.resolution = SessionResolution::Anonymous;
    }

    /// Hook for a 401 observed by ANY endpoint: the session is gone, make
    /// the next gate decision redirect to login.
    pub fn invalidate(&mut self) {
        info!("Authorization failure reported, invalidating session");
        self.discard_token();
        self.resolution = SessionResolution::Anonymous;
    }

    pub fn gate(&self, required: &[Role]) -> GateDecision {
        gate::decide(&self.resolution, required)
    }

    pub fn current(&self) -> Option<&Session> {
        match &self.resolution {
            SessionResolution::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn resolution(&self) -> &SessionResolution {
        &self.resolution
    }

    /// PUT `/auth/change-password` for the authenticated user. A 401 here
    /// means the current password was wrong, not that the session died.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        self.auth
            .change_password(current, new)
            .await
            .map_err(|err| match err {
                ApiError::Unauthenticated => AuthError::InvalidCredentials,
                other => AuthError::from(other),
            })
    }

    /// Advisor-only: asks the server to reset a user's password to its
    /// documented default. The client never generates or sends a password.
    pub async fn reset_password_for(&self, user_id: i32) -> Result<(), ApiError> {
        self.auth.reset_password(user_id).await
    }

    fn discard_token(&mut self) {
        self.cell.clear();
        if let Err(err) = self.store.clear() {
            warn!("Failed to clear persisted token: {err}");
        }
    }
}
