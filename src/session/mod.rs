//! Session store
//!
//! Owns the authentication state of the client: access and refresh tokens, the user
//! identity and the expiry. State lives in memory behind a lock and is mirrored to
//! durable storage so a restart can pick the session back up.
//!
//! The durable record is tagged with a schema version marker. When the marker does not
//! match the running version the record is discarded instead of being reinterpreted.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::AuthApi;
use crate::http::TokenStore;
use crate::models::{LoginCredentials, Session, SessionUser, StoredSession};
use crate::storage::{SessionStorage, SESSION_KEY, SESSION_VERSION_KEY};

/// Session errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    /// Login was rejected or could not be completed; carries a readable message
    #[error("{0}")]
    LoginFailed(String),
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Client-side session state with durable persistence
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
    schema_version: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, schema_version: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            storage,
            schema_version: schema_version.into(),
        }
    }

    pub fn shared(storage: Arc<dyn SessionStorage>, schema_version: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(storage, schema_version))
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    pub async fn has_permission(&self, permission: Option<&str>) -> bool {
        self.state.read().await.has_permission(permission)
    }

    /// Load the durable session once per process
    ///
    /// Later calls are no-ops. An expired or version-mismatched record is removed.
    pub async fn restore_session(&self) {
        let mut state = self.state.write().await;
        if state.initialized {
            return;
        }
        let stored = self.load_stored().await;
        let restored = std::mem::take(&mut *state).restored(stored);
        tracing::info!(
            authenticated = restored.is_authenticated(),
            "Session restored"
        );
        *state = restored;
    }

    /// Log in through `auth` and persist the resulting session
    pub async fn login(
        &self,
        auth: &dyn AuthApi,
        credentials: &LoginCredentials,
    ) -> Result<SessionUser, SessionError> {
        self.update(|session| session.with_loading(true)).await;

        let result = auth.login(credentials).await;

        let mut state = self.state.write().await;
        match result {
            Ok(login) => {
                let user = login.user.clone();
                let session = std::mem::take(&mut *state)
                    .logged_in(login, now_ms())
                    .with_loading(false);
                self.persist(&session).await;
                *state = session;
                tracing::info!(user_id = %user.id, email = %user.email, "Login succeeded");
                Ok(user)
            }
            Err(err) => {
                *state = std::mem::take(&mut *state).with_loading(false);
                let message = match err.user_message() {
                    m if m.trim().is_empty() => "Login failed".to_string(),
                    m => m,
                };
                tracing::warn!(email = %credentials.email, "Login failed: {}", message);
                Err(SessionError::LoginFailed(message))
            }
        }
    }

    /// Clear the session in memory and in durable storage; safe to repeat
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        let was_authenticated = state.is_authenticated();
        *state = std::mem::take(&mut *state).cleared();
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            tracing::warn!("Failed to remove stored session: {:#}", e);
        }
        if was_authenticated {
            tracing::info!("Logged out");
        }
    }

    /// Replace the access token, keeping everything else
    pub async fn set_token(&self, token: String) {
        let mut state = self.state.write().await;
        let session = std::mem::take(&mut *state).with_access_token(token);
        self.persist(&session).await;
        *state = session;
    }

    async fn update(&self, f: impl FnOnce(Session) -> Session) {
        let mut state = self.state.write().await;
        *state = f(std::mem::take(&mut *state));
    }

    async fn persist(&self, session: &Session) {
        let Some(stored) = session.to_stored() else {
            return;
        };
        let record = match serde_json::to_string(&stored) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to encode session record: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, &record).await {
            tracing::warn!("Failed to persist session: {:#}", e);
        }
        if let Err(e) = self.storage.set(SESSION_VERSION_KEY, &self.schema_version).await {
            tracing::warn!("Failed to persist session version: {:#}", e);
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Failed to read session storage: {:#}", e);
                None
            }
        }
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            tracing::warn!(key, "Failed to clear session storage: {:#}", e);
        }
    }

    async fn load_stored(&self) -> Option<StoredSession> {
        let version = self.read(SESSION_VERSION_KEY).await;
        let record = self.read(SESSION_KEY).await;

        if version.as_deref().map(str::trim) != Some(self.schema_version.as_str()) {
            if record.is_some() {
                tracing::info!(
                    stored = version.as_deref().unwrap_or("<none>"),
                    current = %self.schema_version,
                    "Session schema changed, discarding stored session"
                );
                self.discard(SESSION_KEY).await;
            }
            if let Err(e) = self.storage.set(SESSION_VERSION_KEY, &self.schema_version).await {
                tracing::warn!("Failed to persist session version: {:#}", e);
            }
            return None;
        }

        let stored: StoredSession = match serde_json::from_str(&record?) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Stored session is unreadable, discarding: {}", e);
                self.discard(SESSION_KEY).await;
                return None;
            }
        };

        if stored.is_valid_at(now_ms()) {
            Some(stored)
        } else {
            tracing::info!("Stored session expired");
            self.discard(SESSION_KEY).await;
            None
        }
    }
}

#[async_trait]
impl TokenStore for SessionStore {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    async fn set_token(&self, token: String) {
        SessionStore::set_token(self, token).await
    }

    async fn logout(&self) {
        SessionStore::logout(self).await
    }
}
