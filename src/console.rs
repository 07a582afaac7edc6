//! Console bootstrap
//!
//! Wires configuration, durable storage, the session store, the HTTP client, the API
//! set and the domain stores together.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::api::Apis;
use crate::config::Config;
use crate::models::{LoginCredentials, SessionUser};
use crate::session::{SessionError, SessionStore};
use crate::storage::{FileStorage, SessionStorage};
use crate::stores::{AdminStore, RoleStore, SystemStore, UserStore};

/// A fully wired admin console client
pub struct Console {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub apis: Apis,
    pub users: UserStore,
    pub roles: RoleStore,
    pub system: SystemStore,
    pub admin: AdminStore,
}

impl Console {
    /// Build a console that keeps its session under `config.session.data_dir`
    pub async fn from_config(config: Config) -> Result<Self> {
        let storage = FileStorage::boxed(config.session.data_dir.clone());
        Self::with_storage(config, storage).await
    }

    /// Build a console over the given session storage
    ///
    /// The stored session is restored before the console is returned.
    pub async fn with_storage(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let session = SessionStore::shared(storage, config.session.schema_version.clone());
        session.restore_session().await;

        let apis = Apis::new(&config, session.clone()).context("Failed to create API client")?;

        Ok(Self {
            users: UserStore::new(apis.users.clone()),
            roles: RoleStore::new(apis.roles.clone()),
            system: SystemStore::new(apis.system.clone()),
            admin: AdminStore::new(apis.admin.clone()),
            config,
            session,
            apis,
        })
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, SessionError> {
        self.session.login(self.apis.auth.as_ref(), credentials).await
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }
}
