//! Role store

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{failure, StoreError};
use crate::api::RolesApi;
use crate::models::{RecordId, Role, UpdateRoleInput};

#[derive(Debug, Clone, Default)]
pub struct RoleState {
    pub list: Vec<Role>,
    pub current: Option<Role>,
}

/// Role management store
pub struct RoleStore {
    api: Arc<dyn RolesApi>,
    state: RwLock<RoleState>,
}

impl RoleStore {
    pub fn new(api: Arc<dyn RolesApi>) -> Self {
        Self {
            api,
            state: RwLock::new(RoleState::default()),
        }
    }

    pub async fn snapshot(&self) -> RoleState {
        self.state.read().await.clone()
    }

    pub async fn fetch_roles(&self) -> Result<Vec<Role>, StoreError> {
        let roles = self
            .api
            .fetch_roles()
            .await
            .map_err(|e| failure("fetch_roles", None, e))?;
        self.state.write().await.list = roles.clone();
        Ok(roles)
    }

    pub async fn fetch_role_detail(&self, id: &RecordId) -> Result<Role, StoreError> {
        let role = self
            .api
            .fetch_role(id)
            .await
            .map_err(|e| failure("fetch_role_detail", Some(&id.to_string()), e))?;
        self.state.write().await.current = Some(role.clone());
        Ok(role)
    }

    pub async fn update_role(&self, id: &RecordId, input: &UpdateRoleInput) -> Result<Role, StoreError> {
        let role = self
            .api
            .update_role(id, input)
            .await
            .map_err(|e| failure("update_role", Some(&id.to_string()), e))?;
        tracing::info!(id = %role.id, name = %role.name, "Role updated");

        let mut state = self.state.write().await;
        if let Some(entry) = state.list.iter_mut().find(|r| r.id == role.id) {
            *entry = role.clone();
        }
        state.current = Some(role.clone());
        Ok(role)
    }
}
