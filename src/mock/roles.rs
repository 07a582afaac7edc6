//! Mock roles

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{load_fixture, simulate_latency};
use crate::api::RolesApi;
use crate::http::ApiError;
use crate::models::{RecordId, Role, UpdateRoleInput};

fn not_found() -> ApiError {
    ApiError::not_found("Role not found")
}

/// Roles API over the seed role list
pub struct MockRolesApi {
    roles: RwLock<Vec<Role>>,
    latency: Duration,
}

impl MockRolesApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            roles: RwLock::new(load_fixture("roles.json")),
            latency,
        }
    }
}

#[async_trait]
impl RolesApi for MockRolesApi {
    async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.roles.read().await.clone())
    }

    async fn fetch_role(&self, id: &RecordId) -> Result<Role, ApiError> {
        simulate_latency(self.latency).await;

        self.roles
            .read()
            .await
            .iter()
            .find(|r| r.id == *id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_role(&self, id: &RecordId, input: &UpdateRoleInput) -> Result<Role, ApiError> {
        simulate_latency(self.latency).await;

        let mut roles = self.roles.write().await;
        let role = roles.iter_mut().find(|r| r.id == *id).ok_or_else(not_found)?;
        input.clone().apply_to(role);
        Ok(role.clone())
    }
}
