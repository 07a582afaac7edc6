//! Roles API

use async_trait::async_trait;
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{RecordId, Role, UpdateRoleInput};

/// Role endpoints
#[async_trait]
pub trait RolesApi: Send + Sync {
    async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError>;

    async fn fetch_role(&self, id: &RecordId) -> Result<Role, ApiError>;

    async fn update_role(&self, id: &RecordId, input: &UpdateRoleInput) -> Result<Role, ApiError>;
}

/// Roles API backed by the REST backend
pub struct HttpRolesApi {
    client: HttpClient,
}

impl HttpRolesApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn RolesApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl RolesApi for HttpRolesApi {
    async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.client.get("roles", Vec::new()).await
    }

    async fn fetch_role(&self, id: &RecordId) -> Result<Role, ApiError> {
        self.client
            .get(&format!("roles/{}", id.encoded()), Vec::new())
            .await
    }

    async fn update_role(&self, id: &RecordId, input: &UpdateRoleInput) -> Result<Role, ApiError> {
        self.client
            .put(&format!("roles/{}", id.encoded()), input)
            .await
    }
}
