//! Users API

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{
    BulkDeleteResult, CreateUserInput, Paged, QueryPairs, RecordId, UpdateUserInput, User,
    UserQuery, UserStatusChange,
};

/// User management endpoints
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Filtered, sorted page of users
    async fn fetch_users(&self, query: &UserQuery) -> Result<Paged<User>, ApiError>;

    async fn fetch_user(&self, id: &RecordId) -> Result<User, ApiError>;

    async fn create_user(&self, input: &CreateUserInput) -> Result<User, ApiError>;

    async fn update_user(&self, id: &RecordId, input: &UpdateUserInput) -> Result<User, ApiError>;

    async fn delete_user(&self, id: &RecordId) -> Result<(), ApiError>;

    async fn delete_users(&self, ids: &[RecordId]) -> Result<BulkDeleteResult, ApiError>;

    /// Flip a user between active and inactive
    async fn toggle_user_status(&self, id: &RecordId) -> Result<UserStatusChange, ApiError>;
}

/// Users API backed by the REST backend
pub struct HttpUsersApi {
    client: HttpClient,
}

impl HttpUsersApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn UsersApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn fetch_users(&self, query: &UserQuery) -> Result<Paged<User>, ApiError> {
        self.client.get("users", query.query_pairs()).await
    }

    async fn fetch_user(&self, id: &RecordId) -> Result<User, ApiError> {
        self.client
            .get(&format!("users/{}", id.encoded()), Vec::new())
            .await
    }

    async fn create_user(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        self.client.post("users", input).await
    }

    async fn update_user(&self, id: &RecordId, input: &UpdateUserInput) -> Result<User, ApiError> {
        self.client
            .put(&format!("users/{}", id.encoded()), input)
            .await
    }

    async fn delete_user(&self, id: &RecordId) -> Result<(), ApiError> {
        let _: Value = self
            .client
            .delete(&format!("users/{}", id.encoded()))
            .await?;
        Ok(())
    }

    async fn delete_users(&self, ids: &[RecordId]) -> Result<BulkDeleteResult, ApiError> {
        // The bulk route only accepts string ids
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.client
            .post("users/bulk-delete", &json!({ "ids": ids }))
            .await
    }

    /// Reads the current status, then sends the opposite one
    async fn toggle_user_status(&self, id: &RecordId) -> Result<UserStatusChange, ApiError> {
        let current = self.fetch_user(id).await?;
        let target = current.status.toggled();
        self.client
            .patch(
                &format!("users/{}/status", id.encoded()),
                &json!({ "status": target }),
            )
            .await
    }
}
