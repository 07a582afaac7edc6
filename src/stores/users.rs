//! User list store

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{failure, StoreError};
use crate::api::UsersApi;
use crate::models::{
    default_page, BulkDeleteResult, CreateUserInput, Paged, RecordId, UpdateUserInput, User,
    UserQuery, UserStatusChange,
};

/// What the user list view shows
#[derive(Debug, Clone, Default)]
pub struct UserListState {
    /// Filters, sorter and paging of the list
    pub query: UserQuery,
    pub list: Vec<User>,
    pub total: usize,
    /// User opened in the detail view
    pub current: Option<User>,
    pub loading: bool,
}

/// User management store
pub struct UserStore {
    api: Arc<dyn UsersApi>,
    state: RwLock<UserListState>,
}

impl UserStore {
    pub fn new(api: Arc<dyn UsersApi>) -> Self {
        Self {
            api,
            state: RwLock::new(UserListState::default()),
        }
    }

    pub async fn snapshot(&self) -> UserListState {
        self.state.read().await.clone()
    }

    /// Load the page described by the current query
    pub async fn fetch_users(&self) -> Result<Paged<User>, StoreError> {
        let query = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.query.clone()
        };

        let result = self.api.fetch_users(&query).await;

        let mut state = self.state.write().await;
        state.loading = false;
        let page = result.map_err(|e| failure("fetch_users", None, e))?;
        state.list = page.items.clone();
        state.total = page.total;
        Ok(page)
    }

    pub async fn fetch_user_detail(&self, id: &RecordId) -> Result<User, StoreError> {
        let user = self
            .api
            .fetch_user(id)
            .await
            .map_err(|e| failure("fetch_user_detail", Some(&id.to_string()), e))?;
        self.state.write().await.current = Some(user.clone());
        Ok(user)
    }

    /// Create a user, then reload the first page
    pub async fn create_user(&self, input: &CreateUserInput) -> Result<User, StoreError> {
        let user = self
            .api
            .create_user(input)
            .await
            .map_err(|e| failure("create_user", None, e))?;
        tracing::info!(id = %user.id, email = %user.email, "User created");

        self.state.write().await.query.page = default_page();
        self.fetch_users().await?;
        Ok(user)
    }

    pub async fn update_user(&self, id: &RecordId, input: &UpdateUserInput) -> Result<User, StoreError> {
        let user = self
            .api
            .update_user(id, input)
            .await
            .map_err(|e| failure("update_user", Some(&id.to_string()), e))?;

        let mut state = self.state.write().await;
        if let Some(entry) = state.list.iter_mut().find(|u| u.id == user.id) {
            *entry = user.clone();
        }
        if state.current.as_ref().is_some_and(|c| c.id == user.id) {
            state.current = Some(user.clone());
        }
        Ok(user)
    }

    pub async fn toggle_user_status(&self, id: &RecordId) -> Result<UserStatusChange, StoreError> {
        let change = self
            .api
            .toggle_user_status(id)
            .await
            .map_err(|e| failure("toggle_user_status", Some(&id.to_string()), e))?;

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        for user in state.list.iter_mut().chain(state.current.iter_mut()) {
            if user.id == change.id {
                user.status = change.status;
            }
        }
        Ok(change)
    }

    /// Delete several users, then reload the first page
    pub async fn delete_users(&self, ids: &[RecordId]) -> Result<BulkDeleteResult, StoreError> {
        let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let result = self
            .api
            .delete_users(ids)
            .await
            .map_err(|e| failure("delete_users", Some(&joined), e))?;
        tracing::info!(ids = %joined, "Users deleted");

        self.state.write().await.query.page = default_page();
        self.fetch_users().await?;
        Ok(result)
    }

    /// Change filters or sorter; paging restarts at the first page
    pub async fn set_filters(&self, update: impl FnOnce(&mut UserQuery) + Send) {
        let mut state = self.state.write().await;
        update(&mut state.query);
        state.query.page = default_page();
    }

    pub async fn set_page(&self, page: u32, page_size: u32) {
        let mut state = self.state.write().await;
        state.query.page = page.max(1);
        state.query.page_size = page_size.max(1);
    }

    /// Clear every filter and the sorter, keeping the page size
    pub async fn reset_filters(&self) {
        let mut state = self.state.write().await;
        state.query = UserQuery {
            page_size: state.query.page_size,
            ..Default::default()
        };
    }
}
