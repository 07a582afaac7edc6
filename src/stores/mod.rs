//! Domain stores
//!
//! Stateful wrappers over the API traits. Each store keeps the last fetched data for a
//! view, logs failures with the operation that produced them and re-raises them as a
//! [`StoreError`] carrying a human-readable message.

mod admin;
mod roles;
mod system;
mod users;

pub use admin::{AdminBoardState, AdminStore};
pub use roles::{RoleState, RoleStore};
pub use system::{SystemState, SystemStore};
pub use users::{UserListState, UserStore};

use crate::http::ApiError;

/// A failed store operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    /// Store method that failed (`fetch_users`, `update_role`, ...)
    pub operation: String,
    /// Normalized, displayable message
    pub message: String,
}

/// Log an API failure and turn it into a `StoreError`
fn failure(operation: &str, id: Option<&str>, err: ApiError) -> StoreError {
    let message = err.user_message();
    tracing::error!(
        operation,
        id = id.unwrap_or("-"),
        status = ?err.status(),
        error = %message,
        "Store operation failed"
    );
    StoreError {
        operation: operation.to_string(),
        message,
    }
}
