//! Data models
//!
//! This module contains the data structures exchanged with the admin backend:
//! - Session and auth payloads
//! - Managed entities (User, Role, LogEntry, Task, ...)
//! - List query and pagination types

mod admin;
mod dashboard;
mod id;
mod query;
mod role;
mod session;
mod system;
mod user;

pub use admin::{AdminOverview, Alert, AuditEvent, CreateTaskInput, Task, UpdateTaskInput};
pub use dashboard::{DashboardMetrics, SummaryCard};
pub use id::RecordId;
pub use query::{
    default_page, default_page_size, default_task_page_size, LogQuery, Paged, QueryPairs,
    SortOrder, Sorter, TaskQuery, UserQuery,
};
pub use role::{Role, UpdateRoleInput};
pub use session::{
    LoginCredentials, LoginResponse, RefreshResponse, RegisterInput, RegisteredAccount,
    Session, SessionUser, StoredSession, WILDCARD_PERMISSION,
};
pub use system::{LogEntry, LogSummary, ModuleCount, SystemSettings, SUMMARY_LEVELS};
pub use user::{
    role_label, BulkDeleteResult, CreateUserInput, UpdateUserInput, User, UserStatus, UserStatusChange,
    DEFAULT_DEPARTMENT, DEFAULT_USER_ROLE,
};
