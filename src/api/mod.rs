//! API layer - one trait per backend resource
//!
//! This module contains the client-side view of every backend resource:
//! - Auth (login, registration, password reset, current user)
//! - Users
//! - Roles
//! - System logs and settings
//! - Dashboard metrics
//! - Admin board (overview, alerts, tasks, audit timeline)
//!
//! Each trait has an HTTP implementation here and an in-memory implementation in
//! [`crate::mock`]. [`ApiMode`] picks one set at construction time.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod roles;
pub mod system;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

pub use admin::{AdminApi, HttpAdminApi};
pub use auth::{AuthApi, HttpAuthApi};
pub use dashboard::{DashboardApi, HttpDashboardApi};
pub use roles::{HttpRolesApi, RolesApi};
pub use system::{HttpSystemApi, SystemApi};
pub use users::{HttpUsersApi, UsersApi};

use crate::config::Config;
use crate::http::{ApiError, HttpClient, TokenStore};
use crate::mock::MockBackend;

/// Which backend answers API calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// In-memory fixtures with simulated latency
    Mock,
    /// The REST backend
    Http,
}

impl ApiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMode::Mock => "mock",
            ApiMode::Http => "http",
        }
    }
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of resource APIs
#[derive(Clone)]
pub struct Apis {
    pub auth: Arc<dyn AuthApi>,
    pub users: Arc<dyn UsersApi>,
    pub roles: Arc<dyn RolesApi>,
    pub system: Arc<dyn SystemApi>,
    pub dashboard: Arc<dyn DashboardApi>,
    pub admin: Arc<dyn AdminApi>,
}

impl Apis {
    /// Build the implementations selected by the configured API mode
    ///
    /// The HTTP client, and with it the base URL, is only resolved in HTTP mode.
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mode = config.api_mode();
        tracing::info!(mode = %mode, "API backend selected");
        match mode {
            ApiMode::Http => Ok(Self::http(HttpClient::new(config, tokens)?)),
            ApiMode::Mock => Ok(Self::mock(config.mock_latency())),
        }
    }

    pub fn http(client: HttpClient) -> Self {
        Self {
            auth: HttpAuthApi::boxed(client.clone()),
            users: HttpUsersApi::boxed(client.clone()),
            roles: HttpRolesApi::boxed(client.clone()),
            system: HttpSystemApi::boxed(client.clone()),
            dashboard: HttpDashboardApi::boxed(client.clone()),
            admin: HttpAdminApi::boxed(client),
        }
    }

    pub fn mock(latency: Duration) -> Self {
        MockBackend::new(latency).into_apis()
    }
}
