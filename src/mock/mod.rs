//! In-memory mock backend
//!
//! Implements every API trait over seed fixtures compiled into the binary. Mutations
//! live for the lifetime of the backend instance; each call waits for the configured
//! latency before answering so the client behaves as it would against a real server.

mod admin;
mod auth;
mod dashboard;
mod roles;
mod system;
mod users;

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub use admin::MockAdminApi;
pub use auth::MockAuthApi;
pub use dashboard::MockDashboardApi;
pub use roles::MockRolesApi;
pub use system::{compute_log_summary, MockSystemApi};
pub use users::MockUsersApi;

use crate::api::Apis;

/// Seed data for the mock backend
#[derive(RustEmbed)]
#[folder = "fixtures/"]
#[include = "*.json"]
struct Fixtures;

/// Decode an embedded fixture, falling back to an empty value if it is missing or malformed
fn load_fixture<T: DeserializeOwned + Default>(name: &str) -> T {
    let Some(file) = Fixtures::get(name) else {
        tracing::error!(fixture = name, "Mock fixture not found");
        return T::default();
    };

    match serde_json::from_slice(&file.data) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(fixture = name, error = %e, "Failed to parse mock fixture");
            T::default()
        }
    }
}

/// Wait for the simulated network latency
async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// Today's date as `YYYY-MM-DD`
fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Factory for the mock API set
pub struct MockBackend {
    latency: Duration,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Build a fresh set of mock APIs seeded from the fixtures
    pub fn into_apis(self) -> Apis {
        Apis {
            auth: Arc::new(MockAuthApi::new(self.latency)),
            users: Arc::new(MockUsersApi::new(self.latency)),
            roles: Arc::new(MockRolesApi::new(self.latency)),
            system: Arc::new(MockSystemApi::new(self.latency)),
            dashboard: Arc::new(MockDashboardApi::new(self.latency)),
            admin: Arc::new(MockAdminApi::new(self.latency)),
        }
    }
}
