//! Mock auth: fixed demo accounts

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;

use super::{load_fixture, simulate_latency};
use crate::api::AuthApi;
use crate::http::ApiError;
use crate::models::{LoginCredentials, LoginResponse, RegisterInput, RegisteredAccount, SessionUser};

/// Session lifetime with "remember me", in minutes
const REMEMBER_EXPIRES_IN: i64 = 7 * 24 * 60;

/// Default session lifetime, in minutes
const DEFAULT_EXPIRES_IN: i64 = 8 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MockAccount {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    last_login: Option<String>,
}

impl MockAccount {
    fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            permissions: self.permissions.clone(),
            avatar: None,
            last_login: self.last_login.clone(),
        }
    }
}

#[derive(Default)]
struct AuthState {
    accounts: Vec<MockAccount>,
    current: Option<SessionUser>,
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Auth API over the demo accounts
pub struct MockAuthApi {
    state: RwLock<AuthState>,
    latency: Duration,
}

impl MockAuthApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            state: RwLock::new(AuthState {
                accounts: load_fixture("accounts.json"),
                current: None,
            }),
            latency,
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        simulate_latency(self.latency).await;

        let mut state = self.state.write().await;
        let account = state
            .accounts
            .iter()
            .find(|a| same_email(&a.email, &credentials.email) && a.password == credentials.password)
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

        let millis = chrono::Utc::now().timestamp_millis();
        let user = account.to_session_user();
        state.current = Some(user.clone());
        tracing::debug!(email = %account.email, "Mock login accepted");

        Ok(LoginResponse {
            token: format!("mock-token-{}-{}", account.id, millis),
            refresh_token: Some(format!("mock-refresh-{}-{}", account.id, millis)),
            user,
            expires_in: Some(if credentials.remember {
                REMEMBER_EXPIRES_IN
            } else {
                DEFAULT_EXPIRES_IN
            }),
        })
    }

    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, ApiError> {
        simulate_latency(self.latency).await;

        let mut state = self.state.write().await;
        if state.accounts.iter().any(|a| same_email(&a.email, &input.email)) {
            return Err(ApiError::conflict("Email already registered"));
        }

        let id = state.accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        state.accounts.push(MockAccount {
            id,
            name: input.name.clone(),
            email: input.email.trim().to_string(),
            password: input.password.clone(),
            role: "user".to_string(),
            permissions: vec!["dashboard:view".to_string()],
            last_login: None,
        });

        Ok(RegisteredAccount {
            id: id.to_string(),
            email: Some(input.email.trim().to_string()),
            name: Some(input.name.clone()),
        })
    }

    async fn request_password_reset(&self, email: &str) -> Result<Value, ApiError> {
        simulate_latency(self.latency).await;

        let state = self.state.read().await;
        if !state.accounts.iter().any(|a| same_email(&a.email, email)) {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(json!({ "success": true, "email": email }))
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        simulate_latency(self.latency).await;

        self.state
            .read()
            .await
            .current
            .clone()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> MockAuthApi {
        MockAuthApi::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_login_issues_mock_tokens() {
        let api = api();
        let login = api
            .login(&LoginCredentials::new("admin@example.com", "admin123"))
            .await
            .unwrap();

        assert!(login.token.starts_with("mock-token-1-"));
        assert!(login.refresh_token.unwrap().starts_with("mock-refresh-1-"));
        assert_eq!(login.expires_in, Some(480));
        assert_eq!(login.user.permissions, vec!["*".to_string()]);

        let me = api.current_user().await.unwrap();
        assert_eq!(me.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_remember_extends_lifetime() {
        let login = api()
            .login(&LoginCredentials::new("manager@example.com", "manager123").remember(true))
            .await
            .unwrap();
        assert_eq!(login.expires_in, Some(10080));
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let err = api()
            .login(&LoginCredentials::new("admin@example.com", "nope"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_current_user_requires_login() {
        assert!(api().current_user().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let api = api();
        let account = api
            .register(&RegisterInput::new("Ann", "ann@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(account.id, "4");

        let duplicate = api
            .register(&RegisterInput::new("Ann", "ANN@x.com", "secret1"))
            .await
            .unwrap_err();
        assert_eq!(duplicate.status(), Some(409));

        let login = api
            .login(&LoginCredentials::new("ann@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(login.user.role, "user");
    }

    #[tokio::test]
    async fn test_password_reset() {
        let api = api();
        let ack = api.request_password_reset("support@example.com").await.unwrap();
        assert_eq!(ack["success"], true);

        let err = api.request_password_reset("ghost@example.com").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
