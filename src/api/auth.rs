//! Auth API
//!
//! Login, registration, password reset and the current-user lookup.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{LoginCredentials, LoginResponse, RegisterInput, RegisteredAccount, SessionUser};

/// Auth endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and the user identity
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError>;

    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, ApiError>;

    /// Ask the backend to send a reset link; the acknowledgement is returned as is
    async fn request_password_reset(&self, email: &str) -> Result<Value, ApiError>;

    /// Identity behind the current token
    async fn current_user(&self) -> Result<SessionUser, ApiError>;
}

/// Auth API backed by the REST backend
pub struct HttpAuthApi {
    client: HttpClient,
}

impl HttpAuthApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn AuthApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.client.post("auth/login-json", credentials).await
    }

    async fn register(&self, input: &RegisterInput) -> Result<RegisteredAccount, ApiError> {
        self.client.post("auth/register", input).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<Value, ApiError> {
        self.client
            .post("auth/forgot-password", &json!({ "email": email }))
            .await
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        self.client.get("auth/me", Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::client_for;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn api(server: &MockServer) -> HttpAuthApi {
        HttpAuthApi::new(client_for(&server.uri()))
    }

    #[tokio::test]
    async fn test_login_posts_json_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login-json"))
            .and(body_json(json!({"email": "a@x.com", "password": "pw", "remember": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "token": "t",
                    "expiresIn": 10080,
                    "user": {"id": "USR-1", "name": "A", "email": "a@x.com", "role": "admin", "permissions": ["*"]}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let login = api(&server)
            .login(&LoginCredentials::new("a@x.com", "pw").remember(true))
            .await
            .unwrap();
        assert_eq!(login.token, "t");
        assert_eq!(login.expires_in, Some(10080));
        assert_eq!(login.user.id, "USR-1");
    }

    #[tokio::test]
    async fn test_register_and_reset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "USR-9"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/forgot-password"))
            .and(body_json(json!({"email": "a@x.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "sent"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = api(&server);
        let account = api
            .register(&RegisterInput::new("A", "a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(account.id, "USR-9");
        assert_eq!(account.email, None);

        let ack = api.request_password_reset("a@x.com").await.unwrap();
        assert_eq!(ack["status"], "sent");
    }
}
