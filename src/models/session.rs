//! Session model
//!
//! The client-side authentication state and the record persisted between runs.
//! Every change to a `Session` goes through one of the transition functions below;
//! the session store only decides *when* to apply them.

use serde::{Deserialize, Deserializer, Serialize};

/// Permission granting every other permission
pub const WILDCARD_PERMISSION: &str = "*";

/// Identity of the logged-in user as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend id; numeric ids are normalized to their decimal string
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

/// Credentials for `auth/login-json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    /// Ask for a long-lived session
    #[serde(default)]
    pub remember: bool,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember: false,
        }
    }

    pub fn remember(mut self, remember: bool) -> Self {
        self.remember = remember;
        self
    }
}

/// Payload of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
    /// Lifetime in minutes
    #[serde(default, alias = "expires_in")]
    pub expires_in: Option<i64>,
}

/// Payload of a successful token refresh
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
}

/// Input for `auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAccount {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Durable session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    /// Expiry as epoch milliseconds
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl StoredSession {
    /// A record is usable when it carries a token that has not expired at `now_ms`
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.token.is_some() && self.expires_at.map_or(true, |expires| expires > now_ms)
    }
}

/// Client-side authentication state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
    /// Expiry as epoch milliseconds
    pub expires_at: Option<i64>,
    /// Set once the durable record has been consulted
    pub initialized: bool,
    /// A login call is in flight
    pub loading: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Display name of the current user, empty when logged out
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }

    pub fn permissions(&self) -> &[String] {
        self.user
            .as_ref()
            .map(|u| u.permissions.as_slice())
            .unwrap_or(&[])
    }

    /// Permission check
    ///
    /// No requirement always passes; an empty permission set never does;
    /// the wildcard grants everything.
    pub fn has_permission(&self, permission: Option<&str>) -> bool {
        let Some(permission) = permission.filter(|p| !p.is_empty()) else {
            return true;
        };
        let permissions = self.permissions();
        if permissions.is_empty() {
            return false;
        }
        permissions
            .iter()
            .any(|p| p == WILDCARD_PERMISSION || p == permission)
    }

    /// State after a successful login at `now_ms`
    ///
    /// A non-positive or overflowing `expires_in` leaves the session without an expiry.
    pub fn logged_in(self, login: LoginResponse, now_ms: i64) -> Self {
        let expires_at = login
            .expires_in
            .filter(|minutes| *minutes > 0)
            .and_then(|minutes| minutes.checked_mul(60 * 1000))
            .and_then(|ms| now_ms.checked_add(ms));
        Self {
            access_token: Some(login.token),
            refresh_token: login.refresh_token,
            user: Some(login.user),
            expires_at,
            initialized: true,
            loading: self.loading,
        }
    }

    /// State after a token refresh; only the access token changes
    pub fn with_access_token(self, token: String) -> Self {
        Self {
            access_token: Some(token),
            ..self
        }
    }

    /// State after logout
    pub fn cleared(self) -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            user: None,
            expires_at: None,
            ..self
        }
    }

    /// State after consulting the durable record; `None` means nothing usable was stored
    pub fn restored(self, stored: Option<StoredSession>) -> Self {
        let session = match stored {
            Some(stored) => Self {
                access_token: stored.token,
                refresh_token: stored.refresh_token,
                user: stored.user,
                expires_at: stored.expires_at,
                ..self
            },
            None => self,
        };
        Self {
            initialized: true,
            ..session
        }
    }

    pub fn with_loading(self, loading: bool) -> Self {
        Self { loading, ..self }
    }

    /// Durable form of this session, `None` when logged out
    pub fn to_stored(&self) -> Option<StoredSession> {
        self.access_token.as_ref().map(|token| StoredSession {
            token: Some(token.clone()),
            refresh_token: self.refresh_token.clone(),
            user: self.user.clone(),
            expires_at: self.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: &[&str]) -> SessionUser {
        SessionUser {
            id: "1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            avatar: None,
            last_login: None,
        }
    }

    fn login(expires_in: Option<i64>) -> LoginResponse {
        LoginResponse {
            token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            user: user(&["users:view"]),
            expires_in,
        }
    }

    #[test]
    fn test_user_id_accepts_number_or_string() {
        let numeric: SessionUser = serde_json::from_str(
            r#"{"id":3,"name":"S","email":"s@x.com","role":"support","permissions":[]}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, "3");

        let text: SessionUser = serde_json::from_str(
            r#"{"id":"USR-3","name":"S","email":"s@x.com","role":"support"}"#,
        )
        .unwrap();
        assert_eq!(text.id, "USR-3");
        assert!(text.permissions.is_empty());
    }

    #[test]
    fn test_login_response_accepts_snake_case() {
        let parsed: LoginResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":30,
                "user":{"id":1,"name":"A","email":"a@x.com","role":"admin"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.token, "a");
        assert_eq!(parsed.refresh_token.as_deref(), Some("r"));
        assert_eq!(parsed.expires_in, Some(30));
    }

    #[test]
    fn test_logged_in_computes_expiry_in_minutes() {
        let session = Session::default().logged_in(login(Some(480)), 1_000);
        assert!(session.is_authenticated());
        assert_eq!(session.expires_at, Some(1_000 + 480 * 60 * 1000));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert!(session.initialized);

        let no_expiry = Session::default().logged_in(login(None), 1_000);
        assert_eq!(no_expiry.expires_at, None);
    }

    #[test]
    fn test_out_of_range_expiry_is_dropped() {
        let now = 1_700_000_000_000;
        let huge = Session::default().logged_in(login(Some(9_223_372_036_854_775)), now);
        assert!(huge.is_authenticated());
        assert_eq!(huge.expires_at, None);

        let negative = Session::default().logged_in(login(Some(-5)), now);
        assert!(negative.is_authenticated());
        assert_eq!(negative.expires_at, None);

        let near_limit = Session::default().logged_in(login(Some(i64::MAX / 60_000)), now);
        assert_eq!(near_limit.expires_at, None);
    }

    #[test]
    fn test_with_access_token_keeps_the_rest() {
        let session = Session::default().logged_in(login(Some(10)), 0);
        let refreshed = session.clone().with_access_token("fresh".to_string());

        assert_eq!(refreshed.access_token.as_deref(), Some("fresh"));
        assert_eq!(refreshed.refresh_token, session.refresh_token);
        assert_eq!(refreshed.user, session.user);
        assert_eq!(refreshed.expires_at, session.expires_at);
    }

    #[test]
    fn test_cleared_keeps_initialized() {
        let session = Session::default().logged_in(login(Some(10)), 0).cleared();
        assert!(!session.is_authenticated());
        assert!(session.user.is_none());
        assert!(session.refresh_token.is_none());
        assert!(session.initialized);
        assert!(session.to_stored().is_none());
    }

    #[test]
    fn test_stored_validity() {
        let stored = StoredSession {
            token: Some("t".to_string()),
            refresh_token: None,
            user: None,
            expires_at: Some(100),
        };
        assert!(stored.is_valid_at(99));
        assert!(!stored.is_valid_at(100));

        let forever = StoredSession { expires_at: None, ..stored.clone() };
        assert!(forever.is_valid_at(i64::MAX));

        let tokenless = StoredSession { token: None, ..stored };
        assert!(!tokenless.is_valid_at(0));
    }

    #[test]
    fn test_stored_wire_format() {
        let session = Session::default().logged_in(login(Some(1)), 0);
        let json = serde_json::to_value(session.to_stored().unwrap()).unwrap();
        assert_eq!(json["token"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert_eq!(json["expiresAt"], 60_000);
        assert_eq!(json["user"]["email"], "admin@example.com");
    }

    #[test]
    fn test_has_permission() {
        let mut session = Session::default();
        assert!(session.has_permission(None));
        assert!(session.has_permission(Some("")));
        assert!(!session.has_permission(Some("users:view")));

        session.user = Some(user(&[]));
        assert!(!session.has_permission(Some("users:view")));

        session.user = Some(user(&["users:view", "roles:view"]));
        assert!(session.has_permission(Some("roles:view")));
        assert!(!session.has_permission(Some("system:manage")));

        session.user = Some(user(&["*"]));
        assert!(session.has_permission(Some("system:manage")));
    }
}
