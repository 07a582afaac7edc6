//! Mock users

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{load_fixture, simulate_latency, today};
use crate::api::UsersApi;
use crate::http::ApiError;
use crate::models::{
    role_label, BulkDeleteResult, CreateUserInput, Paged, RecordId, UpdateUserInput, User,
    UserQuery, UserStatus, UserStatusChange, DEFAULT_DEPARTMENT, DEFAULT_USER_ROLE,
};
use crate::query::{filter_by_keyword, is_active_filter, paginate_list, sort_by_field};

const KEYWORD_FIELDS: [&str; 3] = ["name", "email", "department"];

fn label_for(role: &str) -> String {
    role_label(role).map(str::to_string).unwrap_or_else(|| role.to_string())
}

fn not_found() -> ApiError {
    ApiError::not_found("User not found")
}

/// Apply every filter in `query` except paging and sorting
fn filter_users(users: Vec<User>, query: &UserQuery) -> Vec<User> {
    let mut users = filter_by_keyword(users, query.keyword.as_deref(), &KEYWORD_FIELDS);

    if let Some(status) = is_active_filter(query.status.as_deref()) {
        users.retain(|u| u.status.as_str().eq_ignore_ascii_case(status));
    }
    if let Some(role) = is_active_filter(query.role.as_deref()) {
        users.retain(|u| u.role == role);
    }
    if !query.tags.is_empty() {
        users.retain(|u| u.tags.iter().any(|t| query.tags.contains(t)));
    }
    if !query.department.is_empty() {
        users.retain(|u| query.department.contains(&u.department));
    }
    users
}

/// Users API over the seed user list
pub struct MockUsersApi {
    users: RwLock<Vec<User>>,
    latency: Duration,
}

impl MockUsersApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            users: RwLock::new(load_fixture("users.json")),
            latency,
        }
    }
}

#[async_trait]
impl UsersApi for MockUsersApi {
    async fn fetch_users(&self, query: &UserQuery) -> Result<Paged<User>, ApiError> {
        simulate_latency(self.latency).await;

        let users = self.users.read().await.clone();
        let filtered = filter_users(users, query);
        let sorted = sort_by_field(filtered, query.sorter.as_ref());
        Ok(paginate_list(&sorted, query.page, query.page_size))
    }

    async fn fetch_user(&self, id: &RecordId) -> Result<User, ApiError> {
        simulate_latency(self.latency).await;

        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == *id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_user(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        simulate_latency(self.latency).await;

        let mut users = self.users.write().await;
        let next_id = users.iter().filter_map(|u| u.id.numeric()).max().unwrap_or(0) + 1;
        let role = input
            .role
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());

        let user = User {
            id: RecordId::Number(next_id),
            name: input.name.clone(),
            email: input.email.clone(),
            role_name: input.role_name.clone().unwrap_or_else(|| label_for(&role)),
            role,
            status: input.status.unwrap_or(UserStatus::Active),
            created_at: today(),
            last_login: None,
            avatar: None,
            phone: input.phone.clone().unwrap_or_default(),
            department: input
                .department
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            permissions: input
                .permissions
                .clone()
                .unwrap_or_else(|| vec!["users:view".to_string()]),
            tags: input.tags.clone().unwrap_or_default(),
        };

        users.insert(0, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &RecordId, input: &UpdateUserInput) -> Result<User, ApiError> {
        simulate_latency(self.latency).await;

        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == *id).ok_or_else(not_found)?;
        input.clone().apply_to(user);
        user.role_name = label_for(&user.role);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &RecordId) -> Result<(), ApiError> {
        simulate_latency(self.latency).await;

        let mut users = self.users.write().await;
        let position = users.iter().position(|u| u.id == *id).ok_or_else(not_found)?;
        users.remove(position);
        Ok(())
    }

    async fn delete_users(&self, ids: &[RecordId]) -> Result<BulkDeleteResult, ApiError> {
        simulate_latency(self.latency).await;

        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| !ids.contains(&u.id));

        Ok(BulkDeleteResult {
            success: true,
            deleted: Some(before - users.len()),
            remaining: Some(users.len()),
        })
    }

    async fn toggle_user_status(&self, id: &RecordId) -> Result<UserStatusChange, ApiError> {
        simulate_latency(self.latency).await;

        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == *id).ok_or_else(not_found)?;
        user.status = user.status.toggled();

        Ok(UserStatusChange {
            id: user.id.clone(),
            status: user.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sorter;

    fn api() -> MockUsersApi {
        MockUsersApi::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let query = UserQuery {
            status: Some("active".to_string()),
            role: Some("all".to_string()),
            department: vec!["Engineering".to_string()],
            page_size: 50,
            ..Default::default()
        };
        let page = api().fetch_users(&query).await.unwrap();

        assert!(!page.is_empty());
        assert!(page
            .items
            .iter()
            .all(|u| u.status == UserStatus::Active && u.department == "Engineering"));
        assert_eq!(page.total, page.items.len());
    }

    #[tokio::test]
    async fn test_tag_filter_matches_any() {
        let query = UserQuery {
            tags: vec!["vip".to_string(), "new".to_string()],
            page_size: 50,
            ..Default::default()
        };
        let page = api().fetch_users(&query).await.unwrap();

        // users 4, 5, 9, 10, ... carry vip or beta,new
        assert_eq!(page.total, 12);
        assert!(page
            .items
            .iter()
            .all(|u| u.tags.iter().any(|t| t == "vip" || t == "new")));
    }

    #[tokio::test]
    async fn test_keyword_sort_and_page() {
        let query = UserQuery {
            keyword: Some("USER0".to_string()),
            sorter: Some(Sorter::descend("id")),
            page: 1,
            page_size: 3,
            ..Default::default()
        };
        let page = api().fetch_users(&query).await.unwrap();

        assert_eq!(page.total, 9);
        let ids: Vec<_> = page.items.iter().filter_map(|u| u.id.numeric()).collect();
        assert_eq!(ids, vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn test_update_recomputes_role_label() {
        let api = api();
        let updated = api
            .update_user(&RecordId::from(2), &UpdateUserInput::new().with_role("support"))
            .await
            .unwrap();
        assert_eq!(updated.role_name, "Support");
        assert_eq!(updated.name, "User 02");

        let fetched = api.fetch_user(&RecordId::from("USR-2")).await.unwrap();
        assert_eq!(fetched.role, "support");
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let api = api();

        // user 3 starts active
        let change = api.toggle_user_status(&RecordId::from(3)).await.unwrap();
        assert_eq!(change.status, UserStatus::Inactive);
        // user 2 starts pending
        let change = api.toggle_user_status(&RecordId::from(2)).await.unwrap();
        assert_eq!(change.status, UserStatus::Active);

        api.delete_user(&RecordId::from(1)).await.unwrap();
        assert!(api.fetch_user(&RecordId::from(1)).await.unwrap_err().is_not_found());
        assert!(api.delete_user(&RecordId::from(1)).await.unwrap_err().is_not_found());

        let bulk = api
            .delete_users(&[RecordId::from(2), RecordId::from(3), RecordId::from(99)])
            .await
            .unwrap();
        assert_eq!(bulk.deleted, Some(2));
        assert_eq!(bulk.remaining, Some(27));
    }
}
