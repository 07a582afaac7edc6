//! Role model

use serde::{Deserialize, Serialize};

use super::RecordId;

/// A permission bundle assignable to users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RecordId,
    /// Machine name (admin, manager, ...)
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Number of users holding this role
    #[serde(default)]
    pub members: u32,
}

/// Input for updating a role; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl UpdateRoleInput {
    /// Merge the set fields into `role`
    pub fn apply_to(self, role: &mut Role) {
        if let Some(display_name) = self.display_name {
            role.display_name = display_name;
        }
        if let Some(description) = self.description {
            role.description = description;
        }
        if let Some(status) = self.status {
            role.status = status;
        }
        if let Some(permissions) = self.permissions {
            role.permissions = permissions;
        }
    }
}
