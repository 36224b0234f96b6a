use serde::{Deserialize, Serialize};

use super::roles::{resolve, RoleAssignment};
use super::permissions::PermissionSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Current user as returned by `/api/system/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Option<RoleAssignment>,
}

impl UserInfo {
    /// Effective capabilities across all assigned roles
    pub fn permissions(&self) -> PermissionSet {
        resolve(self.roles.iter().flat_map(|r| r.roles()))
    }
}
