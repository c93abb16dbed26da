use serde::{Deserialize, Serialize};

use crate::common::Role;
use crate::domains::users::models::User;

/// Public profile; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub agency_id: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            agency_id: user.agency_id.to_string(),
            phone: user.phone,
            avatar_url: user.avatar_url,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}
