//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Signup provider; records created before the column existed have
    /// none and count as credentials signups
    pub provider: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    /// Google signups carry no local password
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload (credentials signup)
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Public response for user operations. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            provider: user.provider.unwrap_or_else(|| "credentials".to_string()),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_never_exposes_the_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            provider: None,
            is_active: true,
            roles: vec![],
            password_hash: Some("secret-hash".to_string()),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(UserResponse::from(user)).expect("serialization failed");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["provider"], "credentials");
    }
}
