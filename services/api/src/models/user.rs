//! User projections exposed by the storefront API
//!
//! The API service never writes users (signup lives in the auth service);
//! it only reads public projections for admin listings and the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Public projection of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub provider: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Signup provider values recognised by the storefront
pub const PROVIDER_GOOGLE: &str = "google";
pub const PROVIDER_CREDENTIALS: &str = "credentials";

/// Records written before the provider column existed have no provider;
/// they are credentials signups.
pub fn default_provider(provider: Option<String>) -> String {
    match provider.as_deref() {
        Some(PROVIDER_GOOGLE) => PROVIDER_GOOGLE.to_string(),
        _ => PROVIDER_CREDENTIALS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_provider_defaults_to_credentials() {
        assert_eq!(default_provider(None), "credentials");
        assert_eq!(default_provider(Some("google".to_string())), "google");
        assert_eq!(
            default_provider(Some("credentials".to_string())),
            "credentials"
        );
    }

    #[test]
    fn summary_serializes_with_mongo_style_id() {
        let summary = UserSummary {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            provider: "credentials".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&summary).expect("serialization failed");
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("id").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
