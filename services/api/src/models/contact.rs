//! Contact enquiry models for the storefront API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact enquiry entity
#[derive(Debug, Clone, Serialize)]
pub struct ContactEnquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Request for submitting a contact enquiry (public intake)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactEnquiryRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Public projection of a contact enquiry for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ContactEnquirySummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
