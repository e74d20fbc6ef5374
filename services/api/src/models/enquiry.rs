//! Product enquiry models for the storefront API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enquiry lifecycle status. The update path only ever accepts these three
/// values; anything else is rejected during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    Pending,
    Responded,
    Closed,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Responded => "responded",
            EnquiryStatus::Closed => "closed",
        }
    }
}

/// Product enquiry entity
#[derive(Debug, Clone, Serialize)]
pub struct ProductEnquiry {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub product_id: Uuid,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Request for submitting a product enquiry (public intake)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductEnquiryRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub product_id: Uuid,
    pub message: Option<String>,
}

/// Request for updating an enquiry status (admin)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnquiryStatusRequest {
    pub status: EnquiryStatus,
}

/// Public projection of a product enquiry for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ProductEnquirySummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_only_the_three_values() {
        for (raw, expected) in [
            ("\"pending\"", EnquiryStatus::Pending),
            ("\"responded\"", EnquiryStatus::Responded),
            ("\"closed\"", EnquiryStatus::Closed),
        ] {
            let status: EnquiryStatus = serde_json::from_str(raw).expect("valid status rejected");
            assert_eq!(status, expected);
        }

        assert!(serde_json::from_str::<EnquiryStatus>("\"archived\"").is_err());
        assert!(serde_json::from_str::<EnquiryStatus>("\"Pending\"").is_err());
        assert!(serde_json::from_str::<EnquiryStatus>("null").is_err());
    }

    #[test]
    fn status_update_request_rejects_unknown_status() {
        let ok: Result<UpdateEnquiryStatusRequest, _> =
            serde_json::from_str(r#"{"status":"responded"}"#);
        assert!(ok.is_ok());

        let bad: Result<UpdateEnquiryStatusRequest, _> =
            serde_json::from_str(r#"{"status":"escalated"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [
            EnquiryStatus::Pending,
            EnquiryStatus::Responded,
            EnquiryStatus::Closed,
        ] {
            let json = serde_json::to_string(&status).expect("serialization failed");
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
