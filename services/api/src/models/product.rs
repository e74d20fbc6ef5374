//! Product models for the storefront API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback category for products saved without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Product entity
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request for product creation (admin)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

/// Request for product update (admin); absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

/// Query parameters for product listing
#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Filter by category
    pub category: Option<String>,
}

impl ProductQuery {
    /// Effective page number, 1-based
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to 1..=100
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// Response for product listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<Product>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Public projection of a product for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Missing category reads as "Uncategorized", never null.
pub fn default_category(category: Option<String>) -> String {
    category.unwrap_or_else(|| UNCATEGORIZED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_query_clamps_page_and_limit() {
        let query = ProductQuery {
            page: None,
            limit: None,
            category: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 10);

        let query = ProductQuery {
            page: Some(0),
            limit: Some(0),
            category: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 1);

        let query = ProductQuery {
            page: Some(3),
            limit: Some(500),
            category: None,
        };
        assert_eq!(query.page(), 3);
        assert_eq!(query.limit(), 100);
    }

    #[test]
    fn missing_category_defaults_to_uncategorized() {
        assert_eq!(default_category(None), "Uncategorized");
        assert_eq!(default_category(Some("CCTV".to_string())), "CCTV");
    }

    #[test]
    fn summary_defaults_are_never_null() {
        let summary = ProductSummary {
            id: Uuid::nil(),
            name: "Dome camera".to_string(),
            category: default_category(None),
            price: 0.0,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&summary).expect("serialization failed");
        assert_eq!(value["category"], "Uncategorized");
        assert_eq!(value["price"], 0.0);
        assert!(value.get("_id").is_some());
    }
}
