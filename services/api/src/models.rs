//! API models for request and response payloads

use serde::Serialize;

pub mod contact;
pub mod enquiry;
pub mod product;
pub mod user;

/// One entry of a top-N grouped count (product categories, enquiry subjects)
#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub name: String,
    pub count: i64,
}
