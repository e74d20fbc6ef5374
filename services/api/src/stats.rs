//! Dashboard aggregation and growth metrics
//!
//! The admin dashboard is assembled from four independent per-entity
//! collectors (users, products, product enquiries, contact enquiries).
//! Each collector returns raw counts plus small record samples; this module
//! fans them out concurrently, derives the growth percentage per entity,
//! and composes the response payload. There is no partial-success mode: one
//! failing collector fails the whole request.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::models::{
    GroupCount, contact::ContactEnquirySummary, enquiry::ProductEnquirySummary,
    product::ProductSummary, user::UserSummary,
};
use crate::state::AppState;

/// Length of the growth windows in days. The current window is the 30 days
/// ending at request time; the prior window is the 30 days before that.
pub const WINDOW_DAYS: i64 = 30;

/// How many recent records each entity samples for the dashboard
pub const RECENT_LIMIT: i64 = 10;

/// How many grouped entries (categories, subjects) are ranked
pub const GROUP_LIMIT: i64 = 5;

/// Record counts for the two growth windows
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowCounts {
    /// Records with `created_at >= now - 30d`
    pub current: i64,
    /// Records with `now - 60d <= created_at < now - 30d`
    pub prior: i64,
}

/// Percentage change between the prior and current window counts.
///
/// A zero prior window with any current activity reads as a full positive
/// swing (100); two empty windows read as flat (0). The result is rounded
/// half away from zero and is not clamped.
pub fn growth_percent(current: i64, prior: i64) -> i64 {
    if prior > 0 {
        let pct = (current - prior) as f64 / prior as f64 * 100.0;
        pct.round() as i64
    } else if current > 0 {
        100
    } else {
        0
    }
}

/// Raw user metrics produced by the user collector
#[derive(Debug)]
pub struct UserMetrics {
    pub total: i64,
    pub active: i64,
    pub google: i64,
    pub recent: Vec<UserSummary>,
    pub windows: WindowCounts,
}

/// Raw product metrics produced by the product collector
#[derive(Debug)]
pub struct ProductMetrics {
    pub total: i64,
    pub active: i64,
    pub categories: Vec<GroupCount>,
    pub recent: Vec<ProductSummary>,
    pub windows: WindowCounts,
}

/// Raw product-enquiry metrics produced by its collector
#[derive(Debug)]
pub struct ProductEnquiryMetrics {
    pub total: i64,
    pub pending: i64,
    pub responded: i64,
    pub closed: i64,
    pub recent: Vec<ProductEnquirySummary>,
    pub windows: WindowCounts,
}

/// Raw contact-enquiry metrics produced by its collector
#[derive(Debug)]
pub struct ContactEnquiryMetrics {
    pub total: i64,
    pub pending: i64,
    pub responded: i64,
    pub closed: i64,
    pub subjects: Vec<GroupCount>,
    pub recent: Vec<ContactEnquirySummary>,
    pub windows: WindowCounts,
}

/// User section of the dashboard payload
#[derive(Debug, Serialize)]
pub struct UserStats {
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "activeUsers")]
    pub active_users: i64,
    #[serde(rename = "inactiveUsers")]
    pub inactive_users: i64,
    #[serde(rename = "googleUsers")]
    pub google_users: i64,
    #[serde(rename = "emailUsers")]
    pub email_users: i64,
    #[serde(rename = "recentUsers")]
    pub recent_users: Vec<UserSummary>,
    pub growth: i64,
}

impl From<UserMetrics> for UserStats {
    fn from(m: UserMetrics) -> Self {
        UserStats {
            total_users: m.total,
            active_users: m.active,
            inactive_users: m.total - m.active,
            google_users: m.google,
            // A record without a provider is a credentials signup
            email_users: m.total - m.google,
            recent_users: m.recent,
            growth: growth_percent(m.windows.current, m.windows.prior),
        }
    }
}

/// Product section of the dashboard payload
#[derive(Debug, Serialize)]
pub struct ProductStats {
    #[serde(rename = "totalProducts")]
    pub total_products: i64,
    #[serde(rename = "activeProducts")]
    pub active_products: i64,
    #[serde(rename = "inactiveProducts")]
    pub inactive_products: i64,
    pub categories: Vec<GroupCount>,
    #[serde(rename = "recentProducts")]
    pub recent_products: Vec<ProductSummary>,
    pub growth: i64,
}

impl From<ProductMetrics> for ProductStats {
    fn from(m: ProductMetrics) -> Self {
        ProductStats {
            total_products: m.total,
            active_products: m.active,
            inactive_products: m.total - m.active,
            categories: m.categories,
            recent_products: m.recent,
            growth: growth_percent(m.windows.current, m.windows.prior),
        }
    }
}

/// Product-enquiry section of the dashboard payload
#[derive(Debug, Serialize)]
pub struct ProductEnquiryStats {
    #[serde(rename = "totalEnquiries")]
    pub total_enquiries: i64,
    #[serde(rename = "pendingEnquiries")]
    pub pending_enquiries: i64,
    #[serde(rename = "respondedEnquiries")]
    pub responded_enquiries: i64,
    #[serde(rename = "closedEnquiries")]
    pub closed_enquiries: i64,
    #[serde(rename = "recentEnquiries")]
    pub recent_enquiries: Vec<ProductEnquirySummary>,
    pub growth: i64,
}

impl From<ProductEnquiryMetrics> for ProductEnquiryStats {
    fn from(m: ProductEnquiryMetrics) -> Self {
        ProductEnquiryStats {
            total_enquiries: m.total,
            pending_enquiries: m.pending,
            responded_enquiries: m.responded,
            closed_enquiries: m.closed,
            recent_enquiries: m.recent,
            growth: growth_percent(m.windows.current, m.windows.prior),
        }
    }
}

/// Contact-enquiry section of the dashboard payload
#[derive(Debug, Serialize)]
pub struct ContactEnquiryStats {
    #[serde(rename = "totalEnquiries")]
    pub total_enquiries: i64,
    #[serde(rename = "pendingEnquiries")]
    pub pending_enquiries: i64,
    #[serde(rename = "respondedEnquiries")]
    pub responded_enquiries: i64,
    #[serde(rename = "closedEnquiries")]
    pub closed_enquiries: i64,
    pub subjects: Vec<GroupCount>,
    #[serde(rename = "recentEnquiries")]
    pub recent_enquiries: Vec<ContactEnquirySummary>,
    pub growth: i64,
}

impl From<ContactEnquiryMetrics> for ContactEnquiryStats {
    fn from(m: ContactEnquiryMetrics) -> Self {
        ContactEnquiryStats {
            total_enquiries: m.total,
            pending_enquiries: m.pending,
            responded_enquiries: m.responded,
            closed_enquiries: m.closed,
            subjects: m.subjects,
            recent_enquiries: m.recent,
            growth: growth_percent(m.windows.current, m.windows.prior),
        }
    }
}

/// The composed dashboard statistics
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub users: UserStats,
    pub products: ProductStats,
    #[serde(rename = "productEnquiries")]
    pub product_enquiries: ProductEnquiryStats,
    #[serde(rename = "contactEnquiries")]
    pub contact_enquiries: ContactEnquiryStats,
}

/// Envelope returned by the dashboard endpoint
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

/// Run the four entity collectors concurrently and compose the dashboard.
///
/// `now` is captured once so both window boundaries are identical across
/// all four entities within one response. The collectors have no ordering
/// dependency on each other; the first failure aborts the whole request.
pub async fn collect(state: &AppState) -> Result<DashboardStats> {
    let now = Utc::now();

    let (users, products, product_enquiries, contact_enquiries) = tokio::try_join!(
        state.user_repository.dashboard_metrics(now),
        state.product_repository.dashboard_metrics(now),
        state.product_enquiry_repository.dashboard_metrics(now),
        state.contact_enquiry_repository.dashboard_metrics(now),
    )?;

    Ok(DashboardStats {
        users: users.into(),
        products: products.into(),
        product_enquiries: product_enquiries.into(),
        contact_enquiries: contact_enquiries.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_is_zero_from_an_empty_base() {
        assert_eq!(growth_percent(0, 0), 0);
    }

    #[test]
    fn growth_is_full_swing_from_zero_prior() {
        assert_eq!(growth_percent(1, 0), 100);
        assert_eq!(growth_percent(250, 0), 100);
    }

    #[test]
    fn growth_doubling_is_one_hundred() {
        assert_eq!(growth_percent(10, 5), 100);
    }

    #[test]
    fn growth_halving_is_minus_fifty() {
        assert_eq!(growth_percent(5, 10), -50);
    }

    #[test]
    fn growth_to_zero_is_minus_one_hundred() {
        assert_eq!(growth_percent(0, 10), -100);
    }

    #[test]
    fn growth_is_not_clamped() {
        assert_eq!(growth_percent(5, 1), 400);
        assert_eq!(growth_percent(1, 50), -98);
    }

    #[test]
    fn growth_rounds_half_away_from_zero() {
        // 8 vs 12 -> -33.33… -> -33
        assert_eq!(growth_percent(8, 12), -33);
        // 1 vs 8 -> -87.5 -> -88
        assert_eq!(growth_percent(1, 8), -88);
        // 3 vs 2 -> 50
        assert_eq!(growth_percent(3, 2), 50);
        // 13 vs 8 -> 62.5 -> 63
        assert_eq!(growth_percent(13, 8), 63);
    }

    #[test]
    fn breakdown_counts_partition_the_total() {
        let stats: UserStats = UserMetrics {
            total: 20,
            active: 13,
            google: 4,
            recent: vec![],
            windows: WindowCounts {
                current: 8,
                prior: 12,
            },
        }
        .into();

        assert_eq!(stats.total_users, stats.active_users + stats.inactive_users);
        assert_eq!(stats.total_users, stats.google_users + stats.email_users);
        // Worked example: 8 current vs 12 prior -> -33
        assert_eq!(stats.growth, -33);
    }

    #[test]
    fn payload_uses_the_documented_field_names() {
        let stats = DashboardStats {
            users: UserMetrics {
                total: 1,
                active: 1,
                google: 0,
                recent: vec![],
                windows: WindowCounts::default(),
            }
            .into(),
            products: ProductMetrics {
                total: 0,
                active: 0,
                categories: vec![],
                recent: vec![],
                windows: WindowCounts::default(),
            }
            .into(),
            product_enquiries: ProductEnquiryMetrics {
                total: 0,
                pending: 0,
                responded: 0,
                closed: 0,
                recent: vec![],
                windows: WindowCounts::default(),
            }
            .into(),
            contact_enquiries: ContactEnquiryMetrics {
                total: 0,
                pending: 0,
                responded: 0,
                closed: 0,
                subjects: vec![],
                recent: vec![],
                windows: WindowCounts::default(),
            }
            .into(),
        };

        let value = serde_json::to_value(DashboardResponse {
            success: true,
            stats,
        })
        .expect("serialization failed");

        assert_eq!(value["success"], true);
        let stats = &value["stats"];
        assert!(stats["users"].get("totalUsers").is_some());
        assert!(stats["users"].get("googleUsers").is_some());
        assert!(stats["users"].get("emailUsers").is_some());
        assert!(stats["users"].get("recentUsers").is_some());
        assert!(stats["products"].get("totalProducts").is_some());
        assert!(stats["products"].get("categories").is_some());
        assert!(stats["productEnquiries"].get("pendingEnquiries").is_some());
        assert!(stats["contactEnquiries"].get("subjects").is_some());
        assert!(stats["users"].get("growth").is_some());
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let build = || -> serde_json::Value {
            let stats: ContactEnquiryStats = ContactEnquiryMetrics {
                total: 7,
                pending: 3,
                responded: 2,
                closed: 2,
                subjects: vec![],
                recent: vec![],
                windows: WindowCounts {
                    current: 4,
                    prior: 3,
                },
            }
            .into();
            serde_json::to_value(stats).expect("serialization failed")
        };

        assert_eq!(build(), build());
    }
}
