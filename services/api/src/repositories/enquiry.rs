//! Product enquiry repository for database operations

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::enquiry::{
    CreateProductEnquiryRequest, EnquiryStatus, ProductEnquiry, ProductEnquirySummary,
};
use crate::stats::{ProductEnquiryMetrics, RECENT_LIMIT, WINDOW_DAYS, WindowCounts};

/// Product enquiry repository for database operations
#[derive(Clone)]
pub struct ProductEnquiryRepository {
    pool: PgPool,
}

fn row_to_enquiry(row: &PgRow) -> ProductEnquiry {
    ProductEnquiry {
        id: row.get("id"),
        customer_name: row.get("customer_name"),
        customer_email: row.get("customer_email"),
        product_id: row.get("product_id"),
        message: row.get("message"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl ProductEnquiryRepository {
    /// Create a new product enquiry repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit a new product enquiry; new enquiries start out pending
    pub async fn create(&self, payload: &CreateProductEnquiryRequest) -> Result<ProductEnquiry> {
        let row = sqlx::query(
            r#"
            INSERT INTO product_enquiries (customer_name, customer_email, product_id, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_name, customer_email, product_id, message, status, created_at
            "#,
        )
        .bind(&payload.customer_name)
        .bind(&payload.customer_email)
        .bind(payload.product_id)
        .bind(&payload.message)
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_enquiry(&row))
    }

    /// Get all product enquiries, newest first
    pub async fn get_all(&self) -> Result<Vec<ProductEnquiry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, customer_email, product_id, message, status, created_at
            FROM product_enquiries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_enquiry).collect())
    }

    /// Update an enquiry status
    pub async fn update_status(
        &self,
        id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Option<ProductEnquiry>> {
        let row = sqlx::query(
            r#"
            UPDATE product_enquiries
            SET status = $2
            WHERE id = $1
            RETURNING id, customer_name, customer_email, product_id, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_enquiry))
    }

    /// Collect the dashboard metrics for product enquiries
    pub async fn dashboard_metrics(&self, now: DateTime<Utc>) -> Result<ProductEnquiryMetrics> {
        let window_start = now - Duration::days(WINDOW_DAYS);
        let prior_start = now - Duration::days(2 * WINDOW_DAYS);

        let total_q = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_enquiries")
            .fetch_one(&self.pool);
        let pending_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool);
        let responded_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Responded.as_str())
        .fetch_one(&self.pool);
        let closed_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Closed.as_str())
        .fetch_one(&self.pool);
        // Enquiries are reported with the product name they refer to; a
        // deleted product still leaves the enquiry listable.
        let recent_q = sqlx::query(
            r#"
            SELECT e.id, e.customer_name, COALESCE(p.name, 'Unknown product') AS product_name,
                   e.status, e.created_at
            FROM product_enquiries e
            LEFT JOIN products p ON p.id = e.product_id
            ORDER BY e.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool);
        let current_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_enquiries WHERE created_at >= $1",
        )
        .bind(window_start)
        .fetch_one(&self.pool);
        let prior_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_enquiries WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(prior_start)
        .bind(window_start)
        .fetch_one(&self.pool);

        let (total, pending, responded, closed, recent_rows, current, prior) = tokio::try_join!(
            total_q,
            pending_q,
            responded_q,
            closed_q,
            recent_q,
            current_q,
            prior_q
        )?;

        let recent = recent_rows
            .into_iter()
            .map(|row| ProductEnquirySummary {
                id: row.get("id"),
                customer_name: row.get("customer_name"),
                product_name: row.get("product_name"),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(ProductEnquiryMetrics {
            total,
            pending,
            responded,
            closed,
            recent,
            windows: WindowCounts { current, prior },
        })
    }
}
