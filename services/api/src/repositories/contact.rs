//! Contact enquiry repository for database operations

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::GroupCount;
use crate::models::contact::{
    ContactEnquiry, ContactEnquirySummary, CreateContactEnquiryRequest,
};
use crate::models::enquiry::EnquiryStatus;
use crate::stats::{
    ContactEnquiryMetrics, GROUP_LIMIT, RECENT_LIMIT, WINDOW_DAYS, WindowCounts,
};

/// Contact enquiry repository for database operations
#[derive(Clone)]
pub struct ContactEnquiryRepository {
    pool: PgPool,
}

fn row_to_contact(row: &PgRow) -> ContactEnquiry {
    ContactEnquiry {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl ContactEnquiryRepository {
    /// Create a new contact enquiry repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit a new contact enquiry; new enquiries start out pending
    pub async fn create(&self, payload: &CreateContactEnquiryRequest) -> Result<ContactEnquiry> {
        let row = sqlx::query(
            r#"
            INSERT INTO contact_enquiries (name, email, subject, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, status, created_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.subject)
        .bind(&payload.message)
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_contact(&row))
    }

    /// Get all contact enquiries, newest first
    pub async fn get_all(&self) -> Result<Vec<ContactEnquiry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, subject, message, status, created_at
            FROM contact_enquiries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_contact).collect())
    }

    /// Update a contact enquiry status
    pub async fn update_status(
        &self,
        id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Option<ContactEnquiry>> {
        let row = sqlx::query(
            r#"
            UPDATE contact_enquiries
            SET status = $2
            WHERE id = $1
            RETURNING id, name, email, subject, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_contact))
    }

    /// Collect the dashboard metrics for contact enquiries
    pub async fn dashboard_metrics(&self, now: DateTime<Utc>) -> Result<ContactEnquiryMetrics> {
        let window_start = now - Duration::days(WINDOW_DAYS);
        let prior_start = now - Duration::days(2 * WINDOW_DAYS);

        let total_q = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_enquiries")
            .fetch_one(&self.pool);
        let pending_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool);
        let responded_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Responded.as_str())
        .fetch_one(&self.pool);
        let closed_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_enquiries WHERE status = $1",
        )
        .bind(EnquiryStatus::Closed.as_str())
        .fetch_one(&self.pool);
        let subjects_q = sqlx::query(
            r#"
            SELECT subject AS name, COUNT(*) AS count
            FROM contact_enquiries
            GROUP BY subject
            ORDER BY count DESC, name ASC
            LIMIT $1
            "#,
        )
        .bind(GROUP_LIMIT)
        .fetch_all(&self.pool);
        let recent_q = sqlx::query(
            r#"
            SELECT id, name, subject, status, created_at
            FROM contact_enquiries
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool);
        let current_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_enquiries WHERE created_at >= $1",
        )
        .bind(window_start)
        .fetch_one(&self.pool);
        let prior_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_enquiries WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(prior_start)
        .bind(window_start)
        .fetch_one(&self.pool);

        let (total, pending, responded, closed, subject_rows, recent_rows, current, prior) = tokio::try_join!(
            total_q,
            pending_q,
            responded_q,
            closed_q,
            subjects_q,
            recent_q,
            current_q,
            prior_q
        )?;

        let subjects = subject_rows
            .into_iter()
            .map(|row| GroupCount {
                name: row.get("name"),
                count: row.get("count"),
            })
            .collect();

        let recent = recent_rows
            .into_iter()
            .map(|row| ContactEnquirySummary {
                id: row.get("id"),
                name: row.get("name"),
                subject: row.get("subject"),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(ContactEnquiryMetrics {
            total,
            pending,
            responded,
            closed,
            subjects,
            recent,
            windows: WindowCounts { current, prior },
        })
    }
}
