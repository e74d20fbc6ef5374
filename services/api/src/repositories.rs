//! Repositories for database operations
//!
//! One repository per entity, each holding a cloned pool handle. The
//! dashboard collectors live here as `dashboard_metrics`: strictly
//! read-only count/sample queries, fanned out concurrently per entity.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};

use crate::models::user::{UserSummary, default_provider};
use crate::stats::{RECENT_LIMIT, UserMetrics, WINDOW_DAYS, WindowCounts};

pub mod contact;
pub mod enquiry;
pub mod product;

/// User repository for database operations. The storefront API only reads
/// users; signup and login belong to the auth service.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all users as public projections, newest first
    pub async fn get_all(&self) -> Result<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, provider, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                provider: default_provider(row.get("provider")),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(users)
    }

    /// Collect the dashboard metrics for users.
    ///
    /// All sub-queries run concurrently; any single failure fails the
    /// whole collection.
    pub async fn dashboard_metrics(&self, now: DateTime<Utc>) -> Result<UserMetrics> {
        let window_start = now - Duration::days(WINDOW_DAYS);
        let prior_start = now - Duration::days(2 * WINDOW_DAYS);

        let total_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool);
        let active_q = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active")
            .fetch_one(&self.pool);
        let google_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE provider = 'google'")
                .fetch_one(&self.pool);
        let recent_q = sqlx::query(
            r#"
            SELECT id, name, email, provider, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool);
        let current_q =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE created_at >= $1")
                .bind(window_start)
                .fetch_one(&self.pool);
        let prior_q = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(prior_start)
        .bind(window_start)
        .fetch_one(&self.pool);

        let (total, active, google, recent_rows, current, prior) =
            tokio::try_join!(total_q, active_q, google_q, recent_q, current_q, prior_q)?;

        let recent = recent_rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                provider: default_provider(row.get("provider")),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(UserMetrics {
            total,
            active,
            google,
            recent,
            windows: WindowCounts { current, prior },
        })
    }
}
