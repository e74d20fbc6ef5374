//! Pending OAuth session storage
//!
//! The authorization redirect and its callback are separate requests, so
//! the CSRF token and PKCE verifier are persisted in between. Sessions are
//! single-use and expire after ten minutes.

use anyhow::Result;
use sqlx::PgPool;

/// Lifetime of a pending OAuth session in minutes
const SESSION_TTL_MINUTES: i32 = 10;

/// Repository for pending OAuth sessions
#[derive(Clone)]
pub struct OAuthSessionRepository {
    pool: PgPool,
}

impl OAuthSessionRepository {
    /// Create a new OAuth session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a pending OAuth session keyed by the CSRF state token.
    /// Expired sessions are swept here so abandoned sign-ins don't pile up.
    pub async fn insert(&self, csrf_token: &str, pkce_verifier: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM oauth_sessions
            WHERE created_at <= now() - make_interval(mins => $1)
            "#,
        )
        .bind(SESSION_TTL_MINUTES)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO oauth_sessions (csrf_token, pkce_verifier)
            VALUES ($1, $2)
            "#,
        )
        .bind(csrf_token)
        .bind(pkce_verifier)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Consume a pending session, returning its PKCE verifier. A session is
    /// removed on first use; expired or unknown sessions yield `None`.
    pub async fn take(&self, csrf_token: &str) -> Result<Option<String>> {
        let verifier: Option<String> = sqlx::query_scalar(
            r#"
            DELETE FROM oauth_sessions
            WHERE csrf_token = $1
              AND created_at > now() - make_interval(mins => $2)
            RETURNING pkce_verifier
            "#,
        )
        .bind(csrf_token)
        .bind(SESSION_TTL_MINUTES)
        .fetch_optional(&self.pool)
        .await?;

        Ok(verifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool};
    use uuid::Uuid;

    /// Requires a running Postgres reachable via `DATABASE_URL` with the
    /// schema from `migrations/` applied.
    #[tokio::test]
    #[ignore]
    async fn expired_sessions_are_swept_on_insert() -> Result<()> {
        let pool = init_pool(&DatabaseConfig::from_env()?).await?;
        let repo = OAuthSessionRepository::new(pool.clone());

        let stale = format!("csrf-{}", Uuid::new_v4());
        repo.insert(&stale, "verifier-a").await?;
        sqlx::query(
            "UPDATE oauth_sessions SET created_at = now() - interval '1 hour' WHERE csrf_token = $1",
        )
        .bind(&stale)
        .execute(&pool)
        .await?;

        let fresh = format!("csrf-{}", Uuid::new_v4());
        repo.insert(&fresh, "verifier-b").await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM oauth_sessions WHERE csrf_token = $1")
                .bind(&stale)
                .fetch_one(&pool)
                .await?;
        assert_eq!(remaining, 0);

        assert_eq!(repo.take(&fresh).await?, Some("verifier-b".to_string()));

        Ok(())
    }
}
