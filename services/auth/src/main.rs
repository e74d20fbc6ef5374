use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod jwt;
mod models;
mod oauth;
mod rate_limiter;
mod repositories;
mod routes;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    oauth::{OAuthClient, OAuthConfig},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{OAuthSessionRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub oauth_session_repository: OAuthSessionRepository,
    pub google_oauth: Option<OAuthClient>,
    pub rate_limiter: RateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    info!("Authentication service initialized successfully");

    // Initialize JWT service
    let jwt_config = crate::jwt::JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    // Google sign-in is optional; without credentials only the
    // email/password flow is served
    let google_oauth = match OAuthConfig::google_from_env()? {
        Some(config) => Some(OAuthClient::new_google(config)?),
        None => {
            info!("Google OAuth credentials not configured, Google sign-in disabled");
            None
        }
    };

    let user_repository = UserRepository::new(pool.clone());
    let oauth_session_repository = OAuthSessionRepository::new(pool.clone());
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        user_repository,
        oauth_session_repository,
        google_oauth,
        rate_limiter,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Authentication service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
