//! Repositories for database operations

pub mod oauth_session;
pub mod user;

// Re-export for convenience
pub use oauth_session::OAuthSessionRepository;
pub use user::UserRepository;
