//! Authentication service routes

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use oauth2::PkceCodeVerifier;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    AppState,
    jwt::TokenType,
    models::{LoginCredentials, NewUser, UserResponse},
    validation::{validate_email, validate_name, validate_password},
};

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for token refresh
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response for token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response for the Google authorization URL
#[derive(Serialize)]
pub struct GoogleAuthUrlResponse {
    pub auth_url: String,
}

/// Query parameters delivered to the Google callback
#[derive(Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
    pub state: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User signup endpoint (credentials provider)
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Signup attempt for email: {}", payload.email);

    validate_name(&payload.name).map_err(AuthError::BadRequest)?;
    validate_email(&payload.email).map_err(AuthError::BadRequest)?;
    validate_password(&payload.password).map_err(AuthError::BadRequest)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(AuthError::BadRequest(
            "Email is already registered".to_string(),
        ));
    }

    let user = state.user_repository.create(&payload).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        AuthError::InternalServerError
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User login endpoint (credentials provider)
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for email: {}", payload.email);

    // Throttle repeated attempts per email
    let rate_key = format!("login:{}", payload.email);
    let allowed = state.rate_limiter.is_allowed(&rate_key).await.map_err(|e| {
        error!("Rate limiter failure: {}", e);
        AuthError::InternalServerError
    })?;

    if !allowed {
        return Err(AuthError::TooManyRequests);
    }

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    if !user.is_active {
        return Err(AuthError::Unauthorized);
    }

    let verified = state
        .user_repository
        .verify_password(&user, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            AuthError::InternalServerError
        })?;

    if !verified {
        return Err(AuthError::Unauthorized);
    }

    let response = issue_tokens(&state, &user)?;

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Token refresh request");

    // Validate the refresh token
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| AuthError::Unauthorized)?;

    // Check that it's actually a refresh token
    if claims.token_type != TokenType::Refresh {
        return Err(AuthError::Unauthorized);
    }

    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    if !user.is_active {
        return Err(AuthError::Unauthorized);
    }

    let tokens = issue_tokens(&state, &user)?;

    let response = RefreshTokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Start the Google sign-in flow
pub async fn google_login(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AuthError> {
    let client = state.google_oauth.as_ref().ok_or_else(|| {
        AuthError::BadRequest("Google sign-in is not configured".to_string())
    })?;

    let (auth_url, csrf_token, pkce_verifier) = client.generate_auth_url();

    state
        .oauth_session_repository
        .insert(csrf_token.secret(), pkce_verifier.secret())
        .await
        .map_err(|e| {
            error!("Failed to store OAuth session: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(Json(GoogleAuthUrlResponse { auth_url }))
}

/// Complete the Google sign-in flow
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<impl IntoResponse, AuthError> {
    let client = state.google_oauth.as_ref().ok_or_else(|| {
        AuthError::BadRequest("Google sign-in is not configured".to_string())
    })?;

    // The state parameter must match a stored, unexpired session
    let pkce_verifier = state
        .oauth_session_repository
        .take(&query.state)
        .await
        .map_err(|e| {
            error!("Failed to load OAuth session: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or(AuthError::Unauthorized)?;

    let access_token = client
        .exchange_code(query.code, PkceCodeVerifier::new(pkce_verifier))
        .await
        .map_err(|e| {
            error!("Failed to exchange authorization code: {}", e);
            AuthError::Unauthorized
        })?;

    let profile = client.get_user_profile(&access_token).await.map_err(|e| {
        error!("Failed to fetch Google profile: {}", e);
        AuthError::InternalServerError
    })?;

    if !profile.verified_email {
        return Err(AuthError::BadRequest(
            "Google account email is not verified".to_string(),
        ));
    }

    // Fall back to the mailbox name when Google sends no display name
    let name = profile
        .name
        .clone()
        .unwrap_or_else(|| profile.email.split('@').next().unwrap_or("user").to_string());

    let user = state
        .user_repository
        .upsert_google(&profile.email, &name)
        .await
        .map_err(|e| {
            error!("Failed to upsert Google user: {}", e);
            AuthError::InternalServerError
        })?;

    if !user.is_active {
        return Err(AuthError::Unauthorized);
    }

    let response = issue_tokens(&state, &user)?;

    Ok((StatusCode::OK, Json(response)))
}

/// Issue an access/refresh token pair for a user
fn issue_tokens(state: &AppState, user: &crate::models::User) -> Result<TokenResponse, AuthError> {
    let access_token = state
        .jwt_service
        .generate_access_token(user)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            AuthError::InternalServerError
        })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user)
        .map_err(|e| {
            error!("Failed to generate refresh token: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    })
}

/// Custom error type for authentication errors
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    BadRequest(String),
    TooManyRequests,
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many attempts, try again later".to_string(),
            ),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
