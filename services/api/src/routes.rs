//! Storefront API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::admin_middleware,
    models::{
        contact::CreateContactEnquiryRequest,
        enquiry::{CreateProductEnquiryRequest, UpdateEnquiryStatusRequest},
        product::{CreateProductRequest, ProductListResponse, ProductQuery, UpdateProductRequest},
    },
    state::AppState,
    stats,
    stats::DashboardResponse,
};

/// Create the router for the storefront API service
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product))
        .route("/products/:id", delete(delete_product))
        .route("/users", get(get_users))
        .route("/enquiries", get(get_product_enquiries))
        .route("/enquiries/:id/status", patch(update_product_enquiry_status))
        .route("/contact", get(get_contact_enquiries))
        .route("/contact/:id/status", patch(update_contact_enquiry_status))
        .route("/admin/dashboard", get(dashboard_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(get_products))
        .route("/products/:id", get(get_product))
        .route("/enquiries", post(create_product_enquiry))
        .route("/contact", post(create_contact_enquiry))
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "storefront-api"
    }))
}

/// Get products with pagination and an optional category filter
pub async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .product_repository
        .get_products(&query)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get products: {}", e);
            ApiError::InternalServerError
        })?;

    let response = ProductListResponse {
        items,
        page: query.page(),
        limit: query.limit(),
        total,
    };

    Ok(Json(response))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .product_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Create a new product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Product name is required".to_string()));
    }

    let product = state
        .product_repository
        .create(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((axum::http::StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .product_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Delete a product (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.product_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete product: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(Json(json!({"message": "Product deleted successfully"})))
    } else {
        Err(ApiError::NotFound("Product not found".to_string()))
    }
}

/// Get all users (admin)
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.get_all().await.map_err(|e| {
        tracing::error!("Failed to get users: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(users))
}

/// Submit a product enquiry
pub async fn create_product_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The enquiry must point at an existing product
    state
        .product_repository
        .find_by_id(payload.product_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up product for enquiry: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::BadRequest("Unknown product".to_string()))?;

    let enquiry = state
        .product_enquiry_repository
        .create(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product enquiry: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((axum::http::StatusCode::CREATED, Json(enquiry)))
}

/// Get all product enquiries (admin)
pub async fn get_product_enquiries(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let enquiries = state
        .product_enquiry_repository
        .get_all()
        .await
        .map_err(|e| {
            tracing::error!("Failed to get product enquiries: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(enquiries))
}

/// Update a product enquiry status (admin)
pub async fn update_product_enquiry_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnquiryStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let enquiry = state
        .product_enquiry_repository
        .update_status(id, payload.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product enquiry status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Enquiry not found".to_string()))?;

    Ok(Json(enquiry))
}

/// Submit a contact enquiry
pub async fn create_contact_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactEnquiryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("Subject is required".to_string()));
    }

    let enquiry = state
        .contact_enquiry_repository
        .create(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create contact enquiry: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((axum::http::StatusCode::CREATED, Json(enquiry)))
}

/// Get all contact enquiries (admin)
pub async fn get_contact_enquiries(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let enquiries = state
        .contact_enquiry_repository
        .get_all()
        .await
        .map_err(|e| {
            tracing::error!("Failed to get contact enquiries: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(enquiries))
}

/// Update a contact enquiry status (admin)
pub async fn update_contact_enquiry_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnquiryStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let enquiry = state
        .contact_enquiry_repository
        .update_status(id, payload.status)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update contact enquiry status: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Enquiry not found".to_string()))?;

    Ok(Json(enquiry))
}

/// Comprehensive dashboard statistics (admin)
///
/// Aggregates all four entities in one response. Any failing collector
/// fails the whole request; the dashboard never serves partial numbers.
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = stats::collect(&state).await.map_err(|e| {
        tracing::error!("Failed to collect dashboard stats: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(DashboardResponse {
        success: true,
        stats,
    }))
}
