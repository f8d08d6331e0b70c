//! Product API endpoints
//!
//! Handles HTTP requests for product management:
//! - GET /api/products - List the session user's products
//! - POST /api/products - Create a product
//! - PUT /api/products/{id} - Update a product
//! - DELETE /api/products/{id} - Delete a product
//! - PUT /api/products/reorder - Reorder the session user's products

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateProductInput, Product, UpdateProductInput};
use crate::services::ProductServiceError;

/// Request body for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub comment: Option<String>,
}

/// Request body for updating a product; absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub comment: Option<String>,
}

/// Request body for reordering products.
///
/// The browser client sends either a bare `{productIds}` or the same object
/// wrapped under `data`; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub product_ids: Option<Vec<String>>,
    pub data: Option<ReorderPayload>,
}

/// Wrapped reorder payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
    pub product_ids: Option<Vec<String>>,
}

/// Response for delete and reorder
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Build the products router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/reorder", put(reorder_products))
        .route("/{id}", put(update_product).delete(delete_product))
}

fn map_service_error(e: ProductServiceError) -> ApiError {
    match e {
        ProductServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ProductServiceError::InvalidOrdering => ApiError::validation_error("Invalid productIds"),
        ProductServiceError::NotFound => ApiError::not_found("Product not found"),
        ProductServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /api/products - Products owned by the session user, in stored order
async fn list_products(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .product_service
        .list_for_user(&user.0.id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(products))
}

/// POST /api/products - Create a product owned by the session user
async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let (Some(name), Some(amount)) = (body.name, body.amount) else {
        return Err(ApiError::validation_error("Name and amount are required"));
    };

    let input = CreateProductInput {
        name,
        amount,
        comment: body.comment,
    };

    let product = state
        .product_service
        .create(&user.0.id, input)
        .await
        .map_err(map_service_error)?;

    Ok(Json(product))
}

/// PUT /api/products/{id} - Apply partial fields to a product
async fn update_product(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let changes = UpdateProductInput {
        name: body.name,
        amount: body.amount,
        comment: body.comment,
    };

    let product = state
        .product_service
        .update(&id, changes)
        .await
        .map_err(map_service_error)?;

    Ok(Json(product))
}

/// DELETE /api/products/{id} - Remove a product
async fn delete_product(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .product_service
        .delete(&id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/products/reorder - Reorder the session user's products
///
/// All-or-nothing: a single id the user does not own rejects the request and
/// leaves the stored list untouched.
async fn reorder_products(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let product_ids = body
        .product_ids
        .or_else(|| body.data.and_then(|d| d.product_ids))
        .ok_or_else(|| ApiError::validation_error("Invalid productIds"))?;

    tracing::debug!(user_id = %user.0.id, count = product_ids.len(), "reorder request");

    state
        .product_service
        .reorder(&user.0.id, &product_ids)
        .await
        .map_err(map_service_error)?;

    Ok(Json(SuccessResponse { success: true }))
}
