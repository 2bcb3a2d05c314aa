use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreatedResponse, ProductDto, ProductRequest};
use crate::db::ProductInput;

/// Validate and normalize a product payload into repository input.
async fn build_input(
    state: &AppState,
    payload: ProductRequest,
) -> Result<ProductInput, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if payload.price <= 0 {
        return Err(ApiError::validation("Price must be greater than zero"));
    }

    let category = match payload.category {
        Some(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => state.config().read().await.catalog.default_category.clone(),
    };

    Ok(ProductInput {
        name,
        description: payload.description.trim().to_string(),
        price: payload.price,
        category,
        active: payload.active,
    })
}

/// GET /admin/products
/// List every product, inactive ones included.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let trees = state.catalog().list_admin().await?;
    let dtos: Vec<ProductDto> = trees.into_iter().map(ProductDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /admin/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let input = build_input(&state, payload).await?;
    let id = state.store().create_product(&input).await?;

    tracing::info!("Created product {id}: {}", input.name);

    Ok(Json(ApiResponse::success(CreatedResponse {
        id,
        image: None,
    })))
}

/// PUT /admin/products/{id}
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let input = build_input(&state, payload).await?;
    let updated = state.store().update_product(id, &input).await?;
    if updated {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ApiError::product_not_found(id))
    }
}

/// DELETE /admin/products/{id}
/// Removes the product, its variations, gallery rows and upload files.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    state.catalog().delete_product(id).await?;

    tracing::info!("Deleted product {id}");

    Ok(Json(ApiResponse::success(true)))
}
