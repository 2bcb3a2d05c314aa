use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ProductDto};

/// GET /products
/// List active products with variations and gallery images attached.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let trees = state.catalog().list_public().await?;
    let dtos: Vec<ProductDto> = trees.into_iter().map(ProductDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /products/{id}
/// Fetch a single active product. Inactive products are indistinguishable
/// from missing ones.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let tree = state.catalog().get_public(id).await?;
    Ok(Json(ApiResponse::success(ProductDto::from(tree))))
}
