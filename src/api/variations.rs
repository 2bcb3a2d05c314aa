use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreatedResponse};

/// Fields accepted by the variation multipart forms.
#[derive(Debug, Default)]
struct VariationForm {
    product_id: Option<i32>,
    color: Option<String>,
    stock: Option<i64>,
    image: Option<(String, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart) -> Result<VariationForm, ApiError> {
    let mut form = VariationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "product_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid product_id: {e}")))?;
                form.product_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::validation("product_id must be an integer"))?,
                );
            }
            "color" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid color: {e}")))?;
                form.color = Some(text.trim().to_string());
            }
            "stock" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid stock: {e}")))?;
                form.stock = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::validation("stock must be an integer"))?,
                );
            }
            "image" => {
                let filename = field
                    .file_name()
                    .map(ToString::to_string)
                    .ok_or_else(|| ApiError::validation("Image field is missing a filename"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;
                if !bytes.is_empty() {
                    form.image = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    if let Some(stock) = form.stock
        && stock < 0
    {
        return Err(ApiError::validation("stock must not be negative"));
    }

    Ok(form)
}

/// POST /admin/variations
/// Create a color variation, optionally with a primary image upload.
pub async fn create_variation(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let form = read_form(multipart).await?;

    let product_id = form
        .product_id
        .ok_or_else(|| ApiError::validation("product_id is required"))?;
    let color = match form.color {
        Some(c) if !c.is_empty() => c,
        _ => return Err(ApiError::validation("Color is required")),
    };

    if !state.store().product_exists(product_id).await? {
        return Err(ApiError::product_not_found(product_id));
    }

    let stored = match form.image {
        Some((filename, bytes)) => Some(
            state
                .uploads()
                .save(&filename, &bytes)
                .await
                .map_err(|e| ApiError::validation(e.to_string()))?,
        ),
        None => None,
    };

    let id = state
        .store()
        .create_variation(product_id, &color, stored.as_deref(), form.stock.unwrap_or(0))
        .await?;

    tracing::info!("Created variation {id} for product {product_id}");

    Ok(Json(ApiResponse::success(CreatedResponse {
        id,
        image: stored,
    })))
}

/// PUT /admin/variations/{id}
/// Update color and stock. A new image upload replaces the current one and
/// deletes the old file from disk.
pub async fn update_variation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<CreatedResponse>>, ApiError> {
    let existing = state
        .store()
        .get_variation(id)
        .await?
        .ok_or_else(|| ApiError::variation_not_found(id))?;

    let form = read_form(multipart).await?;

    let color = match form.color {
        Some(c) if !c.is_empty() => c,
        _ => existing.color.clone(),
    };
    let stock = form.stock.unwrap_or(existing.stock);

    let stored = match form.image {
        Some((filename, bytes)) => {
            let name = state
                .uploads()
                .save(&filename, &bytes)
                .await
                .map_err(|e| ApiError::validation(e.to_string()))?;
            if let Some(old) = &existing.image {
                state.uploads().delete(old).await;
            }
            Some(name)
        }
        None => None,
    };

    state
        .store()
        .update_variation(id, &color, stock, stored.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(CreatedResponse {
        id,
        image: stored,
    })))
}

/// DELETE /admin/variations/{id}
/// Removes the variation, its gallery rows and any files on disk.
pub async fn delete_variation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    state.catalog().delete_variation(id).await?;

    tracing::info!("Deleted variation {id}");

    Ok(Json(ApiResponse::success(true)))
}
