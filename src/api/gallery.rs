use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, GalleryAppendResponse};

/// POST /admin/variations/{id}/gallery
/// Append an image to the variation's gallery. New images always land at the
/// end of the ordering.
pub async fn append_image(
    State(state): State<Arc<AppState>>,
    Path(variation_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<GalleryAppendResponse>>, ApiError> {
    if state.store().get_variation(variation_id).await?.is_none() {
        return Err(ApiError::variation_not_found(variation_id));
    }

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| ApiError::validation("Image field is missing a filename"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;
        if !bytes.is_empty() {
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::validation("Image is required"))?;

    let stored = state
        .uploads()
        .save(&filename, &bytes)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let (id, position) = state
        .store()
        .append_gallery_image(variation_id, &stored)
        .await?;

    tracing::info!("Appended gallery image {id} to variation {variation_id}");

    Ok(Json(ApiResponse::success(GalleryAppendResponse {
        id,
        image: stored,
        position,
    })))
}

/// DELETE /admin/gallery/{id}
/// Remove a single gallery image, row and file both.
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    state.catalog().delete_gallery_image(id).await?;
    Ok(Json(ApiResponse::success(true)))
}
