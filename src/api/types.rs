use serde::{Deserialize, Serialize};

use crate::entities::{gallery_images, products, variations};
use crate::services::{ProductTree, VariationTree};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub total_variations: i64,
    pub variations: Vec<VariationDto>,
}

#[derive(Debug, Serialize)]
pub struct VariationDto {
    pub id: i32,
    pub product_id: i32,
    pub color: String,
    pub image: Option<String>,
    pub stock: i64,
    pub created_at: String,
    pub gallery: Vec<GalleryImageDto>,
}

#[derive(Debug, Serialize)]
pub struct GalleryImageDto {
    pub id: i32,
    pub variation_id: i32,
    pub image: String,
    pub position: i64,
    pub created_at: String,
}

impl From<gallery_images::Model> for GalleryImageDto {
    fn from(model: gallery_images::Model) -> Self {
        Self {
            id: model.id,
            variation_id: model.variation_id,
            image: model.image,
            position: model.position,
            created_at: model.created_at,
        }
    }
}

impl From<VariationTree> for VariationDto {
    fn from(tree: VariationTree) -> Self {
        let variations::Model {
            id,
            product_id,
            color,
            image,
            stock,
            created_at,
        } = tree.variation;
        Self {
            id,
            product_id,
            color,
            image,
            stock,
            created_at,
            gallery: tree.gallery.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ProductTree> for ProductDto {
    fn from(tree: ProductTree) -> Self {
        let products::Model {
            id,
            name,
            description,
            price,
            category,
            active,
            created_at,
            updated_at,
        } = tree.product;
        Self {
            id,
            name,
            description,
            price,
            category,
            active,
            created_at,
            updated_at,
            total_variations: tree.total_variations,
            variations: tree.variations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub category: Option<String>,
    /// Absent means "keep the current value" on update, true on create.
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryAppendResponse {
    pub id: i32,
    pub image: String,
    pub position: i64,
}
