//! Domain service for catalog reads and cascading deletes.
//!
//! Read paths expand the product hierarchy (product -> variations ->
//! gallery images). Delete paths perform the application-level cascade:
//! the database removes child rows, but image files must be enumerated
//! and deleted here.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::db::Store;
use crate::entities::{gallery_images, products, variations};
use crate::services::upload::UploadService;

/// Domain errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Variation {0} not found")]
    VariationNotFound(i32),

    #[error("Gallery image {0} not found")]
    GalleryImageNotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// A variation with its gallery expanded.
#[derive(Debug, Clone)]
pub struct VariationTree {
    pub variation: variations::Model,
    pub gallery: Vec<gallery_images::Model>,
}

/// A product with its variation count and fully expanded children.
#[derive(Debug, Clone)]
pub struct ProductTree {
    pub product: products::Model,
    pub total_variations: i64,
    pub variations: Vec<VariationTree>,
}

pub struct CatalogService {
    store: Store,
    uploads: Arc<UploadService>,
}

impl CatalogService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadService>) -> Self {
        Self { store, uploads }
    }

    async fn expand(&self, product: products::Model) -> Result<ProductTree, CatalogError> {
        let rows = self.store.list_variations(product.id).await?;
        let total_variations = rows.len() as i64;

        let mut variations = Vec::with_capacity(rows.len());
        for variation in rows {
            let gallery = self.store.list_gallery_images(variation.id).await?;
            variations.push(VariationTree { variation, gallery });
        }

        Ok(ProductTree {
            product,
            total_variations,
            variations,
        })
    }

    async fn expand_all(
        &self,
        products: Vec<products::Model>,
    ) -> Result<Vec<ProductTree>, CatalogError> {
        let mut trees = Vec::with_capacity(products.len());
        for product in products {
            trees.push(self.expand(product).await?);
        }
        Ok(trees)
    }

    /// Active products, newest first, fully expanded (public listing).
    pub async fn list_public(&self) -> Result<Vec<ProductTree>, CatalogError> {
        let products = self.store.list_active_products().await?;
        self.expand_all(products).await
    }

    /// Every product including inactive ones (admin listing).
    pub async fn list_admin(&self) -> Result<Vec<ProductTree>, CatalogError> {
        let products = self.store.list_all_products().await?;
        self.expand_all(products).await
    }

    /// One active product with full expansion; inactive products are
    /// indistinguishable from missing ones on the public surface.
    pub async fn get_public(&self, id: i32) -> Result<ProductTree, CatalogError> {
        let product = self
            .store
            .get_active_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;
        self.expand(product).await
    }

    /// Delete a product, its variations, their gallery rows, and every
    /// associated image file on disk.
    pub async fn delete_product(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.product_exists(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }

        // Collect filenames before the rows disappear.
        let mut filenames = self.store.variation_image_filenames(id).await?;
        filenames.extend(self.store.gallery_filenames_for_product(id).await?);

        self.uploads.delete_all(&filenames).await;

        for variation in self.store.list_variations(id).await? {
            self.store.remove_gallery_for_variation(variation.id).await?;
        }
        self.store.remove_variations_for_product(id).await?;
        self.store.remove_product(id).await?;

        info!(
            product_id = id,
            files = filenames.len(),
            "Deleted product with cascade"
        );
        Ok(())
    }

    /// Delete a variation, its gallery and all associated files.
    pub async fn delete_variation(&self, id: i32) -> Result<(), CatalogError> {
        let variation = self
            .store
            .get_variation(id)
            .await?
            .ok_or(CatalogError::VariationNotFound(id))?;

        let gallery_files = self.store.gallery_filenames_for_variation(id).await?;
        self.uploads.delete_all(&gallery_files).await;

        if let Some(image) = &variation.image {
            self.uploads.delete(image).await;
        }

        self.store.remove_gallery_for_variation(id).await?;
        self.store.remove_variation(id).await?;

        info!(variation_id = id, "Deleted variation with cascade");
        Ok(())
    }

    /// Delete a single gallery image row and its file.
    pub async fn delete_gallery_image(&self, id: i32) -> Result<(), CatalogError> {
        let image = self
            .store
            .get_gallery_image(id)
            .await?
            .ok_or(CatalogError::GalleryImageNotFound(id))?;

        self.uploads.delete(&image.image).await;
        self.store.remove_gallery_image(id).await?;

        Ok(())
    }
}
