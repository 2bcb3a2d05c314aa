use crate::entities::{gallery_images, prelude::*, variations};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::info;

pub struct GalleryRepository {
    conn: DatabaseConnection,
}

impl GalleryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Append an image to a variation's gallery at max(position) + 1,
    /// starting at 1 for an empty gallery.
    pub async fn append(&self, variation_id: i32, image: &str) -> Result<(i32, i64)> {
        let max_position = GalleryImages::find()
            .filter(gallery_images::Column::VariationId.eq(variation_id))
            .order_by_desc(gallery_images::Column::Position)
            .one(&self.conn)
            .await?
            .map_or(0, |row| row.position);

        let position = max_position + 1;

        let active_model = gallery_images::ActiveModel {
            variation_id: Set(variation_id),
            image: Set(image.to_string()),
            position: Set(position),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = GalleryImages::insert(active_model).exec(&self.conn).await?;
        info!(
            "Appended gallery image {} to variation {} at position {}",
            res.last_insert_id, variation_id, position
        );
        Ok((res.last_insert_id, position))
    }

    pub async fn get(&self, id: i32) -> Result<Option<gallery_images::Model>> {
        Ok(GalleryImages::find_by_id(id).one(&self.conn).await?)
    }

    /// Gallery of one variation, ordered by position with ties broken by id.
    pub async fn list_for_variation(&self, variation_id: i32) -> Result<Vec<gallery_images::Model>> {
        let rows = GalleryImages::find()
            .filter(gallery_images::Column::VariationId.eq(variation_id))
            .order_by_asc(gallery_images::Column::Position)
            .order_by_asc(gallery_images::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = GalleryImages::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed gallery image with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn remove_for_variation(&self, variation_id: i32) -> Result<u64> {
        let result = GalleryImages::delete_many()
            .filter(gallery_images::Column::VariationId.eq(variation_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn filenames_for_variation(&self, variation_id: i32) -> Result<Vec<String>> {
        let rows = GalleryImages::find()
            .filter(gallery_images::Column::VariationId.eq(variation_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(|g| g.image).collect())
    }

    /// Gallery filenames across every variation of a product.
    pub async fn filenames_for_product(&self, product_id: i32) -> Result<Vec<String>> {
        let rows = GalleryImages::find()
            .join(JoinType::InnerJoin, gallery_images::Relation::Variations.def())
            .filter(variations::Column::ProductId.eq(product_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(|g| g.image).collect())
    }
}
