use crate::entities::{prelude::*, variations};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct VariationRepository {
    conn: DatabaseConnection,
}

impl VariationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        product_id: i32,
        color: &str,
        image: Option<&str>,
        stock: i64,
    ) -> Result<i32> {
        let active_model = variations::ActiveModel {
            product_id: Set(product_id),
            color: Set(color.to_string()),
            image: Set(image.map(ToString::to_string)),
            stock: Set(stock),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = Variations::insert(active_model).exec(&self.conn).await?;
        info!(
            "Added variation {} ({}) to product {}",
            res.last_insert_id, color, product_id
        );
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<variations::Model>> {
        Ok(Variations::find_by_id(id).one(&self.conn).await?)
    }

    /// Variations of one product in insertion order.
    pub async fn list_for_product(&self, product_id: i32) -> Result<Vec<variations::Model>> {
        let rows = Variations::find()
            .filter(variations::Column::ProductId.eq(product_id))
            .order_by_asc(variations::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Update color and stock, optionally replacing the primary image filename.
    pub async fn update(
        &self,
        id: i32,
        color: &str,
        stock: i64,
        image: Option<&str>,
    ) -> Result<bool> {
        let Some(existing) = Variations::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let mut active: variations::ActiveModel = existing.into();
        active.color = Set(color.to_string());
        active.stock = Set(stock);
        if let Some(filename) = image {
            active.image = Set(Some(filename.to_string()));
        }
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Variations::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed variation with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn remove_for_product(&self, product_id: i32) -> Result<u64> {
        let result = Variations::delete_many()
            .filter(variations::Column::ProductId.eq(product_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Primary image filenames for every variation of a product.
    pub async fn image_filenames_for_product(&self, product_id: i32) -> Result<Vec<String>> {
        let rows = Variations::find()
            .filter(variations::Column::ProductId.eq(product_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().filter_map(|v| v.image).collect())
    }
}
