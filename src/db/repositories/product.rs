use crate::entities::{prelude::*, products};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    /// `None` keeps the stored value on update and defaults to visible on create.
    pub active: Option<bool>,
}

pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: &ProductInput) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = products::ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            price: Set(input.price),
            category: Set(input.category.clone()),
            active: Set(input.active.unwrap_or(true)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let res = Products::insert(active_model).exec(&self.conn).await?;
        info!("Created product {}: {}", res.last_insert_id, input.name);
        Ok(res.last_insert_id)
    }

    /// Get a product only if it is active (public detail view).
    pub async fn get_active(&self, id: i32) -> Result<Option<products::Model>> {
        let row = Products::find_by_id(id)
            .filter(products::Column::Active.eq(true))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Active products, newest first (public listing).
    pub async fn list_active(&self) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .filter(products::Column::Active.eq(true))
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Every product regardless of the active flag (admin listing).
    pub async fn list_all(&self) -> Result<Vec<products::Model>> {
        let rows = Products::find()
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: i32, input: &ProductInput) -> Result<bool> {
        let Some(existing) = Products::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let mut active: products::ActiveModel = existing.into();
        active.name = Set(input.name.clone());
        active.description = Set(input.description.clone());
        active.price = Set(input.price);
        active.category = Set(input.category.clone());
        if let Some(flag) = input.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Products::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed product with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(Products::find_by_id(id).one(&self.conn).await?.is_some())
    }
}
