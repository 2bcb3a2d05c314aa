use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{gallery_images, products, variations};

pub mod migrator;
pub mod repositories;

pub use repositories::product::ProductInput;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn product_repo(&self) -> repositories::product::ProductRepository {
        repositories::product::ProductRepository::new(self.conn.clone())
    }

    fn variation_repo(&self) -> repositories::variation::VariationRepository {
        repositories::variation::VariationRepository::new(self.conn.clone())
    }

    fn gallery_repo(&self) -> repositories::gallery::GalleryRepository {
        repositories::gallery::GalleryRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Products ==========

    pub async fn create_product(&self, input: &ProductInput) -> Result<i32> {
        self.product_repo().create(input).await
    }

    pub async fn get_active_product(&self, id: i32) -> Result<Option<products::Model>> {
        self.product_repo().get_active(id).await
    }

    pub async fn list_active_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list_active().await
    }

    pub async fn list_all_products(&self) -> Result<Vec<products::Model>> {
        self.product_repo().list_all().await
    }

    pub async fn update_product(&self, id: i32, input: &ProductInput) -> Result<bool> {
        self.product_repo().update(id, input).await
    }

    pub async fn remove_product(&self, id: i32) -> Result<bool> {
        self.product_repo().remove(id).await
    }

    pub async fn product_exists(&self, id: i32) -> Result<bool> {
        self.product_repo().exists(id).await
    }

    // ========== Variations ==========

    pub async fn create_variation(
        &self,
        product_id: i32,
        color: &str,
        image: Option<&str>,
        stock: i64,
    ) -> Result<i32> {
        self.variation_repo()
            .create(product_id, color, image, stock)
            .await
    }

    pub async fn get_variation(&self, id: i32) -> Result<Option<variations::Model>> {
        self.variation_repo().get(id).await
    }

    pub async fn list_variations(&self, product_id: i32) -> Result<Vec<variations::Model>> {
        self.variation_repo().list_for_product(product_id).await
    }

    pub async fn update_variation(
        &self,
        id: i32,
        color: &str,
        stock: i64,
        image: Option<&str>,
    ) -> Result<bool> {
        self.variation_repo().update(id, color, stock, image).await
    }

    pub async fn remove_variation(&self, id: i32) -> Result<bool> {
        self.variation_repo().remove(id).await
    }

    pub async fn remove_variations_for_product(&self, product_id: i32) -> Result<u64> {
        self.variation_repo().remove_for_product(product_id).await
    }

    pub async fn variation_image_filenames(&self, product_id: i32) -> Result<Vec<String>> {
        self.variation_repo()
            .image_filenames_for_product(product_id)
            .await
    }

    // ========== Gallery ==========

    pub async fn append_gallery_image(
        &self,
        variation_id: i32,
        image: &str,
    ) -> Result<(i32, i64)> {
        self.gallery_repo().append(variation_id, image).await
    }

    pub async fn get_gallery_image(&self, id: i32) -> Result<Option<gallery_images::Model>> {
        self.gallery_repo().get(id).await
    }

    pub async fn list_gallery_images(
        &self,
        variation_id: i32,
    ) -> Result<Vec<gallery_images::Model>> {
        self.gallery_repo().list_for_variation(variation_id).await
    }

    pub async fn remove_gallery_image(&self, id: i32) -> Result<bool> {
        self.gallery_repo().remove(id).await
    }

    pub async fn remove_gallery_for_variation(&self, variation_id: i32) -> Result<u64> {
        self.gallery_repo().remove_for_variation(variation_id).await
    }

    pub async fn gallery_filenames_for_variation(&self, variation_id: i32) -> Result<Vec<String>> {
        self.gallery_repo()
            .filenames_for_variation(variation_id)
            .await
    }

    pub async fn gallery_filenames_for_product(&self, product_id: i32) -> Result<Vec<String>> {
        self.gallery_repo().filenames_for_product(product_id).await
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&crate::config::SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }
}
