use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Stores uploaded photos under the configured uploads directory with
/// collision-resistant generated names (`<unix_millis>-<random>.<ext>`).
pub struct UploadService {
    uploads_path: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadService {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            uploads_path: PathBuf::from(&config.general.uploads_path),
            allowed_extensions: config.catalog.allowed_image_extensions.clone(),
        }
    }

    #[must_use]
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.uploads_path.join(filename)
    }

    /// Extract and validate the extension of an uploaded file's original name.
    fn validated_extension(&self, original_name: &str) -> Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self.allowed_extensions.contains(&extension) {
            anyhow::bail!(
                "Only image files are allowed ({})",
                self.allowed_extensions.join(", ")
            );
        }

        Ok(extension)
    }

    #[must_use]
    pub fn generate_filename(&self, extension: &str) -> String {
        use rand::Rng;

        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        format!("{millis}-{suffix}.{extension}")
    }

    /// Write the uploaded bytes to disk under a generated name and return
    /// the stored filename.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let extension = self.validated_extension(original_name)?;
        let filename = self.generate_filename(&extension);

        if !self.uploads_path.exists() {
            fs::create_dir_all(&self.uploads_path).await?;
        }

        let file_path = self.uploads_path.join(&filename);
        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", file_path.display()))?;

        info!(
            filename = %filename,
            size = bytes.len(),
            "Stored uploaded image"
        );
        Ok(filename)
    }

    /// Best-effort removal of a stored file. Rows are deleted even when the
    /// file is already gone, so a missing file only logs a warning.
    pub async fn delete(&self, filename: &str) {
        // Stored names never contain separators; reject anything that does.
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            warn!(filename = %filename, "Refusing to delete suspicious filename");
            return;
        }

        let file_path = self.uploads_path.join(filename);
        if !file_path.exists() {
            return;
        }

        if let Err(e) = fs::remove_file(&file_path).await {
            warn!(
                path = %file_path.display(),
                "Failed to delete upload: {e}"
            );
        }
    }

    pub async fn delete_all<I, S>(&self, filenames: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for filename in filenames {
            self.delete(filename.as_ref()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service_in(dir: &Path) -> UploadService {
        let mut config = Config::default();
        config.general.uploads_path = dir.to_string_lossy().to_string();
        UploadService::new(&config)
    }

    #[tokio::test]
    async fn save_stores_file_with_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let filename = service.save("photo.JPG", b"fake-bytes").await.unwrap();

        assert!(filename.ends_with(".jpg"));
        assert!(dir.path().join(&filename).exists());
    }

    #[tokio::test]
    async fn save_rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        assert!(service.save("payload.exe", b"nope").await.is_err());
        assert!(service.save("no_extension", b"nope").await.is_err());
    }

    #[tokio::test]
    async fn delete_removes_file_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let filename = service.save("a.png", b"x").await.unwrap();
        service.delete(&filename).await;
        assert!(!dir.path().join(&filename).exists());

        // Missing file is not an error
        service.delete("1234-5678.png").await;
    }

    #[tokio::test]
    async fn delete_refuses_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let outside = dir.path().parent().unwrap().join("victim.png");
        std::fs::write(&outside, b"keep me").unwrap();

        service.delete("../victim.png").await;
        assert!(outside.exists());
        std::fs::remove_file(outside).unwrap();
    }

    #[test]
    fn generated_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());

        let a = service.generate_filename("png");
        let b = service.generate_filename("png");
        assert_ne!(a, b);
    }
}
