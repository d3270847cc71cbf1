//! Local file system driver
//!
//! Persists the accumulated document and the published production document
//! as JSON files on the local file system. Parent directories are created
//! lazily on first write.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::config::LocalDriverSettings;
use crate::errors::Result;
use crate::openapi::AccumulatedDocument;
use crate::storage::DocumentationDriver;

/// A driver that stores both documents as local JSON files
pub struct LocalDriver {
    settings: LocalDriverSettings,
}

impl LocalDriver {
    /// Create a new local file driver
    pub fn new(settings: LocalDriverSettings) -> Self {
        Self { settings }
    }

    async fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn write_document(path: &Path, document: &AccumulatedDocument) -> Result<()> {
        Self::ensure_parent_dir(path).await?;
        let payload = serde_json::to_string_pretty(document)?;
        fs::write(path, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentationDriver for LocalDriver {
    async fn load(&self) -> Result<AccumulatedDocument> {
        let path = &self.settings.accumulated_path;

        if !fs::try_exists(path).await.unwrap_or(false) {
            debug!(path = %path.display(), "No accumulated document yet, starting empty");
            return Ok(AccumulatedDocument::default());
        }

        let payload = fs::read_to_string(path).await?;
        let document = serde_json::from_str(&payload)?;
        Ok(document)
    }

    async fn store(&self, document: &AccumulatedDocument) -> Result<()> {
        Self::write_document(&self.settings.accumulated_path, document).await
    }

    async fn publish(&self, document: &AccumulatedDocument) -> Result<()> {
        Self::write_document(&self.settings.production_path, document).await?;
        debug!(
            path = %self.settings.production_path.display(),
            "Published documentation"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn driver_in(dir: &Path) -> LocalDriver {
        LocalDriver::new(LocalDriverSettings {
            accumulated_path: dir.join("nested/temp_documentation.json"),
            production_path: dir.join("documentation.json"),
        })
    }

    #[tokio::test]
    async fn test_load_without_file_yields_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let driver = driver_in(dir.path());

        let document = driver.load().await.unwrap();
        assert!(document.paths.is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let driver = driver_in(dir.path());

        let mut document = AccumulatedDocument::default();
        document.operation_mut("/users/{id}", &Method::GET);

        driver.store(&document).await.unwrap();
        let reloaded = driver.load().await.unwrap();
        assert_eq!(document, reloaded);
    }

    #[tokio::test]
    async fn test_publish_writes_production_path() {
        let dir = tempfile::tempdir().unwrap();
        let driver = driver_in(dir.path());

        let mut document = AccumulatedDocument::default();
        document.operation_mut("/users", &Method::POST);

        driver.publish(&document).await.unwrap();

        let payload = fs::read_to_string(dir.path().join("documentation.json")).await.unwrap();
        let published: AccumulatedDocument = serde_json::from_str(&payload).unwrap();
        assert_eq!(document, published);
    }
}
