//! # Storage Drivers
//!
//! Pluggable persistence for the accumulated and published documents. The
//! engine depends only on the [`DocumentationDriver`] contract, never on a
//! concrete backend; drivers are selected by identifier once, at
//! construction. Retry logic for flaky backends belongs to the driver, not
//! the engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DocumentationSettings;
use crate::errors::{Error, Result};
use crate::openapi::AccumulatedDocument;

pub mod local;
pub mod memory;

pub use local::LocalDriver;
pub use memory::MemoryDriver;

/// Persistence contract for the accumulated documentation
///
/// `load` and `store` move the working document in and out of the backend
/// between exchanges; `publish` compiles/copies it to the production-read
/// location served to consumers. I/O failures propagate to the caller
/// unmodified.
#[async_trait]
pub trait DocumentationDriver: Send + Sync {
    /// Load the current accumulated document
    ///
    /// A backend with no stored document yet yields an empty one.
    async fn load(&self) -> Result<AccumulatedDocument>;

    /// Persist the accumulated working document
    async fn store(&self, document: &AccumulatedDocument) -> Result<()>;

    /// Publish the compiled document to the production-read location
    async fn publish(&self, document: &AccumulatedDocument) -> Result<()>;
}

/// Resolve the configured driver identifier into a concrete driver
///
/// Unknown identifiers fail here, at construction time, with
/// [`Error::UnknownDriver`].
pub fn driver_from_settings(
    settings: &DocumentationSettings,
) -> Result<Arc<dyn DocumentationDriver>> {
    match settings.driver.as_str() {
        "local" => Ok(Arc::new(LocalDriver::new(settings.local.clone()))),
        "memory" => Ok(Arc::new(MemoryDriver::new())),
        other => Err(Error::unknown_driver(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_drivers_resolve() {
        let mut settings = DocumentationSettings::default();
        settings.driver = "local".to_string();
        assert!(driver_from_settings(&settings).is_ok());

        settings.driver = "memory".to_string();
        assert!(driver_from_settings(&settings).is_ok());
    }

    #[test]
    fn test_unknown_driver_fails_at_construction() {
        let settings = DocumentationSettings {
            driver: "cloud-bucket".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            driver_from_settings(&settings),
            Err(Error::UnknownDriver(name)) if name == "cloud-bucket"
        ));
    }
}
