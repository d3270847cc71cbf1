//! In-memory driver
//!
//! Keeps both documents in process memory. Primary test double for the
//! engine, also usable for ephemeral deployments that rebuild their
//! documentation from scratch on every start.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::openapi::AccumulatedDocument;
use crate::storage::DocumentationDriver;

/// A driver that holds the documents in memory
#[derive(Default)]
pub struct MemoryDriver {
    accumulated: Mutex<AccumulatedDocument>,
    published: Mutex<Option<AccumulatedDocument>>,
}

impl MemoryDriver {
    /// Create a new empty in-memory driver
    pub fn new() -> Self {
        Self::default()
    }

    /// The last published document, if any
    pub async fn published(&self) -> Option<AccumulatedDocument> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl DocumentationDriver for MemoryDriver {
    async fn load(&self) -> Result<AccumulatedDocument> {
        Ok(self.accumulated.lock().await.clone())
    }

    async fn store(&self, document: &AccumulatedDocument) -> Result<()> {
        *self.accumulated.lock().await = document.clone();
        Ok(())
    }

    async fn publish(&self, document: &AccumulatedDocument) -> Result<()> {
        *self.published.lock().await = Some(document.clone());
        Ok(())
    }
}
