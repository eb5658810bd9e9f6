//! Resource store contract
//!
//! The pipeline only ever creates documents. Reads, updates and watches
//! belong to the downstream metering job.

use async_trait::async_trait;
use fabrik_common::{PersistenceError, Result};
use parking_lot::RwLock;
use tracing::debug;

use super::document::UnstructuredDocument;

/// Store accepting schema-less resource documents
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Create a document; fails if one with the same name exists
    async fn create(&self, document: &UnstructuredDocument) -> Result<()>;
}

/// In-process store keeping documents in creation order
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<UnstructuredDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all created documents
    pub fn documents(&self) -> Vec<UnstructuredDocument> {
        self.documents.read().clone()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn create(&self, document: &UnstructuredDocument) -> Result<()> {
        let name = document
            .name()
            .ok_or(PersistenceError::MissingField("metadata.name"))?
            .to_string();

        let mut documents = self.documents.write();
        if documents.iter().any(|existing| existing.name() == Some(name.as_str())) {
            return Err(PersistenceError::AlreadyExists { name }.into());
        }
        documents.push(document.clone());
        debug!(name = %name, total = documents.len(), "Stored document");
        Ok(())
    }
}
