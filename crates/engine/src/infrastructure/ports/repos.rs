//! Repository port for collection persistence.

use async_trait::async_trait;
use collection_rw_domain::{CollectionId, ContentCollection};

use super::error::StoreError;

/// CRUD over the collections of a single kind.
///
/// Implementations are bound to their kind at construction; no method takes
/// a kind argument.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepo: Send + Sync {
    /// Register the uniqueness constraints for this kind. Startup-fatal on failure.
    async fn initialise(&self) -> Result<(), StoreError>;

    /// Store connectivity, for health checks.
    async fn check(&self) -> Result<(), StoreError>;

    /// `Ok(None)` means the collection does not exist; it is not an error.
    async fn read(&self, id: &CollectionId) -> Result<Option<ContentCollection>, StoreError>;

    /// Create or fully replace the collection, items included, in one batch.
    async fn write(&self, collection: &ContentCollection) -> Result<(), StoreError>;

    /// `Ok(true)` only when the node was actually removed.
    async fn delete(&self, id: &CollectionId) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
