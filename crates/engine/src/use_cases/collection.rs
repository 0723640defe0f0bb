//! Collection CRUD bound to one collection kind.
//!
//! Keeps HTTP handlers thin: they thread ids and payloads through here and
//! map [`ErrorKind`] to a status code.

use std::io::Read;
use std::sync::Arc;

use collection_rw_domain::{CodecError, CollectionId, CollectionKind, ContentCollection};

use crate::infrastructure::ports::{CollectionRepo, StoreError, StoreErrorKind};

/// Error classification exposed to transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unavailable,
    Timeout,
}

/// Errors for collection use cases.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Invalid payload: {0}")]
    Validation(String),
    #[error(transparent)]
    Conflict(StoreError),
    #[error(transparent)]
    Unavailable(StoreError),
    #[error(transparent)]
    Timeout(StoreError),
}

impl CollectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

impl From<StoreError> for CollectionError {
    fn from(e: StoreError) -> Self {
        match e.kind() {
            StoreErrorKind::Conflict => Self::Conflict(e),
            StoreErrorKind::Timeout => Self::Timeout(e),
            StoreErrorKind::Unavailable | StoreErrorKind::Decode => Self::Unavailable(e),
        }
    }
}

impl From<CodecError> for CollectionError {
    fn from(e: CodecError) -> Self {
        Self::Validation(e.to_string())
    }
}

pub struct CollectionService {
    kind: CollectionKind,
    repo: Arc<dyn CollectionRepo>,
}

impl CollectionService {
    pub fn new(kind: CollectionKind, repo: Arc<dyn CollectionRepo>) -> Self {
        Self { kind, repo }
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub async fn initialise(&self) -> Result<(), CollectionError> {
        Ok(self.repo.initialise().await?)
    }

    pub async fn check(&self) -> Result<(), CollectionError> {
        Ok(self.repo.check().await?)
    }

    pub async fn read(
        &self,
        id: &CollectionId,
    ) -> Result<Option<ContentCollection>, CollectionError> {
        Ok(self.repo.read(id).await?)
    }

    /// Replace the collection at `path_id`.
    ///
    /// The payload's own id must match `path_id`; a mismatch never reaches the store.
    pub async fn write(
        &self,
        path_id: &CollectionId,
        collection: &ContentCollection,
    ) -> Result<(), CollectionError> {
        if &collection.id != path_id {
            return Err(CollectionError::Validation(format!(
                "uuid does not match: '{}' '{}'",
                collection.id, path_id
            )));
        }

        Ok(self.repo.write(collection).await?)
    }

    pub async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionError> {
        Ok(self.repo.delete(id).await?)
    }

    pub async fn count(&self) -> Result<u64, CollectionError> {
        Ok(self.repo.count().await?)
    }

    pub fn decode_json<R: Read>(
        &self,
        reader: R,
    ) -> Result<(ContentCollection, CollectionId), CollectionError> {
        Ok(collection_rw_domain::decode_json(reader)?)
    }
}
