//! Collection kinds and the registry that maps them to graph tags.
//!
//! Every kind shares one persistence model. What differs is the label set
//! on the collection node, the relationship type of its ordering edges and,
//! optionally, one more relationship that has to be cleared before the node
//! can be deleted.

use std::collections::HashSet;

use crate::error::KindRegistryError;

/// Label carried by every collection node, whatever its kind.
pub const COLLECTION_LABEL: &str = "ContentCollection";

/// Label used to upsert collection and item nodes by `uuid`.
pub const THING_LABEL: &str = "Thing";

/// Graph configuration for one logical kind of collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionKind {
    /// Logical name, e.g. `StoryPackage`
    pub name: String,
    /// URL segment the kind is served under, e.g. `story-package`
    pub path: String,
    /// Node labels; the shared collection label comes first
    pub labels: Vec<String>,
    /// Relationship type of the ordering edges
    pub relation: String,
    /// Relationship cleared on delete in addition to the ordering edges
    pub secondary_relation: Option<String>,
}

impl CollectionKind {
    /// Build a kind labelled `ContentCollection:<name>`.
    pub fn new(name: impl Into<String>, path: impl Into<String>, relation: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            labels: vec![COLLECTION_LABEL.to_string(), name.clone()],
            name,
            path: path.into(),
            relation: relation.into(),
            secondary_relation: None,
        }
    }

    pub fn with_secondary_relation(mut self, relation: impl Into<String>) -> Self {
        self.secondary_relation = Some(relation.into());
        self
    }

    pub fn story_package() -> Self {
        Self::new("StoryPackage", "story-package", "SELECTS").with_secondary_relation("IS_CURATED_FOR")
    }

    pub fn content_package() -> Self {
        Self::new("ContentPackage", "content-package", "CONTAINS")
    }
}

/// Immutable set of kinds, built once at startup.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    kinds: Vec<CollectionKind>,
}

impl KindRegistry {
    pub fn new(kinds: Vec<CollectionKind>) -> Result<Self, KindRegistryError> {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        for kind in &kinds {
            if kind.labels.is_empty() {
                return Err(KindRegistryError::NoLabels(kind.name.clone()));
            }
            if !names.insert(kind.name.as_str()) {
                return Err(KindRegistryError::DuplicateName(kind.name.clone()));
            }
            if !paths.insert(kind.path.as_str()) {
                return Err(KindRegistryError::DuplicatePath(kind.path.clone()));
            }
        }
        Ok(Self { kinds })
    }

    /// Story packages and content packages.
    pub fn standard() -> Result<Self, KindRegistryError> {
        Self::new(vec![CollectionKind::story_package(), CollectionKind::content_package()])
    }

    pub fn by_path(&self, path: &str) -> Option<&CollectionKind> {
        self.kinds.iter().find(|kind| kind.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionKind> {
        self.kinds.iter()
    }
}
