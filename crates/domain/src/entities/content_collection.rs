//! Content collection entity - an ordered list of content references
//!
//! A collection owns only its ordering. The items it points at are shared
//! with any number of other collections and outlive every one of them.
//!
//! # Neo4j Relationships
//! - `(ContentCollection)-[:<kind relation> {order}]->(Thing)` - ordered item edge
//! - `(ContentCollection)-[:<secondary relation>]->(Thing)` - cleared on delete only

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{CollectionId, ItemId};

/// A named, ordered list of content references plus provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCollection {
    #[serde(rename = "uuid")]
    pub id: CollectionId,

    /// Order is significant and round-trips exactly.
    #[serde(default)]
    pub items: Vec<ItemRef>,

    /// Reference of the publish operation that produced this version
    pub publish_reference: String,

    pub last_modified: LastModified,
}

impl ContentCollection {
    pub fn new(
        id: impl Into<CollectionId>,
        publish_reference: impl Into<String>,
        last_modified: LastModified,
    ) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            publish_reference: publish_reference.into(),
            last_modified,
        }
    }

    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.items = items.into_iter().map(ItemRef::new).collect();
        self
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pointer to externally-owned content. Carries nothing but the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(rename = "uuid")]
    pub id: ItemId,
}

impl ItemRef {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into() }
    }
}

/// Last-modified marker, passed through untouched.
///
/// Story packages have historically sent epoch integers while other
/// collections send RFC 3339 strings; whichever shape arrives is stored
/// and returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LastModified {
    Epoch(i64),
    Text(String),
}

impl Default for LastModified {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for LastModified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epoch(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for LastModified {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LastModified {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for LastModified {
    fn from(value: i64) -> Self {
        Self::Epoch(value)
    }
}
