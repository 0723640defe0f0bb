//! Mapping between [`ContentCollection`] and its graph shape.
//!
//! A collection is a node carrying `uuid`, `publishReference` and
//! `lastModified`, plus one ordering edge per item with a 1-based `order`.

use collection_rw_domain::{CollectionId, ContentCollection, ItemRef, LastModified};

use crate::infrastructure::ports::{ColumnKind, GraphValue, ParamValue, Record, Statement, StoreError};

pub(super) const UUID: &str = "uuid";
pub(super) const PUBLISH_REFERENCE: &str = "publishReference";
pub(super) const LAST_MODIFIED: &str = "lastModified";
pub(super) const ITEMS: &str = "items";

/// Declare the columns a collection read returns.
pub(super) fn with_collection_columns(statement: Statement) -> Statement {
    statement
        .column(UUID, ColumnKind::String)
        .column(PUBLISH_REFERENCE, ColumnKind::String)
        .column(LAST_MODIFIED, ColumnKind::StringOrInteger)
        .column(ITEMS, ColumnKind::StringList)
}

pub(super) fn last_modified_param(value: &LastModified) -> ParamValue {
    match value {
        LastModified::Epoch(epoch) => ParamValue::Integer(*epoch),
        LastModified::Text(text) => ParamValue::String(text.clone()),
    }
}

pub(super) fn item_ids_param(collection: &ContentCollection) -> ParamValue {
    ParamValue::StringList(collection.item_ids().map(|id| id.to_string()).collect())
}

pub(super) fn collection_from_record(record: &Record) -> Result<ContentCollection, StoreError> {
    let id = record
        .get_string(UUID)
        .ok_or_else(|| StoreError::decode("read", "collection node has no uuid"))?;

    let last_modified = match record.get(LAST_MODIFIED) {
        Some(GraphValue::Integer(epoch)) => LastModified::Epoch(*epoch),
        Some(GraphValue::String(text)) => LastModified::Text(text.clone()),
        _ => LastModified::default(),
    };

    let item_ids = record
        .get_string_list(ITEMS)
        .ok_or_else(|| StoreError::decode("read", "collection row has no item list"))?;

    Ok(ContentCollection {
        id: CollectionId::from(id),
        items: normalize_items(item_ids),
        publish_reference: record.get_string(PUBLISH_REFERENCE).unwrap_or_default().to_string(),
        last_modified,
    })
}

/// A single empty id can only be an aggregation placeholder; empty item ids never decode.
pub(super) fn normalize_items(ids: &[String]) -> Vec<ItemRef> {
    match ids {
        [only] if only.is_empty() => Vec::new(),
        _ => ids.iter().map(|id| ItemRef::new(id.as_str())).collect(),
    }
}
