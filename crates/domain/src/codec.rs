//! JSON wire codec for content collections.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "uuid": "sp-1",
//!   "items": [{"uuid": "item1"}, {"uuid": "item2"}],
//!   "publishReference": "tid_abc",
//!   "lastModified": "2016-08-25T06:06:23.532Z"
//! }
//! ```
//!
//! `items` may be omitted on input and is always emitted on output.

use std::io::Read;

use crate::entities::ContentCollection;
use crate::error::CodecError;
use crate::ids::CollectionId;

/// Decode one collection from `reader`.
///
/// The returned id is the one carried by the payload itself so callers can
/// check it against an id they were given out of band (e.g. a URL path).
pub fn decode_json<R: Read>(reader: R) -> Result<(ContentCollection, CollectionId), CodecError> {
    let collection: ContentCollection =
        serde_json::from_reader(reader).map_err(CodecError::decode)?;
    if let Some(position) = collection.item_ids().position(|id| id.is_empty()) {
        return Err(CodecError::decode(format!("item {position} has an empty uuid")));
    }
    let id = collection.id.clone();
    Ok((collection, id))
}

pub fn encode_json(collection: &ContentCollection) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(collection).map_err(CodecError::encode)
}
