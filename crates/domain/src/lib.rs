//! Content collection domain.
//!
//! Pure types shared by the engine: identifiers, the collection entity, the
//! kind registry and the JSON wire codec. Nothing here talks to a database.

pub mod codec;
pub mod entities;
pub mod error;
pub mod ids;
pub mod kinds;

pub use codec::{decode_json, encode_json};
pub use entities::{ContentCollection, ItemRef, LastModified};
pub use error::{CodecError, KindRegistryError};
pub use ids::{CollectionId, ItemId};
pub use kinds::{CollectionKind, KindRegistry, COLLECTION_LABEL, THING_LABEL};
