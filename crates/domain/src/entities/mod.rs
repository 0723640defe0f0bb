//! Domain entities - Core business objects with identity

mod content_collection;

pub use content_collection::{ContentCollection, ItemRef, LastModified};
