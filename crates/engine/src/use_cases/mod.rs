//! Use cases - orchestration between transports and repositories.

pub mod collection;

pub use collection::{CollectionError, CollectionService, ErrorKind};
