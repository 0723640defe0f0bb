//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Graph access (statement batches, constraints, connectivity)
//! - Collection persistence (one repo per collection kind)

mod error;
mod graph;
mod repos;

// =============================================================================
// Graph Store Port
// =============================================================================
pub use graph::{
    Column, ColumnKind, GraphStore, GraphValue, MutationStats, ParamValue, Record, Statement,
    StatementResult,
};

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::CollectionRepo;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use graph::MockGraphStore;

#[cfg(test)]
pub use repos::MockCollectionRepo;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{StoreError, StoreErrorKind};
