//! Integration test support against a real Neo4j.
//!
//! # Running
//!
//! ```bash
//! # Requires Docker
//! cargo test -p collection-rw-engine --lib -- --ignored --test-threads=1
//! ```

mod neo4j_test_harness;

pub use neo4j_test_harness::*;
