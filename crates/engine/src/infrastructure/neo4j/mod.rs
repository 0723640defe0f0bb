//! Neo4j database implementations.

use std::sync::Arc;

use collection_rw_domain::KindRegistry;

use crate::infrastructure::ports::GraphStore;

mod collection_codec;
mod collection_repo;
mod graph;


pub use collection_repo::Neo4jCollectionRepo;
pub use graph::Neo4jGraph;

/// Create one collection repository per registered kind, sharing one graph.
pub fn collection_repos(
    graph: Arc<dyn GraphStore>,
    registry: &KindRegistry,
) -> Vec<Arc<Neo4jCollectionRepo>> {
    registry
        .iter()
        .map(|kind| Arc::new(Neo4jCollectionRepo::new(graph.clone(), kind.clone())))
        .collect()
}
