//! Application state and composition.

use std::collections::HashMap;
use std::sync::Arc;

use collection_rw_domain::KindRegistry;

use crate::infrastructure::{neo4j, ports::GraphStore};
use crate::use_cases::{CollectionError, CollectionService};

/// Main application state.
///
/// Holds the kind registry and one collection service per registered kind.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub registry: KindRegistry,
    collections: HashMap<String, Arc<CollectionService>>,
    pub env: String,
}

impl App {
    /// Services are keyed by the name of the kind they serve. A kind in
    /// `registry` with no service is routed as unknown.
    pub fn new(
        registry: KindRegistry,
        collections: Vec<CollectionService>,
        env: impl Into<String>,
    ) -> Self {
        let collections = collections
            .into_iter()
            .map(|service| (service.kind().name.clone(), Arc::new(service)))
            .collect();
        Self {
            registry,
            collections,
            env: env.into(),
        }
    }

    /// Wire a Neo4j-backed service for every kind in `registry`.
    pub fn with_graph(
        graph: Arc<dyn GraphStore>,
        registry: KindRegistry,
        env: impl Into<String>,
    ) -> Self {
        let collections = neo4j::collection_repos(graph, &registry)
            .into_iter()
            .map(|repo| CollectionService::new(repo.kind().clone(), repo))
            .collect();
        Self::new(registry, collections, env)
    }

    /// Service mounted under the given URL segment.
    pub fn collection(&self, path: &str) -> Option<&Arc<CollectionService>> {
        self.registry
            .by_path(path)
            .and_then(|kind| self.collections.get(&kind.name))
    }

    /// Services in registration order.
    pub fn services(&self) -> impl Iterator<Item = &Arc<CollectionService>> {
        self.registry
            .iter()
            .filter_map(|kind| self.collections.get(&kind.name))
    }

    /// Register constraints for every kind. Stops at the first failure.
    pub async fn initialise(&self) -> Result<(), CollectionError> {
        for service in self.services() {
            service.initialise().await?;
            tracing::info!(kind = %service.kind().name, "Collection kind initialised");
        }
        Ok(())
    }
}
