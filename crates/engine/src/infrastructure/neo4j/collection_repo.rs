//! Neo4j collection repository implementation.
//!
//! One instance serves one collection kind. Collections are stored as
//! `(:Thing:<labels> {uuid})` nodes with ordered edges to `(:Thing {uuid})`
//! item nodes. Item nodes are shared between collections and never deleted
//! here; only the edges are owned by the collection.

use std::sync::Arc;

use async_trait::async_trait;
use collection_rw_domain::{CollectionId, CollectionKind, ContentCollection, THING_LABEL};

use super::collection_codec::{
    collection_from_record, item_ids_param, last_modified_param, with_collection_columns,
};
use crate::infrastructure::ports::{
    CollectionRepo, ColumnKind, GraphStore, Statement, StatementResult, StoreError,
};

/// Repository for the collections of one kind.
pub struct Neo4jCollectionRepo {
    graph: Arc<dyn GraphStore>,
    kind: CollectionKind,
    labels: String,
}

impl Neo4jCollectionRepo {
    pub fn new(graph: Arc<dyn GraphStore>, kind: CollectionKind) -> Self {
        let labels = label_expr(&kind.labels);
        Self {
            graph,
            kind,
            labels,
        }
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    fn read_statement(&self, id: &CollectionId) -> Statement {
        let cypher = format!(
            "MATCH (n:{labels} {{uuid: $uuid}})
             OPTIONAL MATCH (n)-[rel:`{relation}`]->(t:{thing})
             WITH n, rel, t
             ORDER BY rel.order
             RETURN n.uuid AS uuid,
                    n.publishReference AS publishReference,
                    n.lastModified AS lastModified,
                    collect(t.uuid) AS items",
            labels = self.labels,
            relation = self.kind.relation,
            thing = THING_LABEL,
        );
        with_collection_columns(Statement::new(cypher).param("uuid", id.as_str()))
    }

    /// Statements that replace a collection: clear edges, upsert node, re-link items.
    fn write_statements(&self, collection: &ContentCollection) -> Vec<Statement> {
        let uuid = collection.id.as_str();
        let mut statements = vec![
            self.remove_relationships_statement(uuid, &self.kind.relation),
            Statement::new(format!(
                "MERGE (n:{thing} {{uuid: $uuid}})
                 SET n = {{uuid: $uuid, publishReference: $publishReference, lastModified: $lastModified}}
                 SET n:{labels}",
                thing = THING_LABEL,
                labels = self.labels,
            ))
            .param("uuid", uuid)
            .param("publishReference", collection.publish_reference.as_str())
            .param("lastModified", last_modified_param(&collection.last_modified)),
        ];

        if !collection.is_empty() {
            // Edge order is the 1-based position in the input list.
            statements.push(
                Statement::new(format!(
                    "MATCH (n:{labels} {{uuid: $uuid}})
                     UNWIND range(0, size($itemUuids) - 1) AS idx
                     MERGE (content:{thing} {{uuid: $itemUuids[idx]}})
                     CREATE (n)-[:`{relation}` {{order: idx + 1}}]->(content)",
                    labels = self.labels,
                    thing = THING_LABEL,
                    relation = self.kind.relation,
                ))
                .param("uuid", uuid)
                .param("itemUuids", item_ids_param(collection)),
            );
        }

        statements
    }

    fn delete_statements(&self, id: &CollectionId) -> Vec<Statement> {
        let uuid = id.as_str();
        let mut statements = vec![self.remove_relationships_statement(uuid, &self.kind.relation)];

        if let Some(secondary) = &self.kind.secondary_relation {
            statements.push(self.remove_relationships_statement(uuid, secondary));
        }

        statements.push(
            Statement::new(format!(
                "MATCH (cc:{labels} {{uuid: $uuid}})
                 DELETE cc
                 RETURN count(cc) AS nodes_deleted",
                labels = self.labels,
            ))
            .param("uuid", uuid)
            .with_stats(),
        );

        statements
    }

    fn remove_relationships_statement(&self, uuid: &str, relation: &str) -> Statement {
        Statement::new(format!(
            "MATCH (n:{labels} {{uuid: $uuid}})
             OPTIONAL MATCH (:{thing})<-[rel:`{relation}`]-(n)
             DELETE rel",
            labels = self.labels,
            thing = THING_LABEL,
        ))
        .param("uuid", uuid)
    }

    fn count_statement(&self) -> Statement {
        Statement::new(format!("MATCH (n:{}) RETURN count(n) AS c", self.labels))
            .column("c", ColumnKind::Integer)
    }
}

#[async_trait]
impl CollectionRepo for Neo4jCollectionRepo {
    async fn initialise(&self) -> Result<(), StoreError> {
        for label in &self.kind.labels {
            self.graph.ensure_constraint(label, "uuid").await?;
        }
        Ok(())
    }

    async fn check(&self) -> Result<(), StoreError> {
        self.graph.ping().await
    }

    async fn read(&self, id: &CollectionId) -> Result<Option<ContentCollection>, StoreError> {
        let results = self.graph.execute_batch(vec![self.read_statement(id)]).await?;

        let Some(record) = results.first().and_then(StatementResult::first) else {
            tracing::debug!(kind = %self.kind.name, uuid = %id, "Collection not found");
            return Ok(None);
        };

        collection_from_record(record).map(Some)
    }

    async fn write(&self, collection: &ContentCollection) -> Result<(), StoreError> {
        let statements = self.write_statements(collection);
        tracing::debug!(
            kind = %self.kind.name,
            uuid = %collection.id,
            items = collection.len(),
            statements = statements.len(),
            "Writing collection"
        );

        self.graph.execute_batch(statements).await?;
        Ok(())
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool, StoreError> {
        let results = self.graph.execute_batch(self.delete_statements(id)).await?;

        // Success is read from the counters, never inferred from the absence of an error.
        let stats = results
            .last()
            .and_then(|result| result.stats)
            .ok_or_else(|| StoreError::decode("delete", "node deletion reported no statistics"))?;

        Ok(stats.nodes_deleted > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let results = self.graph.execute_batch(vec![self.count_statement()]).await?;

        let count = results
            .first()
            .and_then(StatementResult::first)
            .and_then(|record| record.get_integer("c"))
            .ok_or_else(|| StoreError::decode("count", "count query returned no value"))?;

        Ok(count.max(0) as u64)
    }
}

/// `:`-joined, backtick-quoted label expression, e.g. `` `A`:`B` ``.
fn label_expr(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("`{label}`"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        GraphValue, MockGraphStore, MutationStats, ParamValue, Record,
    };
    use collection_rw_domain::LastModified;

    fn repo(graph: MockGraphStore, kind: CollectionKind) -> Neo4jCollectionRepo {
        Neo4jCollectionRepo::new(Arc::new(graph), kind)
    }

    fn collection_row(uuid: &str, items: &[&str]) -> Record {
        Record::new()
            .with("uuid", GraphValue::String(uuid.into()))
            .with("publishReference", GraphValue::String("tid_test".into()))
            .with("lastModified", GraphValue::String("2016-08-25T06:06:23.532Z".into()))
            .with(
                "items",
                GraphValue::StringList(items.iter().map(|s| s.to_string()).collect()),
            )
    }

    fn deleted(nodes: u64) -> StatementResult {
        StatementResult::with_stats(MutationStats {
            nodes_deleted: nodes,
            ..MutationStats::default()
        })
    }

    #[test]
    fn labels_are_quoted_and_joined() {
        let repo = repo(MockGraphStore::new(), CollectionKind::story_package());
        assert_eq!(repo.labels, "`ContentCollection`:`StoryPackage`");
    }

    #[tokio::test]
    async fn read_missing_collection_is_none_not_error() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_execute_batch()
            .times(1)
            .returning(|_| Ok(vec![StatementResult::with_records(Vec::new())]));

        let result = repo(graph, CollectionKind::story_package())
            .read(&CollectionId::from("unknown"))
            .await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn read_orders_by_edge_order_before_collecting() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().times(1).returning(|statements| {
            assert_eq!(statements.len(), 1);
            let cypher = &statements[0].cypher;
            assert!(cypher.contains("MATCH (n:`ContentCollection`:`StoryPackage` {uuid: $uuid})"));
            assert!(cypher.contains("[rel:`SELECTS`]"));
            let order_at = cypher.find("ORDER BY rel.order").expect("ordered");
            let collect_at = cypher.find("collect(").expect("collected");
            assert!(order_at < collect_at);
            // Nulls from a missing edge are skipped, so no placeholder id is produced.
            assert!(cypher.contains("collect(t.uuid) AS items"));
            assert!(!cypher.contains("coalesce"));
            assert_eq!(
                statements[0].params.get("uuid"),
                Some(&ParamValue::String("sp-1".into()))
            );
            Ok(vec![StatementResult::with_records(vec![collection_row(
                "sp-1",
                &["item2", "item1", "item3"],
            )])])
        });

        let collection = repo(graph, CollectionKind::story_package())
            .read(&CollectionId::from("sp-1"))
            .await
            .expect("read")
            .expect("found");

        let ids: Vec<&str> = collection.item_ids().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["item2", "item1", "item3"]);
        assert_eq!(collection.publish_reference, "tid_test");
    }

    #[tokio::test]
    async fn read_without_edges_returns_empty_items() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_execute_batch()
            .returning(|_| Ok(vec![StatementResult::with_records(vec![collection_row("sp-1", &[""])])]));

        let collection = repo(graph, CollectionKind::story_package())
            .read(&CollectionId::from("sp-1"))
            .await
            .expect("read")
            .expect("found");

        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn read_failure_is_an_error() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_execute_batch()
            .returning(|_| Err(StoreError::unavailable("execute", "connection refused")));

        let result = repo(graph, CollectionKind::content_package())
            .read(&CollectionId::from("cp-1"))
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn write_clears_edges_then_upserts_then_links_in_one_batch() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().times(1).returning(|statements| {
            assert_eq!(statements.len(), 3);

            assert!(statements[0].cypher.contains("[rel:`SELECTS`]"));
            assert!(statements[0].cypher.contains("DELETE rel"));

            assert!(statements[1].cypher.contains("MERGE (n:Thing {uuid: $uuid})"));
            assert!(statements[1].cypher.contains("SET n = {uuid: $uuid"));
            assert!(statements[1].cypher.contains("SET n:`ContentCollection`:`StoryPackage`"));
            assert_eq!(
                statements[1].params.get("lastModified"),
                Some(&ParamValue::Integer(1472105183532))
            );

            assert!(statements[2].cypher.contains("order: idx + 1"));
            assert_eq!(
                statements[2].params.get("itemUuids"),
                Some(&ParamValue::StringList(vec![
                    "item1".into(),
                    "item2".into(),
                    "item3".into()
                ]))
            );
            Ok(vec![StatementResult::empty(); 3])
        });

        let collection = ContentCollection::new("sp-1", "tid_test", LastModified::Epoch(1472105183532))
            .with_items(["item1", "item2", "item3"]);

        repo(graph, CollectionKind::story_package())
            .write(&collection)
            .await
            .expect("write");
    }

    #[tokio::test]
    async fn write_without_items_only_clears_and_upserts() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().times(1).returning(|statements| {
            assert_eq!(statements.len(), 2);
            Ok(vec![StatementResult::empty(); 2])
        });

        let collection = ContentCollection::new("cp-1", "tid_test", "2020-01-01T00:00:00Z".into());

        repo(graph, CollectionKind::content_package())
            .write(&collection)
            .await
            .expect("write");
    }

    #[tokio::test]
    async fn write_returns_store_error_unchanged() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().returning(|_| {
            Err(StoreError::conflict("commit", "Neo.ClientError.Schema.ConstraintValidationFailed"))
        });

        let collection = ContentCollection::new("cp-1", "tid", LastModified::Epoch(1));
        let err = repo(graph, CollectionKind::content_package())
            .write(&collection)
            .await
            .expect_err("conflict");

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn delete_clears_secondary_relation_when_configured() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().times(1).returning(|statements| {
            assert_eq!(statements.len(), 3);
            assert!(statements[0].cypher.contains("`SELECTS`"));
            assert!(statements[1].cypher.contains("`IS_CURATED_FOR`"));
            assert!(statements[2].cypher.contains("DELETE cc"));
            assert!(statements[2].include_stats);
            assert!(!statements[0].include_stats);
            Ok(vec![StatementResult::empty(), StatementResult::empty(), deleted(1)])
        });

        let deleted = repo(graph, CollectionKind::story_package())
            .delete(&CollectionId::from("sp-1"))
            .await
            .expect("delete");

        assert!(deleted);
    }

    #[tokio::test]
    async fn delete_without_secondary_relation_skips_that_statement() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().times(1).returning(|statements| {
            assert_eq!(statements.len(), 2);
            assert!(statements[0].cypher.contains("`CONTAINS`"));
            Ok(vec![StatementResult::empty(), deleted(1)])
        });

        assert!(repo(graph, CollectionKind::content_package())
            .delete(&CollectionId::from("cp-1"))
            .await
            .expect("delete"));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_false_without_error() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_execute_batch()
            .returning(|_| Ok(vec![StatementResult::empty(), deleted(0)]));

        let result = repo(graph, CollectionKind::content_package())
            .delete(&CollectionId::from("missing"))
            .await;

        assert!(matches!(result, Ok(false)));
    }

    #[tokio::test]
    async fn delete_blocked_by_remaining_relationships_is_an_error() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().returning(|_| {
            Err(StoreError::conflict(
                "commit",
                "Neo.ClientError.Schema.ConstraintValidationFailed: still has relationships",
            ))
        });

        let result = repo(graph, CollectionKind::content_package())
            .delete(&CollectionId::from("cp-1"))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn delete_without_stats_is_an_error_not_false() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_execute_batch()
            .returning(|_| Ok(vec![StatementResult::empty(), StatementResult::empty()]));

        let result = repo(graph, CollectionKind::content_package())
            .delete(&CollectionId::from("cp-1"))
            .await;

        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }

    #[tokio::test]
    async fn count_reads_the_aggregate() {
        let mut graph = MockGraphStore::new();
        graph.expect_execute_batch().returning(|statements| {
            assert_eq!(
                statements[0].cypher,
                "MATCH (n:`ContentCollection`:`ContentPackage`) RETURN count(n) AS c"
            );
            Ok(vec![StatementResult::with_records(vec![
                Record::new().with("c", GraphValue::Integer(12)),
            ])])
        });

        let count = repo(graph, CollectionKind::content_package())
            .count()
            .await
            .expect("count");

        assert_eq!(count, 12);
    }

    #[tokio::test]
    async fn initialise_constrains_uuid_for_every_label() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_ensure_constraint()
            .withf(|label, property| label.to_string() == "ContentCollection" && property.to_string() == "uuid")
            .times(1)
            .returning(|_, _| Ok(()));
        graph
            .expect_ensure_constraint()
            .withf(|label, property| label.to_string() == "StoryPackage" && property.to_string() == "uuid")
            .times(1)
            .returning(|_, _| Ok(()));

        repo(graph, CollectionKind::story_package())
            .initialise()
            .await
            .expect("initialise");
    }

    #[tokio::test]
    async fn initialise_stops_on_first_failure() {
        let mut graph = MockGraphStore::new();
        graph
            .expect_ensure_constraint()
            .times(1)
            .returning(|_, _| Err(StoreError::unavailable("ensure_constraint", "no auth")));

        let result = repo(graph, CollectionKind::story_package()).initialise().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn check_delegates_to_ping() {
        let mut graph = MockGraphStore::new();
        graph.expect_ping().times(1).returning(|| Ok(()));

        repo(graph, CollectionKind::content_package())
            .check()
            .await
            .expect("ping");
    }
}
