//! Neo4j graph wrapper implementing the [`GraphStore`] port.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use neo4rs::{query, Graph, Query, Row, Txn};

use crate::infrastructure::ports::{
    Column, ColumnKind, GraphStore, GraphValue, MutationStats, ParamValue, Record, Statement,
    StatementResult, StoreError,
};

/// Server error codes in this family are schema violations: duplicate keys,
/// or deleting a node that still has relationships.
const SCHEMA_ERROR_PREFIX: &str = "Neo.ClientError.Schema.";

/// Concrete wrapper around `neo4rs::Graph`.
///
/// Every batch runs inside one explicit transaction bounded by `query_timeout`.
#[derive(Clone)]
pub struct Neo4jGraph {
    inner: Graph,
    query_timeout: Duration,
}

impl Neo4jGraph {
    pub fn new(graph: Graph, query_timeout: Duration) -> Self {
        Self {
            inner: graph,
            query_timeout,
        }
    }

    pub async fn connect(
        uri: &str,
        user: &str,
        password: &str,
        query_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| classify("connect", e))?;
        Ok(Self::new(graph, query_timeout))
    }

    async fn run_batch(&self, statements: Vec<Statement>) -> Result<Vec<StatementResult>, StoreError> {
        let mut txn = self
            .inner
            .start_txn()
            .await
            .map_err(|e| classify("start_txn", e))?;

        let mut results = Vec::with_capacity(statements.len());
        for statement in &statements {
            match run_statement(&mut txn, statement).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    if let Err(rollback) = txn.rollback().await {
                        tracing::debug!(error = %rollback, "Rollback after failed statement also failed");
                    }
                    return Err(e);
                }
            }
        }

        txn.commit().await.map_err(|e| classify("commit", e))?;
        Ok(results)
    }
}

#[async_trait]
impl GraphStore for Neo4jGraph {
    async fn execute_batch(
        &self,
        statements: Vec<Statement>,
    ) -> Result<Vec<StatementResult>, StoreError> {
        let count = statements.len();
        let start = Instant::now();

        // Dropping the transaction on timeout leaves it uncommitted.
        let result = tokio::time::timeout(self.query_timeout, self.run_batch(statements))
            .await
            .map_err(|_| StoreError::timeout("execute_batch", self.query_timeout))?;

        tracing::debug!(
            statements = count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Executed Neo4j batch"
        );
        result
    }

    async fn ensure_constraint(&self, label: &str, property: &str) -> Result<(), StoreError> {
        let name = format!("{}_{}_unique", label.to_lowercase(), property.to_lowercase());
        let cypher = format!(
            "CREATE CONSTRAINT {name} IF NOT EXISTS
             FOR (n:`{label}`) REQUIRE n.`{property}` IS UNIQUE"
        );

        self.inner
            .run(query(&cypher))
            .await
            .map_err(|e| classify("ensure_constraint", e))?;

        tracing::info!(label, property, constraint = %name, "Neo4j uniqueness constraint ensured");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        tokio::time::timeout(self.query_timeout, self.inner.run(query("RETURN 1")))
            .await
            .map_err(|_| StoreError::timeout("ping", self.query_timeout))?
            .map_err(|e| classify("ping", e))
    }
}

async fn run_statement(txn: &mut Txn, statement: &Statement) -> Result<StatementResult, StoreError> {
    let q = to_query(statement);

    if !statement.returns_rows() && !statement.include_stats {
        txn.run(q).await.map_err(|e| classify("run", e))?;
        return Ok(StatementResult::empty());
    }

    let mut stream = txn.execute(q).await.map_err(|e| classify("execute", e))?;

    let mut records = Vec::new();
    let mut stats = statement.include_stats.then(MutationStats::default);
    while let Some(row) = stream
        .next(txn.handle())
        .await
        .map_err(|e| classify("fetch_row", e))?
    {
        if let Some(stats) = stats.as_mut() {
            fold_stats(&row, stats);
        }
        if statement.returns_rows() {
            records.push(decode_row(&row, &statement.columns)?);
        }
    }

    Ok(StatementResult { records, stats })
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(query(&statement.cypher), |q, (name, value)| match value {
            ParamValue::String(value) => q.param(name, value.clone()),
            ParamValue::Integer(value) => q.param(name, *value),
            ParamValue::StringList(values) => q.param(name, values.clone()),
        })
}

/// Bolt does not hand back server counters through the driver, so statements
/// that want stats project them as integer columns named after the fields.
fn fold_stats(row: &Row, stats: &mut MutationStats) {
    for field in MutationStats::FIELDS {
        if let Ok(value) = row.get::<i64>(field) {
            stats.set(field, value.max(0) as u64);
        }
    }
}

fn decode_row(row: &Row, columns: &[Column]) -> Result<Record, StoreError> {
    let mut record = Record::new();
    for column in columns {
        let name = column.name.as_str();
        let value = match column.kind {
            ColumnKind::String => row
                .get::<String>(name)
                .map(GraphValue::String)
                .unwrap_or(GraphValue::Null),
            ColumnKind::Integer => row
                .get::<i64>(name)
                .map(GraphValue::Integer)
                .unwrap_or(GraphValue::Null),
            ColumnKind::StringList => row
                .get::<Vec<String>>(name)
                .map(GraphValue::StringList)
                .map_err(|e| StoreError::decode("fetch_row", format!("column {name}: {e}")))?,
            ColumnKind::StringOrInteger => row
                .get::<i64>(name)
                .map(GraphValue::Integer)
                .or_else(|_| row.get::<String>(name).map(GraphValue::String))
                .unwrap_or(GraphValue::Null),
        };
        record.insert(name, value);
    }
    Ok(record)
}

fn classify(operation: &'static str, error: neo4rs::Error) -> StoreError {
    match &error {
        neo4rs::Error::Neo4j(inner) if inner.code().starts_with(SCHEMA_ERROR_PREFIX) => {
            StoreError::conflict(operation, format!("{}: {}", inner.code(), inner.message()))
        }
        _ => StoreError::unavailable(operation, error),
    }
}
