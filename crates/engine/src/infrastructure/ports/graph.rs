//! Graph store port - batches of parametrised statements.
//!
//! The collection store builds Cypher text and parameters; an adapter runs
//! them. Statements declare the columns they return so that adapters decode
//! rows by name and type, and mocks can hand back plain [`Record`]s.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::StoreError;

// =============================================================================
// Statements
// =============================================================================

/// Parameter value bound into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    StringList(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

/// Expected type of a returned column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Integer,
    StringList,
    /// Either shape; integers win when the value is numeric.
    StringOrInteger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// One templated query with its named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub cypher: String,
    pub params: BTreeMap<String, ParamValue>,
    pub columns: Vec<Column>,
    /// Ask the store for mutation counters after this statement runs.
    pub include_stats: bool,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: BTreeMap::new(),
            columns: Vec::new(),
            include_stats: false,
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn column(mut self, name: &str, kind: ColumnKind) -> Self {
        self.columns.push(Column {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn with_stats(mut self) -> Self {
        self.include_stats = true;
        self
    }

    pub fn returns_rows(&self) -> bool {
        !self.columns.is_empty()
    }
}

// =============================================================================
// Results
// =============================================================================

/// Value read out of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphValue {
    Null,
    String(String),
    Integer(i64),
    StringList(Vec<String>),
}

/// One result row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, GraphValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: GraphValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: GraphValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&GraphValue> {
        self.values.get(name)
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(GraphValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(GraphValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_string_list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(GraphValue::StringList(values)) => Some(values),
            _ => None,
        }
    }
}

/// Counters reported for a statement that asked for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub labels_added: u64,
    pub labels_removed: u64,
}

impl MutationStats {
    /// Column names used when counters travel as result columns.
    pub const FIELDS: [&'static str; 6] = [
        "nodes_created",
        "nodes_deleted",
        "relationships_created",
        "relationships_deleted",
        "labels_added",
        "labels_removed",
    ];

    pub fn set(&mut self, field: &str, value: u64) {
        match field {
            "nodes_created" => self.nodes_created = value,
            "nodes_deleted" => self.nodes_deleted = value,
            "relationships_created" => self.relationships_created = value,
            "relationships_deleted" => self.relationships_deleted = value,
            "labels_added" => self.labels_added = value,
            "labels_removed" => self.labels_removed = value,
            _ => {}
        }
    }
}

/// Outcome of one statement in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementResult {
    pub records: Vec<Record>,
    /// Present only when the statement asked for stats.
    pub stats: Option<MutationStats>,
}

impl StatementResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            stats: None,
        }
    }

    pub fn with_stats(stats: MutationStats) -> Self {
        Self {
            records: Vec::new(),
            stats: Some(stats),
        }
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }
}

// =============================================================================
// Port
// =============================================================================

/// Executes statement batches against a property graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run `statements` as one unit. Returns one result per statement, in
    /// order. Any failure fails the whole batch and no results are returned.
    async fn execute_batch(
        &self,
        statements: Vec<Statement>,
    ) -> Result<Vec<StatementResult>, StoreError>;

    /// Declare a uniqueness constraint on `property` for nodes labelled `label`.
    async fn ensure_constraint(&self, label: &str, property: &str) -> Result<(), StoreError>;

    /// Connectivity check for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
