//! Column metadata lookups.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

impl From<(String, String)> for Column {
    fn from((name, data_type): (String, String)) -> Self {
        Self { name, data_type }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Ordered columns of one table.
pub type ColumnDescription = Vec<Column>;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Lookup failed for {table}: {message}")]
    Lookup { table: String, message: String },
}

/// Source of column metadata, typically backed by a live schema catalog.
pub trait MetadataResolver {
    fn describe(&self, table: &str) -> Result<ColumnDescription, ResolveError>;
}

impl<F> MetadataResolver for F
where
    F: Fn(&str) -> Result<ColumnDescription, ResolveError>,
{
    fn describe(&self, table: &str) -> Result<ColumnDescription, ResolveError> {
        self(table)
    }
}

/// In-memory catalog, loadable from `{"TABLE": [["column", "TYPE"], ...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: HashMap<String, ColumnDescription>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn insert(&mut self, table: impl Into<String>, columns: ColumnDescription) {
        self.tables.insert(table.into(), columns);
    }

    pub fn with_table(mut self, table: impl Into<String>, columns: &[(&str, &str)]) -> Self {
        self.insert(
            table,
            columns.iter().map(|(n, t)| Column::new(*n, *t)).collect(),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl MetadataResolver for Catalog {
    fn describe(&self, table: &str) -> Result<ColumnDescription, ResolveError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownTable(table.to_string()))
    }
}
