//! Result sets, schema snapshots and SQL dialects

use serde::{Deserialize, Serialize};

/// SQL dialect of the connected database
///
/// Drives schema introspection statements and the dialect named in
/// text-to-SQL prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL / MatrixOne style (`show tables`, `show create table`)
    MySql,

    /// PostgreSQL style (information_schema)
    Postgres,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::MySql
    }
}

impl Dialect {
    /// Human readable name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Postgres => "PostgreSQL",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A fully materialized query result with every cell rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    /// Column names in result order
    pub columns: Vec<String>,

    /// Rows, each with one cell per column
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    /// Create a result set from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Convenience constructor from string slices
    pub fn from_strs(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.to_string()).collect())
                .collect(),
        }
    }

    /// A result set with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cell of the first row
    pub fn first_value(&self) -> Option<&str> {
        self.rows.first().and_then(|r| r.first()).map(|v| v.as_str())
    }

    /// Values of the given column across all rows
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.get(index))
            .map(|v| v.as_str())
            .collect()
    }
}

/// Database name plus creation DDL of every table, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Active database name
    pub database_name: String,

    /// One `CREATE TABLE` statement per table
    pub table_ddl: Vec<String>,
}

impl SchemaSnapshot {
    /// Create a snapshot
    pub fn new(database_name: impl Into<String>, table_ddl: Vec<String>) -> Self {
        Self {
            database_name: database_name.into(),
            table_ddl,
        }
    }

    /// All DDL statements, each followed by a newline
    pub fn schema_text(&self) -> String {
        let mut text = String::new();
        for ddl in &self.table_ddl {
            text.push_str(ddl);
            text.push('\n');
        }
        text
    }

    /// Number of tables captured
    pub fn table_count(&self) -> usize {
        self.table_ddl.len()
    }
}
