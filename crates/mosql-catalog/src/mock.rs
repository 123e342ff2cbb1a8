//! Mock database for testing
//!
//! Returns scripted result sets keyed by the exact SQL text, records every
//! statement it receives, and can be told to fail specific statements. It's
//! useful for:
//! - Unit testing the dispatcher and plot pipeline without a server
//! - Asserting how many introspection queries the schema cache issued
//! - Simulating failures at any step
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mosql_catalog::{MockDatabase, Database};
//! use mosql_core::RowSet;
//!
//! let db = MockDatabase::new();
//! db.add_result("select 1", RowSet::from_strs(&["1"], &[&["1"]])).await;
//!
//! let rows = db.query("select 1", &[]).await?;
//! assert_eq!(db.query_count().await, 1);
//! ```

use crate::adapter::{Database, DbError};
use crate::introspect;
use mosql_core::{Dialect, RowSet};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A statement the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedQuery {
    /// SQL text as received
    pub sql: String,

    /// Bindings as received
    pub bindings: Vec<String>,
}

/// Mock database for testing
///
/// Clones share scripted results and the query log, so a test can keep one
/// handle for assertions while the code under test owns another.
pub struct MockDatabase {
    /// Scripted results by SQL text
    results: Arc<RwLock<HashMap<String, RowSet>>>,

    /// Errors to return for specific statements
    errors: Arc<RwLock<HashMap<String, DbError>>>,

    /// Every statement received, in order
    log: Arc<RwLock<Vec<ExecutedQuery>>>,

    /// Simulate connection failure
    fail_connection: bool,

    /// Simulate query latency (milliseconds)
    latency_ms: u64,

    /// Dialect reported to callers
    dialect: Dialect,

    /// Name to return from name() method
    adapter_name: &'static str,
}

impl MockDatabase {
    /// Create a new mock with no scripted results (MySQL dialect)
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            log: Arc::new(RwLock::new(Vec::new())),
            fail_connection: false,
            latency_ms: 0,
            dialect: Dialect::MySql,
            adapter_name: "Mock",
        }
    }

    /// Report a different dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Configure to fail all connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Configure simulated latency for all operations
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set a custom adapter name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Script the result for an exact SQL string, whatever the bindings
    pub async fn add_result(&self, sql: impl Into<String>, rows: RowSet) {
        self.results.write().await.insert(sql.into(), rows);
    }

    /// Script the result for an exact SQL string with exact bindings
    ///
    /// Takes precedence over a result scripted with [`Self::add_result`].
    pub async fn add_bound_result(&self, sql: &str, bindings: &[String], rows: RowSet) {
        self.results.write().await.insert(Self::bound_key(sql, bindings), rows);
    }

    /// Script an error for an exact SQL string
    ///
    /// Errors take precedence over results for the same statement.
    pub async fn add_error(&self, sql: impl Into<String>, error: DbError) {
        self.errors.write().await.insert(sql.into(), error);
    }

    /// Script every introspection statement for this mock's dialect
    ///
    /// `tables` pairs a table name with the DDL the database would report.
    pub async fn add_schema(&self, database_name: &str, tables: &[(&str, &str)]) {
        let dialect = self.dialect;

        self.add_result(
            introspect::current_database_sql(dialect),
            RowSet::from_strs(&["database()"], &[&[database_name]]),
        )
        .await;

        let names: Vec<&[&str]> = tables.iter().map(|(name, _)| std::slice::from_ref(name)).collect();
        self.add_result(
            introspect::list_tables_sql(dialect),
            RowSet::from_strs(&["table_name"], &names),
        )
        .await;

        for (name, ddl) in tables {
            let (sql, bindings) = introspect::create_table_sql(dialect, name);
            let rows = RowSet::from_strs(&["Table", "Create Table"], &[&[*name, *ddl]]);
            self.add_bound_result(&sql, &bindings, rows).await;
        }
    }

    /// Remove a scripted error
    pub async fn clear_error(&self, sql: &str) {
        self.errors.write().await.remove(sql);
    }

    /// Total number of statements received
    pub async fn query_count(&self) -> usize {
        self.log.read().await.len()
    }

    /// Number of times an exact statement was received
    pub async fn count_for(&self, sql: &str) -> usize {
        self.log.read().await.iter().filter(|q| q.sql == sql).count()
    }

    /// Every statement received, in order
    pub async fn executed(&self) -> Vec<ExecutedQuery> {
        self.log.read().await.clone()
    }

    /// Forget the query log
    pub async fn clear_log(&self) {
        self.log.write().await.clear();
    }

    fn bound_key(sql: &str, bindings: &[String]) -> String {
        if bindings.is_empty() {
            sql.to_string()
        } else {
            format!("{}\u{0}{}", sql, bindings.join("\u{0}"))
        }
    }

    /// Simulate latency if configured
    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockDatabase {
    fn clone(&self) -> Self {
        Self {
            results: Arc::clone(&self.results),
            errors: Arc::clone(&self.errors),
            log: Arc::clone(&self.log),
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
            dialect: self.dialect,
            adapter_name: self.adapter_name,
        }
    }
}

#[async_trait::async_trait]
impl Database for MockDatabase {
    fn name(&self) -> &'static str {
        self.adapter_name
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn query(&self, sql: &str, bindings: &[String]) -> Result<RowSet, DbError> {
        self.simulate_latency().await;

        self.log.write().await.push(ExecutedQuery {
            sql: sql.to_string(),
            bindings: bindings.to_vec(),
        });

        // Check for configured errors first
        if let Some(error) = self.errors.read().await.get(sql) {
            return Err(error.clone());
        }

        let results = self.results.read().await;
        results
            .get(&Self::bound_key(sql, bindings))
            .or_else(|| results.get(sql))
            .cloned()
            .ok_or_else(|| DbError::QueryError(format!("no scripted result for `{}`", sql)))
    }

    async fn test_connection(&self) -> Result<(), DbError> {
        self.simulate_latency().await;

        if self.fail_connection {
            Err(DbError::NetworkError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_result_is_returned_and_logged() {
        let db = MockDatabase::new();
        db.add_result("select 1", RowSet::from_strs(&["1"], &[&["1"]])).await;

        let rows = db.query("select 1", &["x".to_string()]).await.unwrap();
        assert_eq!(rows.first_value(), Some("1"));
        assert_eq!(db.query_count().await, 1);
        assert_eq!(
            db.executed().await,
            vec![ExecutedQuery { sql: "select 1".to_string(), bindings: vec!["x".to_string()] }]
        );
    }

    #[tokio::test]
    async fn unknown_statement_is_query_error() {
        let db = MockDatabase::new();
        let err = db.query("select 2", &[]).await.unwrap_err();
        assert!(matches!(err, DbError::QueryError(_)));
        // failed statements are still logged
        assert_eq!(db.count_for("select 2").await, 1);
    }

    #[tokio::test]
    async fn error_takes_precedence_and_can_be_cleared() {
        let db = MockDatabase::new();
        db.add_result("show tables", RowSet::empty()).await;
        db.add_error("show tables", DbError::PermissionDenied("nope".to_string())).await;

        assert!(matches!(db.query("show tables", &[]).await, Err(DbError::PermissionDenied(_))));

        db.clear_error("show tables").await;
        assert!(db.query("show tables", &[]).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let db = MockDatabase::new().with_name("MatrixOne");
        let handle = db.clone();
        db.add_result("select 1", RowSet::empty()).await;

        handle.query("select 1", &[]).await.unwrap();
        assert_eq!(db.query_count().await, 1);
        assert_eq!(handle.name(), "MatrixOne");

        db.clear_log().await;
        assert_eq!(handle.query_count().await, 0);
    }

    #[tokio::test]
    async fn connection_failure() {
        let db = MockDatabase::new().with_connection_failure();
        assert!(db.test_connection().await.is_err());
        assert!(MockDatabase::new().test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn add_schema_scripts_introspection() {
        let db = MockDatabase::new();
        db.add_schema("tpch", &[("nation", "CREATE TABLE nation (n_nationkey int)")]).await;

        let name = db.query("select database()", &[]).await.unwrap();
        assert_eq!(name.first_value(), Some("tpch"));

        let tables = db.query("show tables", &[]).await.unwrap();
        assert_eq!(tables.column_values(0), vec!["nation"]);

        let ddl = db.query("show create table `nation`", &[]).await.unwrap();
        assert_eq!(ddl.rows[0][1], "CREATE TABLE nation (n_nationkey int)");
    }

    #[tokio::test]
    async fn bound_results_are_keyed_by_bindings() {
        let db = MockDatabase::new().with_dialect(Dialect::Postgres);
        db.add_schema("tpch", &[("a", "CREATE TABLE a ()"), ("b", "CREATE TABLE b ()")]).await;

        let (sql, bindings) = introspect::create_table_sql(Dialect::Postgres, "b");
        let ddl = db.query(&sql, &bindings).await.unwrap();
        assert_eq!(ddl.rows[0][1], "CREATE TABLE b ()");

        let err = db.query(&sql, &["c".to_string()]).await.unwrap_err();
        assert!(matches!(err, DbError::QueryError(_)));
    }
}
