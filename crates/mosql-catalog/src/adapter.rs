//! Database trait the dispatcher executes against

use mosql_core::{Dialect, RowSet};

/// Errors that can occur when talking to the database
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A connected database that can run SQL and hand back text rows
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    /// Get the adapter name (e.g., "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Dialect used for introspection and prompts
    fn dialect(&self) -> Dialect;

    /// Execute a statement with positional text bindings
    ///
    /// Every cell is rendered as a string; NULL renders as `NULL`.
    async fn query(&self, sql: &str, bindings: &[String]) -> Result<RowSet, DbError>;

    /// Test the connection to the database
    async fn test_connection(&self) -> Result<(), DbError>;
}

/// First column of the first row, or "" when the result is empty
///
/// With `skip_first` the second column is read instead, which is where
/// `show create table` style statements put the DDL.
pub async fn query_one_string(
    db: &dyn Database,
    sql: &str,
    bindings: &[String],
    skip_first: bool,
) -> Result<String, DbError> {
    let rows = db.query(sql, bindings).await?;
    let index = usize::from(skip_first);

    match rows.rows.first() {
        None => Ok(String::new()),
        Some(row) => row.get(index).cloned().ok_or_else(|| {
            DbError::InvalidResponse(format!(
                "expected at least {} column(s) from `{}`, got {}",
                index + 1,
                sql,
                row.len()
            ))
        }),
    }
}

/// First column of every row
pub async fn query_many_strings(
    db: &dyn Database,
    sql: &str,
    bindings: &[String],
) -> Result<Vec<String>, DbError> {
    let rows = db.query(sql, bindings).await?;

    rows.rows
        .into_iter()
        .map(|row| {
            row.into_iter().next().ok_or_else(|| {
                DbError::InvalidResponse(format!("empty row returned from `{}`", sql))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDatabase;

    #[tokio::test]
    async fn one_string_reads_requested_column() {
        let db = MockDatabase::new();
        db.add_result(
            "show create table `t`",
            RowSet::from_strs(&["Table", "Create Table"], &[&["t", "CREATE TABLE t (x int)"]]),
        )
        .await;

        let first = query_one_string(&db, "show create table `t`", &[], false).await.unwrap();
        let second = query_one_string(&db, "show create table `t`", &[], true).await.unwrap();
        assert_eq!(first, "t");
        assert_eq!(second, "CREATE TABLE t (x int)");
    }

    #[tokio::test]
    async fn one_string_on_empty_result_is_empty() {
        let db = MockDatabase::new();
        db.add_result("select database()", RowSet::from_strs(&["database()"], &[])).await;

        let name = query_one_string(&db, "select database()", &[], false).await.unwrap();
        assert_eq!(name, "");
    }

    #[tokio::test]
    async fn one_string_missing_column_is_invalid_response() {
        let db = MockDatabase::new();
        db.add_result("show create table `t`", RowSet::from_strs(&["Table"], &[&["t"]])).await;

        let err = query_one_string(&db, "show create table `t`", &[], true).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn many_strings_collects_first_column() {
        let db = MockDatabase::new();
        db.add_result(
            "show tables",
            RowSet::from_strs(&["Tables_in_tpch"], &[&["customer"], &["lineitem"], &["nation"]]),
        )
        .await;

        let tables = query_many_strings(&db, "show tables", &[]).await.unwrap();
        assert_eq!(tables, vec!["customer", "lineitem", "nation"]);
    }
}
