//! Database access for mosql
//!
//! This crate provides the [`Database`] trait the query dispatcher executes
//! against, schema introspection for prompt building, and a session cache
//! so the schema is fetched at most once.
//!
//! ## Features
//!
//! - `postgres` - PostgreSQL support via `tokio-postgres`
//! - `mysql` - MySQL (and MySQL-compatible servers) via `mysql_async`
//!
//! ## Example
//!
//! ```rust,ignore
//! use mosql_catalog::{PostgresDatabase, Database, SchemaCache};
//!
//! let db = PostgresDatabase::from_connection_string("host=localhost dbname=tpch").await?;
//! let cache = SchemaCache::new();
//! let schema = cache.ensure_schema(&db).await?;
//! println!("{}", schema.schema_text());
//! ```

pub mod adapter;
pub mod cache;
pub mod introspect;
pub mod mock;
pub mod mysql;
pub mod postgres;

pub use adapter::{query_many_strings, query_one_string, Database, DbError};
pub use cache::SchemaCache;
pub use introspect::{create_table_sql, current_database_sql, fetch_schema, list_tables_sql};
pub use mock::{ExecutedQuery, MockDatabase};
pub use mysql::MySqlDatabase;
pub use postgres::PostgresDatabase;
