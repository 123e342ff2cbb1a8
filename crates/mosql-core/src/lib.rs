//! mosql core
//!
//! Shared data model (result sets, schema snapshots, dialects) and the
//! configuration every other crate reads from.

pub mod schema;
pub mod config;

pub use schema::{Dialect, RowSet, SchemaSnapshot};
pub use config::{Config, ConfigError, DatabaseConfig, LlmConfig, PlotConfig};
