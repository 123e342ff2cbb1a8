//! PostgreSQL database adapter
//!
//! Runs statements over `tokio-postgres` and renders every cell as text so
//! that results can be printed or fed to a plot script.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let db = PostgresDatabase::from_connection_string(
//!     "host=localhost port=5432 dbname=tpch user=postgres password=secret"
//! ).await?;
//!
//! // With SSL
//! let db = PostgresDatabase::from_connection_string_with_tls(
//!     "host=db.example.com dbname=tpch user=postgres sslmode=require"
//! ).await?;
//!
//! let rows = db.query("select 1", &[]).await?;
//! ```
//!
//! Statements without bindings go through the simple query protocol, so
//! several `;`-separated statements may be sent at once and the result set of
//! the last one that has one is kept. Statements with bindings are prepared
//! and every binding is sent as a text parameter. Their cells come back in
//! binary format and are decoded per column type (numeric, date and time,
//! uuid and json included) before being rendered as text.

use crate::adapter::{Database, DbError};
use mosql_core::{Dialect, RowSet};

#[cfg(feature = "postgres")]
use tokio_postgres::{
    types::{FromSql, Kind, ToSql, Type},
    Client, Config as PgConfig, NoTls, Row, SimpleQueryMessage,
};

#[cfg(feature = "postgres")]
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

#[cfg(feature = "postgres")]
use rust_decimal::Decimal;

#[cfg(feature = "postgres")]
use uuid::Uuid;

#[cfg(feature = "postgres")]
use postgres_native_tls::MakeTlsConnector;

#[cfg(feature = "postgres")]
use native_tls::TlsConnector;

#[cfg(not(feature = "postgres"))]
const NOT_COMPILED: &str =
    "PostgreSQL support not compiled. Rebuild with: cargo build --features postgres";

/// PostgreSQL database adapter
pub struct PostgresDatabase {
    /// PostgreSQL client (only available with postgres feature)
    #[cfg(feature = "postgres")]
    client: Client,

    /// Connection host
    host: String,

    /// Connection port
    port: u16,

    /// Database name
    database: String,

    /// Placeholder for when feature is disabled
    #[cfg(not(feature = "postgres"))]
    _phantom: std::marker::PhantomData<()>,
}

#[cfg(feature = "postgres")]
struct ConnectionInfo {
    host: String,
    port: u16,
    database: String,
}

#[cfg(feature = "postgres")]
fn connection_info(conn_str: &str) -> Result<ConnectionInfo, DbError> {
    let config: PgConfig = conn_str
        .parse()
        .map_err(|e| DbError::ConfigError(format!("Invalid connection string: {}", e)))?;

    let host = config
        .get_hosts()
        .first()
        .map(|h| match h {
            tokio_postgres::config::Host::Tcp(name) => name.clone(),
            #[cfg(unix)]
            tokio_postgres::config::Host::Unix(path) => path.display().to_string(),
        })
        .unwrap_or_else(|| "localhost".to_string());
    let port = config.get_ports().first().copied().unwrap_or(5432);
    let database = config.get_dbname().unwrap_or("postgres").to_string();

    Ok(ConnectionInfo { host, port, database })
}

impl PostgresDatabase {
    /// Connect using a PostgreSQL connection string (key/value or URL form)
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string(conn_str: &str) -> Result<Self, DbError> {
        let info = connection_info(conn_str)?;

        let (client, connection) = tokio_postgres::connect(conn_str, NoTls)
            .await
            .map_err(|e| DbError::AuthenticationError(format!("Failed to connect: {}", e)))?;

        let (host, port) = (info.host.clone(), info.port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(%host, port, error = %e, "PostgreSQL connection error");
            }
        });

        tracing::debug!(host = %info.host, port = info.port, database = %info.database, "connected");

        Ok(Self {
            client,
            host: info.host,
            port: info.port,
            database: info.database,
        })
    }

    /// Create adapter without postgres feature (returns error)
    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string(_conn_str: &str) -> Result<Self, DbError> {
        Err(DbError::ConfigError(NOT_COMPILED.to_string()))
    }

    /// Connect over TLS using a PostgreSQL connection string
    ///
    /// The `sslmode` setting is ignored; TLS is always used.
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string_with_tls(conn_str: &str) -> Result<Self, DbError> {
        let info = connection_info(conn_str)?;

        let connector = TlsConnector::builder()
            .build()
            .map_err(|e| DbError::ConfigError(format!("Failed to create TLS connector: {}", e)))?;
        let tls = MakeTlsConnector::new(connector);

        let (client, connection) = tokio_postgres::connect(conn_str, tls)
            .await
            .map_err(|e| {
                DbError::AuthenticationError(format!("Failed to connect with TLS: {}", e))
            })?;

        let (host, port) = (info.host.clone(), info.port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(%host, port, error = %e, "PostgreSQL TLS connection error");
            }
        });

        tracing::debug!(host = %info.host, port = info.port, database = %info.database, "connected with TLS");

        Ok(Self {
            client,
            host: info.host,
            port: info.port,
            database: info.database,
        })
    }

    /// Create adapter without postgres feature (returns error)
    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string_with_tls(_conn_str: &str) -> Result<Self, DbError> {
        Err(DbError::ConfigError(NOT_COMPILED.to_string()))
    }

    /// Get the connection host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the connection port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }

    #[cfg(feature = "postgres")]
    async fn simple(&self, sql: &str) -> Result<RowSet, DbError> {
        let messages = self.client.simple_query(sql).await.map_err(classify_error)?;

        // Rows of the last statement that described a result set
        let mut result = RowSet::empty();
        let mut current: Option<RowSet> = None;

        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    let columns = columns.iter().map(|c| c.name().to_string()).collect();
                    current = Some(RowSet::new(columns, Vec::new()));
                }
                SimpleQueryMessage::Row(row) => {
                    let set = current.get_or_insert_with(|| {
                        let columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                        RowSet::new(columns, Vec::new())
                    });
                    let cells = (0..row.len())
                        .map(|i| row.get(i).unwrap_or(NULL_TEXT).to_string())
                        .collect();
                    set.rows.push(cells);
                }
                SimpleQueryMessage::CommandComplete(_) => {
                    if let Some(set) = current.take() {
                        result = set;
                    }
                }
                _ => {}
            }
        }

        Ok(current.unwrap_or(result))
    }

    #[cfg(feature = "postgres")]
    async fn prepared(&self, sql: &str, bindings: &[String]) -> Result<RowSet, DbError> {
        let params: Vec<&(dyn ToSql + Sync)> =
            bindings.iter().map(|b| b as &(dyn ToSql + Sync)).collect();

        let statement = self.client.prepare(sql).await.map_err(classify_error)?;
        let rows = self.client.query(&statement, &params).await.map_err(classify_error)?;

        let columns = statement.columns().iter().map(|c| c.name().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| render_cell(row, i)).collect())
            .collect::<Result<Vec<Vec<String>>, DbError>>()?;

        Ok(RowSet::new(columns, rows))
    }
}

#[cfg(feature = "postgres")]
const NULL_TEXT: &str = "NULL";

#[cfg(feature = "postgres")]
fn classify_error(e: tokio_postgres::Error) -> DbError {
    let err_str = match e.as_db_error() {
        Some(db) => db.message().to_string(),
        None => e.to_string(),
    };

    if err_str.contains("permission denied") {
        DbError::PermissionDenied(err_str)
    } else if e.is_closed() {
        DbError::NetworkError(err_str)
    } else {
        DbError::QueryError(err_str)
    }
}

/// A column value in wire format, decoded later by [`render_value`]
#[cfg(feature = "postgres")]
struct RawCell<'a>(Option<&'a [u8]>);

#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for RawCell<'a> {
    fn from_sql(_: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(RawCell(Some(raw)))
    }

    fn from_sql_null(_: &Type) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(RawCell(None))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

/// Render one cell of a prepared statement's row as text
#[cfg(feature = "postgres")]
fn render_cell(row: &Row, idx: usize) -> Result<String, DbError> {
    let ty = row.columns()[idx].type_();
    let cell = row
        .try_get::<_, RawCell>(idx)
        .map_err(|e| DbError::InvalidResponse(format!("column {} ({}): {}", idx, ty.name(), e)))?;

    render_value(ty, cell.0)
        .map_err(|e| DbError::InvalidResponse(format!("column {}: {}", idx, e)))
}

/// Render a binary-format value of type `ty` the way psql prints it
#[cfg(feature = "postgres")]
fn render_value(ty: &Type, raw: Option<&[u8]>) -> Result<String, String> {
    fn decode<'a, T>(ty: &Type, raw: &'a [u8]) -> Result<String, String>
    where
        T: FromSql<'a> + ToString,
    {
        T::from_sql(ty, raw)
            .map(|v| v.to_string())
            .map_err(|e| format!("invalid {} value: {}", ty.name(), e))
    }

    let Some(raw) = raw else {
        return Ok(NULL_TEXT.to_string());
    };

    if ty == &Type::BOOL {
        decode::<bool>(ty, raw)
    } else if ty == &Type::INT2 {
        decode::<i16>(ty, raw)
    } else if ty == &Type::INT4 {
        decode::<i32>(ty, raw)
    } else if ty == &Type::INT8 {
        decode::<i64>(ty, raw)
    } else if ty == &Type::OID {
        decode::<u32>(ty, raw)
    } else if ty == &Type::FLOAT4 {
        decode::<f32>(ty, raw)
    } else if ty == &Type::FLOAT8 {
        decode::<f64>(ty, raw)
    } else if ty == &Type::NUMERIC {
        decode::<Decimal>(ty, raw)
    } else if ty == &Type::DATE {
        decode::<NaiveDate>(ty, raw)
    } else if ty == &Type::TIME {
        decode::<NaiveTime>(ty, raw)
    } else if ty == &Type::TIMESTAMP {
        decode::<NaiveDateTime>(ty, raw)
    } else if ty == &Type::TIMESTAMPTZ {
        decode::<DateTime<Utc>>(ty, raw)
    } else if ty == &Type::UUID {
        decode::<Uuid>(ty, raw)
    } else if ty == &Type::JSON || ty == &Type::JSONB {
        decode::<serde_json::Value>(ty, raw)
    } else if ty == &Type::BYTEA {
        let hex: String = raw.iter().map(|b| format!("{:02x}", b)).collect();
        Ok(format!("\\x{}", hex))
    } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN].contains(ty)
        || matches!(ty.kind(), Kind::Enum(_))
    {
        decode::<String>(ty, raw)
    } else {
        Err(format!("type {} cannot be rendered; cast it to text", ty.name()))
    }
}

#[async_trait::async_trait]
impl Database for PostgresDatabase {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    #[cfg(feature = "postgres")]
    async fn query(&self, sql: &str, bindings: &[String]) -> Result<RowSet, DbError> {
        tracing::debug!(sql, bindings = bindings.len(), "executing statement");

        if bindings.is_empty() {
            self.simple(sql).await
        } else {
            self.prepared(sql, bindings).await
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn query(&self, _sql: &str, _bindings: &[String]) -> Result<RowSet, DbError> {
        Err(DbError::ConfigError(NOT_COMPILED.to_string()))
    }

    #[cfg(feature = "postgres")]
    async fn test_connection(&self) -> Result<(), DbError> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| DbError::QueryError(format!("Connection test failed: {}", e)))?;
        Ok(())
    }

    #[cfg(not(feature = "postgres"))]
    async fn test_connection(&self) -> Result<(), DbError> {
        Err(DbError::ConfigError(NOT_COMPILED.to_string()))
    }
}
