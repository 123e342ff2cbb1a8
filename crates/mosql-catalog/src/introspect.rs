//! Schema introspection
//!
//! Builds a [`SchemaSnapshot`] (database name plus the `CREATE TABLE`
//! statement of every table) through the plain [`Database::query`] interface,
//! using statements appropriate for the database's dialect.

use crate::adapter::{query_many_strings, query_one_string, Database, DbError};
use mosql_core::{Dialect, SchemaSnapshot};

const PG_LIST_TABLES: &str = "\
select table_name::text
from information_schema.tables
where table_schema = current_schema()
  and table_type = 'BASE TABLE'
order by table_name";

const PG_CREATE_TABLE: &str = "\
select c.table_name::text,
       'CREATE TABLE ' || c.table_name || E' (\\n' ||
       string_agg('  ' || c.column_name || ' ' || c.data_type ||
                  case when c.is_nullable = 'NO' then ' NOT NULL' else '' end,
                  E',\\n' order by c.ordinal_position) ||
       E'\\n);'
from information_schema.columns c
where c.table_schema = current_schema()
  and c.table_name::text = $1
group by c.table_name";

/// Statement returning the active database name
pub fn current_database_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => "select database()",
        Dialect::Postgres => "select current_database()",
    }
}

/// Statement listing every table, one name per row
pub fn list_tables_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => "show tables",
        Dialect::Postgres => PG_LIST_TABLES,
    }
}

/// Statement (and bindings) returning `(table, ddl)` for one table
pub fn create_table_sql(dialect: Dialect, table: &str) -> (String, Vec<String>) {
    match dialect {
        Dialect::MySql => (
            format!("show create table `{}`", table.replace('`', "``")),
            Vec::new(),
        ),
        Dialect::Postgres => (PG_CREATE_TABLE.to_string(), vec![table.to_string()]),
    }
}

/// Fetch the database name and the DDL of every table
///
/// The first failing statement aborts the whole fetch.
pub async fn fetch_schema(db: &dyn Database) -> Result<SchemaSnapshot, DbError> {
    let dialect = db.dialect();

    let database_name = query_one_string(db, current_database_sql(dialect), &[], false).await?;
    let tables = query_many_strings(db, list_tables_sql(dialect), &[]).await?;

    let mut table_ddl = Vec::with_capacity(tables.len());
    for table in &tables {
        let (sql, bindings) = create_table_sql(dialect, table);
        table_ddl.push(query_one_string(db, &sql, &bindings, true).await?);
    }

    tracing::info!(
        adapter = db.name(),
        database = %database_name,
        tables = table_ddl.len(),
        "fetched schema"
    );

    Ok(SchemaSnapshot::new(database_name, table_ddl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDatabase;

    #[test]
    fn mysql_identifiers_are_quoted() {
        let (sql, bindings) = create_table_sql(Dialect::MySql, "weird`name");
        assert_eq!(sql, "show create table `weird``name`");
        assert!(bindings.is_empty());
    }

    #[test]
    fn postgres_table_is_bound() {
        let (sql, bindings) = create_table_sql(Dialect::Postgres, "orders");
        assert!(sql.contains("$1"));
        assert_eq!(bindings, vec!["orders".to_string()]);
    }

    #[tokio::test]
    async fn fetch_schema_in_listing_order() {
        let db = MockDatabase::new();
        db.add_schema(
            "tpch",
            &[
                ("nation", "CREATE TABLE `nation` (`n_nationkey` int)"),
                ("region", "CREATE TABLE `region` (`r_regionkey` int)"),
            ],
        )
        .await;

        let snapshot = fetch_schema(&db).await.unwrap();
        assert_eq!(snapshot.database_name, "tpch");
        assert_eq!(
            snapshot.table_ddl,
            vec![
                "CREATE TABLE `nation` (`n_nationkey` int)".to_string(),
                "CREATE TABLE `region` (`r_regionkey` int)".to_string(),
            ]
        );
        // name + listing + one per table
        assert_eq!(db.query_count().await, 4);
    }

    #[tokio::test]
    async fn failing_table_aborts_fetch() {
        let db = MockDatabase::new();
        db.add_schema("tpch", &[("a", "CREATE TABLE a ()"), ("b", "CREATE TABLE b ()")]).await;
        db.add_error("show create table `a`", DbError::PermissionDenied("a".to_string())).await;

        let err = fetch_schema(&db).await.unwrap_err();
        assert_eq!(err, DbError::PermissionDenied("a".to_string()));
        // `b` is never asked for
        assert_eq!(db.count_for("show create table `b`").await, 0);
    }

    #[tokio::test]
    async fn postgres_dialect_uses_information_schema() {
        let db = MockDatabase::new().with_dialect(Dialect::Postgres);
        db.add_schema("shop", &[("orders", "CREATE TABLE orders (\n  id integer NOT NULL\n);")]).await;

        let snapshot = fetch_schema(&db).await.unwrap();
        assert_eq!(snapshot.database_name, "shop");
        assert_eq!(snapshot.table_ddl.len(), 1);

        let executed = db.executed().await;
        assert_eq!(executed[0].sql, "select current_database()");
        assert_eq!(executed[2].bindings, vec!["orders".to_string()]);
    }
}
