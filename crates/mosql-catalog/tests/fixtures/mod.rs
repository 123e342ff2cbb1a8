//! Test fixtures for catalog integration tests
//!
//! A slice of the TPC-H schema as MySQL-compatible servers report it from
//! `show create table`.

use mosql_catalog::MockDatabase;

pub const NATION_DDL: &str = "CREATE TABLE `nation` (
  `N_NATIONKEY` int NOT NULL,
  `N_NAME` char(25) NOT NULL,
  `N_REGIONKEY` int NOT NULL,
  `N_COMMENT` varchar(152) DEFAULT NULL,
  PRIMARY KEY (`N_NATIONKEY`)
)";

pub const REGION_DDL: &str = "CREATE TABLE `region` (
  `R_REGIONKEY` int NOT NULL,
  `R_NAME` char(25) NOT NULL,
  `R_COMMENT` varchar(152) DEFAULT NULL,
  PRIMARY KEY (`R_REGIONKEY`)
)";

pub const LINEITEM_DDL: &str = "CREATE TABLE `lineitem` (
  `L_ORDERKEY` bigint NOT NULL,
  `L_QUANTITY` decimal(15,2) NOT NULL,
  `L_EXTENDEDPRICE` decimal(15,2) NOT NULL,
  `L_DISCOUNT` decimal(15,2) NOT NULL,
  `L_TAX` decimal(15,2) NOT NULL,
  `L_RETURNFLAG` varchar(1) NOT NULL,
  `L_LINESTATUS` varchar(1) NOT NULL,
  `L_SHIPDATE` date NOT NULL
)";

/// Table name and DDL pairs in `show tables` order
pub fn tpch_tables() -> Vec<(&'static str, &'static str)> {
    vec![
        ("lineitem", LINEITEM_DDL),
        ("nation", NATION_DDL),
        ("region", REGION_DDL),
    ]
}

/// A MySQL-dialect mock with the TPC-H slice scripted
pub async fn tpch_database() -> MockDatabase {
    let db = MockDatabase::new().with_name("MatrixOne");
    db.add_schema("tpch", &tpch_tables()).await;
    db
}
