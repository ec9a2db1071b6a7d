//! Fixed column layout of the yellow-taxi dataset and the SQL text built
//! from it. All statement builders quote identifiers, since several source
//! columns are mixed-case.

use anyhow::{bail, Result};
use csv::StringRecord;
use once_cell::sync::Lazy;

/// SQL type a trip column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    BigInt,
    Double,
    Text,
    Timestamp,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::BigInt => "BIGINT",
            ColumnKind::Double => "DOUBLE PRECISION",
            ColumnKind::Text => "TEXT",
            ColumnKind::Timestamp => "TIMESTAMP",
        }
    }
}

/// The 18 published columns, in CSV header order. Destination tables use
/// the source names verbatim.
pub const TRIP_COLUMNS: &[(&str, ColumnKind)] = &[
    ("VendorID", ColumnKind::BigInt),
    ("tpep_pickup_datetime", ColumnKind::Timestamp),
    ("tpep_dropoff_datetime", ColumnKind::Timestamp),
    ("passenger_count", ColumnKind::BigInt),
    ("trip_distance", ColumnKind::Double),
    ("RatecodeID", ColumnKind::BigInt),
    ("store_and_fwd_flag", ColumnKind::Text),
    ("PULocationID", ColumnKind::BigInt),
    ("DOLocationID", ColumnKind::BigInt),
    ("payment_type", ColumnKind::BigInt),
    ("fare_amount", ColumnKind::Double),
    ("extra", ColumnKind::Double),
    ("mta_tax", ColumnKind::Double),
    ("tip_amount", ColumnKind::Double),
    ("tolls_amount", ColumnKind::Double),
    ("improvement_surcharge", ColumnKind::Double),
    ("total_amount", ColumnKind::Double),
    ("congestion_surcharge", ColumnKind::Double),
];

/// Comma-joined quoted column list, shared by the DDL and INSERT builders.
static COLUMN_LIST: Lazy<String> = Lazy::new(|| {
    TRIP_COLUMNS
        .iter()
        .map(|(name, _)| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ")
});

/// Quote a SQL identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Verify the source header matches the fixed column layout, position by
/// position. Any missing, extra, or renamed column is fatal.
pub fn check_header(header: &StringRecord) -> Result<()> {
    if header.len() != TRIP_COLUMNS.len() {
        bail!(
            "header has {} columns, expected {}",
            header.len(),
            TRIP_COLUMNS.len()
        );
    }
    for (i, (expected, _)) in TRIP_COLUMNS.iter().enumerate() {
        let got = header.get(i).unwrap_or("").trim();
        if got != *expected {
            bail!("column {} is '{}', expected '{}'", i, got, expected);
        }
    }
    Ok(())
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// `CREATE TABLE` DDL for an empty destination table.
pub fn create_table_sql(table: &str) -> String {
    let cols = TRIP_COLUMNS
        .iter()
        .map(|(name, kind)| format!("{} {}", quote_ident(name), kind.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), cols)
}

/// Multi-row `INSERT` with `$n` placeholders for `rows` rows.
pub fn insert_sql(table: &str, rows: usize) -> String {
    let width = TRIP_COLUMNS.len();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(table),
        &*COLUMN_LIST
    );
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..width {
            if col > 0 {
                sql.push_str(", ");
            }
            sql.push('$');
            sql.push_str(&(row * width + col + 1).to_string());
        }
        sql.push(')');
    }
    sql
}

pub fn count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(table))
}
