//! Store backends. Rows travel as JSON objects keyed by column name; every
//! table has an integer `id` assigned on insert.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::{ColumnDef, ColumnKind, TableDef};
use crate::error::StoreError;

pub type Row = Map<String, Value>;

/// Equality filter on an integer column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: i64,
}

pub fn eq(column: &'static str, value: i64) -> Filter {
    Filter { column, value }
}

/// One `DELETE FROM table WHERE filter` inside an atomic batch.
#[derive(Clone, Copy, Debug)]
pub struct DeleteStep {
    pub table: &'static TableDef,
    pub filter: Filter,
}

/// Each call is one statement committed on its own, except `delete_atomically`.
#[async_trait]
pub trait Store: Send + Sync {
    /// All rows in primary-key order.
    async fn select_all(&self, table: &'static TableDef) -> Result<Vec<Row>, StoreError>;

    async fn select_by_id(&self, table: &'static TableDef, id: i64) -> Result<Option<Row>, StoreError>;

    /// Rows matching every filter, in primary-key order.
    async fn select_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<Vec<Row>, StoreError>;

    /// Inserts one row and returns the assigned id. Columns absent from `values` are NULL.
    async fn insert(&self, table: &'static TableDef, values: &Row) -> Result<i64, StoreError>;

    /// Sets the columns present in `values`. Returns the number of rows touched.
    async fn update(&self, table: &'static TableDef, id: i64, values: &Row) -> Result<u64, StoreError>;

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<u64, StoreError>;

    async fn delete_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<u64, StoreError>;

    /// Runs the steps in order inside one transaction; on failure nothing is applied.
    async fn delete_atomically(&self, steps: &[DeleteStep]) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub(crate) fn check_columns(table: &'static TableDef, values: &Row) -> Result<(), StoreError> {
    for key in values.keys() {
        if table.column(key).is_none() {
            return Err(StoreError::UnknownColumn {
                table: table.name,
                column: key.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that a JSON value fits the column type. NULL is checked separately.
pub(crate) fn check_value(column: &ColumnDef, value: &Value) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidValue {
        column: column.name.to_string(),
        reason: reason.to_string(),
    };
    match (column.kind, value) {
        (_, Value::Null) => Ok(()),
        (ColumnKind::BigInt, Value::Number(n)) if n.is_i64() => Ok(()),
        (ColumnKind::BigInt, _) => Err(invalid("expected an integer")),
        (ColumnKind::Text, Value::String(_)) => Ok(()),
        (ColumnKind::Text, _) => Err(invalid("expected a string")),
        (ColumnKind::Timestamp, Value::String(s)) => parse_timestamp(s)
            .map(|_| ())
            .ok_or_else(|| invalid("expected a timestamp")),
        (ColumnKind::Timestamp, _) => Err(invalid("expected a timestamp")),
        (ColumnKind::Json, _) => Ok(()),
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COL: ColumnDef = ColumnDef::new("date", ColumnKind::Timestamp);

    #[test]
    fn timestamps_accept_both_separators() {
        assert!(check_value(&COL, &json!("2024-05-01T10:00:00")).is_ok());
        assert!(check_value(&COL, &json!("2024-05-01 10:00:00.5")).is_ok());
        assert!(check_value(&COL, &json!("yesterday")).is_err());
        assert!(check_value(&COL, &json!(12)).is_err());
        assert!(check_value(&COL, &Value::Null).is_ok());
    }

    #[test]
    fn integers_must_be_whole() {
        let col = ColumnDef::new("max_users", ColumnKind::BigInt);
        assert!(check_value(&col, &json!(3)).is_ok());
        assert!(check_value(&col, &json!(3.5)).is_err());
        assert!(check_value(&col, &json!("3")).is_err());
    }
}
