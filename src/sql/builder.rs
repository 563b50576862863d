//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from static table definitions.
//! Every parameter is bound as text and cast to the column type in SQL.

use crate::config::{ColumnKind, TableDef, ID_COLUMN};
use crate::error::StoreError;
use crate::store::{Filter, Row};

use super::params::to_text;

/// Quote identifier for PostgreSQL (safe: only from static definitions).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Option<String>>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    /// Adds a parameter and returns its placeholder with the cast for `kind`.
    fn push_param(&mut self, v: Option<String>, kind: ColumnKind) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), kind.pg_type())
    }
}

/// `"id", "name", ...`
fn select_column_list(table: &TableDef) -> String {
    std::iter::once(ID_COLUMN)
        .chain(table.columns.iter().map(|c| c.name))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

fn where_clause(q: &mut QueryBuf, table: &TableDef, filters: &[Filter]) -> Result<String, StoreError> {
    let mut parts = Vec::with_capacity(filters.len());
    for f in filters {
        if !table.has_column(f.column) {
            return Err(StoreError::UnknownColumn {
                table: table.name,
                column: f.column.to_string(),
            });
        }
        let ph = q.push_param(Some(f.value.to_string()), ColumnKind::BigInt);
        parts.push(format!("{} = {}", quoted(f.column), ph));
    }
    Ok(if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    })
}

/// SELECT all rows ORDER BY id.
pub fn select_all(table: &TableDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(table),
        quoted(table.name),
        quoted(ID_COLUMN)
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Some(id.to_string()), ColumnKind::BigInt);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(table),
        quoted(table.name),
        quoted(ID_COLUMN),
        ph
    );
    q
}

/// SELECT rows matching every filter, ORDER BY id.
pub fn select_where(table: &TableDef, filters: &[Filter]) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, table, filters)?;
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(table),
        quoted(table.name),
        where_sql,
        quoted(ID_COLUMN)
    );
    Ok(q)
}

/// INSERT every column of the table (absent values bind NULL) RETURNING id.
pub fn insert(table: &TableDef, values: &Row) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(table.columns.len());
    let mut placeholders = Vec::with_capacity(table.columns.len());
    for c in table.columns {
        let text = match values.get(c.name) {
            Some(v) => to_text(c, v)?,
            None => None,
        };
        placeholders.push(q.push_param(text, c.kind));
        cols.push(quoted(c.name));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID_COLUMN)
    );
    Ok(q)
}

/// UPDATE by id: SET only columns present in `values`. `None` when there is nothing to set.
pub fn update(table: &TableDef, id: i64, values: &Row) -> Result<Option<QueryBuf>, StoreError> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    // table order keeps the statement text stable
    for c in table.columns {
        let Some(v) = values.get(c.name) else { continue };
        let ph = q.push_param(to_text(c, v)?, c.kind);
        sets.push(format!("{} = {}", quoted(c.name), ph));
    }
    if sets.is_empty() {
        return Ok(None);
    }
    let id_ph = q.push_param(Some(id.to_string()), ColumnKind::BigInt);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(table.name),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_ph
    );
    Ok(Some(q))
}

/// DELETE rows matching every filter.
pub fn delete_where(table: &TableDef, filters: &[Filter]) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, table, filters)?;
    q.sql = format!("DELETE FROM {}{}", quoted(table.name), where_sql);
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{EVENT_TAG_TABLE, TAG_TABLE, TOUR_TABLE};
    use crate::store::eq;
    use serde_json::json;

    #[test]
    fn select_lists_id_first() {
        let q = select_all(&TAG_TABLE);
        assert_eq!(q.sql, r#"SELECT "id", "name" FROM "tag" ORDER BY "id""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_casts_every_column() {
        let values = json!({"name": "Spring", "description": "d", "date_start": "2024-05-01T10:00:00",
            "date_end": "2024-05-02T10:00:00", "reg_deadline": "2024-04-01T00:00:00", "max_users": 10})
        .as_object()
        .cloned()
        .unwrap();
        let q = insert(&TOUR_TABLE, &values).unwrap();
        assert!(q.sql.starts_with(r#"INSERT INTO "tour" ("name", "address", "description""#));
        assert!(q.sql.contains("$2::jsonb"));
        assert!(q.sql.contains("$4::timestamp"));
        assert!(q.sql.ends_with(r#"RETURNING "id""#));
        assert_eq!(q.params.len(), TOUR_TABLE.columns.len());
        assert_eq!(q.params[1], None);
        assert_eq!(q.params[6].as_deref(), Some("10"));
    }

    #[test]
    fn update_sets_only_given_columns() {
        let values = json!({"image": ""}).as_object().cloned().unwrap();
        let q = update(&TOUR_TABLE, 4, &values).unwrap().unwrap();
        assert_eq!(q.sql, r#"UPDATE "tour" SET "image" = $1::text WHERE "id" = $2::bigint"#);
        assert_eq!(q.params, vec![Some(String::new()), Some("4".to_string())]);
        assert!(update(&TOUR_TABLE, 4, &Row::new()).unwrap().is_none());
    }

    #[test]
    fn delete_where_filters_on_fk() {
        let q = delete_where(&EVENT_TAG_TABLE, &[eq("event_id", 7)]).unwrap();
        assert_eq!(q.sql, r#"DELETE FROM "event_tag" WHERE "event_id" = $1::bigint"#);
        assert!(delete_where(&EVENT_TAG_TABLE, &[eq("tour_id", 7)]).is_err());
    }
}
