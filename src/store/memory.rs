//! In-process store with the same key, FK, uniqueness and not-null rules as the
//! PostgreSQL schema. Selected with `DATABASE_URL=memory://`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{check_columns, check_value, DeleteStep, Filter, Row, Store};
use crate::config::{TableDef, ID_COLUMN};
use crate::error::StoreError;

#[derive(Clone, Default)]
struct TableData {
    next_id: i64,
    rows: BTreeMap<i64, Row>,
}

type Tables = HashMap<&'static str, TableData>;

pub struct MemoryStore {
    schema: &'static [&'static TableDef],
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new(schema: &'static [&'static TableDef]) -> Self {
        let tables = schema.iter().map(|t| (t.name, TableData::default())).collect();
        MemoryStore {
            schema,
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

fn matches(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| row.get(f.column).and_then(Value::as_i64) == Some(f.value))
}

fn table_mut<'a>(tables: &'a mut Tables, table: &'static TableDef) -> Result<&'a mut TableData, StoreError> {
    tables
        .get_mut(table.name)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown table {}", table.name)))
}

fn table_ref<'a>(tables: &'a Tables, table: &'static TableDef) -> Result<&'a TableData, StoreError> {
    tables
        .get(table.name)
        .ok_or_else(|| StoreError::Unavailable(format!("unknown table {}", table.name)))
}

fn check_filters(table: &'static TableDef, filters: &[Filter]) -> Result<(), StoreError> {
    for f in filters {
        if !table.has_column(f.column) {
            return Err(StoreError::UnknownColumn {
                table: table.name,
                column: f.column.to_string(),
            });
        }
    }
    Ok(())
}

/// Type, not-null, FK and uniqueness checks for the row as it will be stored.
fn check_row(tables: &Tables, table: &'static TableDef, id: i64, row: &Row) -> Result<(), StoreError> {
    let data = table_ref(tables, table)?;
    for col in table.columns {
        let value = row.get(col.name).unwrap_or(&Value::Null);
        check_value(col, value)?;
        if value.is_null() {
            if !col.nullable {
                return Err(StoreError::Constraint(format!(
                    "null value in column \"{}\" of relation \"{}\"",
                    col.name, table.name
                )));
            }
            continue;
        }
        if let Some(target) = col.references {
            let target_id = value.as_i64().unwrap_or_default();
            let exists = tables
                .get(target)
                .map(|t| t.rows.contains_key(&target_id))
                .unwrap_or(false);
            if !exists {
                return Err(StoreError::Constraint(format!(
                    "insert or update on table \"{}\" violates foreign key on \"{}\": key {} is not present in \"{}\"",
                    table.name, col.name, target_id, target
                )));
            }
        }
        if col.unique {
            let taken = data
                .rows
                .iter()
                .any(|(other, r)| *other != id && r.get(col.name) == Some(value));
            if taken {
                return Err(StoreError::Constraint(format!(
                    "duplicate key value violates unique constraint on \"{}.{}\"",
                    table.name, col.name
                )));
            }
        }
    }
    Ok(())
}

impl MemoryStore {
    fn referenced_by(&self, tables: &Tables, table: &'static TableDef, id: i64) -> Option<&'static str> {
        for other in self.schema {
            for fk in other.foreign_keys() {
                if fk.references != Some(table.name) {
                    continue;
                }
                let used = tables
                    .get(other.name)
                    .map(|t| t.rows.values().any(|r| r.get(fk.name).and_then(Value::as_i64) == Some(id)))
                    .unwrap_or(false);
                if used {
                    return Some(other.name);
                }
            }
        }
        None
    }

    fn delete_matching(&self, tables: &mut Tables, table: &'static TableDef, filters: &[Filter]) -> Result<u64, StoreError> {
        check_filters(table, filters)?;
        let ids: Vec<i64> = table_ref(tables, table)?
            .rows
            .iter()
            .filter(|(_, r)| matches(r, filters))
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            if let Some(other) = self.referenced_by(tables, table, *id) {
                return Err(StoreError::Constraint(format!(
                    "update or delete on table \"{}\" violates foreign key constraint: key {} is still referenced from table \"{}\"",
                    table.name, id, other
                )));
            }
        }
        let data = table_mut(tables, table)?;
        for id in &ids {
            data.rows.remove(id);
        }
        Ok(ids.len() as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select_all(&self, table: &'static TableDef) -> Result<Vec<Row>, StoreError> {
        let tables = self.lock()?;
        Ok(table_ref(&tables, table)?.rows.values().cloned().collect())
    }

    async fn select_by_id(&self, table: &'static TableDef, id: i64) -> Result<Option<Row>, StoreError> {
        let tables = self.lock()?;
        Ok(table_ref(&tables, table)?.rows.get(&id).cloned())
    }

    async fn select_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        check_filters(table, filters)?;
        let tables = self.lock()?;
        Ok(table_ref(&tables, table)?
            .rows
            .values()
            .filter(|r| matches(r, filters))
            .cloned()
            .collect())
    }

    async fn insert(&self, table: &'static TableDef, values: &Row) -> Result<i64, StoreError> {
        check_columns(table, values)?;
        let mut tables = self.lock()?;
        let id = table_ref(&tables, table)?.next_id + 1;
        let mut row = values.clone();
        row.insert(ID_COLUMN.to_string(), Value::from(id));
        check_row(&tables, table, id, &row)?;
        let data = table_mut(&mut tables, table)?;
        data.next_id = id;
        data.rows.insert(id, row);
        Ok(id)
    }

    async fn update(&self, table: &'static TableDef, id: i64, values: &Row) -> Result<u64, StoreError> {
        check_columns(table, values)?;
        let mut tables = self.lock()?;
        let Some(current) = table_ref(&tables, table)?.rows.get(&id) else {
            return Ok(0);
        };
        let mut row = current.clone();
        for (k, v) in values {
            row.insert(k.clone(), v.clone());
        }
        check_row(&tables, table, id, &row)?;
        table_mut(&mut tables, table)?.rows.insert(id, row);
        Ok(1)
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<u64, StoreError> {
        let mut tables = self.lock()?;
        self.delete_matching(&mut tables, table, &[super::eq(ID_COLUMN, id)])
    }

    async fn delete_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut tables = self.lock()?;
        self.delete_matching(&mut tables, table, filters)
    }

    async fn delete_atomically(&self, steps: &[DeleteStep]) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let mut scratch = tables.clone();
        for step in steps {
            self.delete_matching(&mut scratch, step.table, &[step.filter])?;
        }
        *tables = scratch;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
