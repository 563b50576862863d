//! PostgreSQL backend over a sqlx pool.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{ConnectOptions, PgPool, Postgres, Row as _};
use std::str::FromStr;

use super::{check_columns, DeleteStep, Filter, Row, Store, TIMESTAMP_FORMAT};
use crate::config::{ColumnKind, TableDef, ID_COLUMN};
use crate::error::{AppError, StoreError};
use crate::sql::{self, QueryBuf};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

fn build(q: &QueryBuf) -> Query<'_, Postgres, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.as_deref());
    }
    query
}

/// Constraint rejections become `StoreError::Constraint`; everything else stays a database error.
fn map_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        use sqlx::error::ErrorKind;
        match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => return StoreError::Constraint(db.message().to_string()),
            _ => {}
        }
    }
    StoreError::Database(e)
}

fn row_to_json(table: &TableDef, row: &PgRow) -> Result<Row, StoreError> {
    let mut map = Row::new();
    let id: i64 = row.try_get(ID_COLUMN)?;
    map.insert(ID_COLUMN.to_string(), Value::from(id));
    for c in table.columns {
        let v = match c.kind {
            ColumnKind::BigInt => row.try_get::<Option<i64>, _>(c.name)?.map(Value::from),
            ColumnKind::Text => row.try_get::<Option<String>, _>(c.name)?.map(Value::String),
            ColumnKind::Timestamp => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(c.name)?
                .map(|d| Value::String(d.format(TIMESTAMP_FORMAT).to_string())),
            ColumnKind::Json => row.try_get::<Option<Value>, _>(c.name)?,
        };
        map.insert(c.name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(map)
}

#[async_trait]
impl Store for PgStore {
    async fn select_all(&self, table: &'static TableDef) -> Result<Vec<Row>, StoreError> {
        let q = sql::select_all(table);
        let rows = build(&q).fetch_all(&self.pool).await.map_err(map_err)?;
        rows.iter().map(|r| row_to_json(table, r)).collect()
    }

    async fn select_by_id(&self, table: &'static TableDef, id: i64) -> Result<Option<Row>, StoreError> {
        let q = sql::select_by_id(table, id);
        let row = build(&q).fetch_optional(&self.pool).await.map_err(map_err)?;
        row.map(|r| row_to_json(table, &r)).transpose()
    }

    async fn select_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<Vec<Row>, StoreError> {
        let q = sql::select_where(table, filters)?;
        let rows = build(&q).fetch_all(&self.pool).await.map_err(map_err)?;
        rows.iter().map(|r| row_to_json(table, r)).collect()
    }

    async fn insert(&self, table: &'static TableDef, values: &Row) -> Result<i64, StoreError> {
        check_columns(table, values)?;
        let q = sql::insert(table, values)?;
        let row = build(&q).fetch_one(&self.pool).await.map_err(map_err)?;
        Ok(row.try_get(ID_COLUMN)?)
    }

    async fn update(&self, table: &'static TableDef, id: i64, values: &Row) -> Result<u64, StoreError> {
        check_columns(table, values)?;
        match sql::update(table, id, values)? {
            Some(q) => {
                let done = build(&q).execute(&self.pool).await.map_err(map_err)?;
                Ok(done.rows_affected())
            }
            None => Ok(self.select_by_id(table, id).await?.map(|_| 1).unwrap_or(0)),
        }
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<u64, StoreError> {
        self.delete_where(table, &[super::eq(ID_COLUMN, id)]).await
    }

    async fn delete_where(&self, table: &'static TableDef, filters: &[Filter]) -> Result<u64, StoreError> {
        let q = sql::delete_where(table, filters)?;
        let done = build(&q).execute(&self.pool).await.map_err(map_err)?;
        Ok(done.rows_affected())
    }

    async fn delete_atomically(&self, steps: &[DeleteStep]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        for step in steps {
            let q = sql::delete_where(step.table, &[step.filter])?;
            build(&q).execute(&mut *tx).await.map_err(map_err)?;
        }
        tx.commit().await.map_err(map_err)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_optional(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_err)
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let query = path_and_query.split_once('?').map(|(_, q)| format!("?{}", q)).unwrap_or_default();
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_keeps_query_string() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@host:5432/tours?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@host:5432/postgres?sslmode=disable");
        assert_eq!(db, "tours");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(parse_db_name_from_url("postgres:localhost").is_err());
    }
}
