//! Apply the static catalogue to the database: one idempotent CREATE TABLE per table,
//! referenced tables first.

use crate::config::{ColumnDef, TableDef, ID_COLUMN};
use crate::error::AppError;
use crate::sql::quoted;
use sqlx::PgPool;

fn column_ddl(c: &ColumnDef) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.kind.pg_type().to_uppercase());
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if c.unique {
        def.push_str(" UNIQUE");
    }
    if let Some(target) = c.references {
        def.push_str(&format!(" REFERENCES {} ({})", quoted(target), quoted(ID_COLUMN)));
    }
    def
}

/// `CREATE TABLE IF NOT EXISTS` statement for one table.
pub fn create_table_sql(table: &TableDef) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(ID_COLUMN))];
    col_defs.extend(table.columns.iter().map(column_ddl));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(table.name),
        col_defs.join(", ")
    )
}

/// Create every table of `tables` in order. Existing tables are left untouched.
pub async fn apply_migrations(pool: &PgPool, tables: &[&TableDef]) -> Result<(), AppError> {
    for t in tables {
        let sql = create_table_sql(t);
        tracing::debug!(table = t.name, "ensuring table");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(tables = tables.len(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{CATEGORY_TABLE, USER_EVENT_TABLE};

    #[test]
    fn category_ddl() {
        assert_eq!(
            create_table_sql(&CATEGORY_TABLE),
            r#"CREATE TABLE IF NOT EXISTS "category" ("id" BIGSERIAL PRIMARY KEY, "name" TEXT NOT NULL UNIQUE, "description" TEXT)"#
        );
    }

    #[test]
    fn association_columns_reference_parents() {
        let sql = create_table_sql(&USER_EVENT_TABLE);
        assert!(sql.contains(r#""user_id" BIGINT NOT NULL REFERENCES "app_user" ("id")"#));
        assert!(sql.contains(r#""event_id" BIGINT NOT NULL REFERENCES "event" ("id")"#));
        assert!(!sql.contains("CASCADE"));
    }
}
