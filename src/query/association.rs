//! Join-table access. Every operation names the side it filters on by role tag; a role the
//! association does not have is rejected with `UnsupportedFilter`.

use serde_json::Value;
use std::sync::Arc;

use crate::config::{AssociationDef, EntityKind};
use crate::error::QueryError;
use crate::store::{eq, Row, Store};

#[derive(Clone)]
pub struct AssociationQuery {
    store: Arc<dyn Store>,
    def: &'static AssociationDef,
}

impl AssociationQuery {
    pub fn new(store: Arc<dyn Store>, def: &'static AssociationDef) -> Self {
        AssociationQuery { store, def }
    }

    pub fn def(&self) -> &'static AssociationDef {
        self.def
    }

    fn column(&self, role: EntityKind) -> Result<&'static str, QueryError> {
        self.def.column(role).ok_or(QueryError::UnsupportedFilter {
            table: self.def.name(),
            role,
        })
    }

    fn other_column(&self, role: EntityKind) -> Result<&'static str, QueryError> {
        self.def.other(role).map(|(_, c)| c).ok_or(QueryError::UnsupportedFilter {
            table: self.def.name(),
            role,
        })
    }

    fn pair(&self, role: EntityKind, own: i64, other: i64) -> Result<Row, QueryError> {
        let mut row = Row::new();
        row.insert(self.column(role)?.to_string(), Value::from(own));
        row.insert(self.other_column(role)?.to_string(), Value::from(other));
        Ok(row)
    }

    pub async fn get_all(&self) -> Result<Vec<Row>, QueryError> {
        Ok(self.store.select_all(self.def.table).await?)
    }

    /// Association rows whose `role` column equals `value`.
    pub async fn get_by_dependency(&self, role: EntityKind, value: i64) -> Result<Vec<Row>, QueryError> {
        let column = self.column(role)?;
        Ok(self.store.select_where(self.def.table, &[eq(column, value)]).await?)
    }

    /// Ids on the opposite side of rows whose `role` column equals `value`.
    pub async fn other_ids(&self, role: EntityKind, value: i64) -> Result<Vec<i64>, QueryError> {
        let other = self.other_column(role)?;
        let rows = self.get_by_dependency(role, value).await?;
        Ok(rows.iter().filter_map(|r| r.get(other).and_then(Value::as_i64)).collect())
    }

    /// Bulk delete used by cascades. Returns the number of rows removed.
    pub async fn delete_by_dependency(&self, role: EntityKind, value: i64) -> Result<u64, QueryError> {
        let column = self.column(role)?;
        Ok(self.store.delete_where(self.def.table, &[eq(column, value)]).await?)
    }

    /// Links `own` (on the `role` side) to `other`. Returns the association row id.
    pub async fn create(&self, role: EntityKind, own: i64, other: i64) -> Result<i64, QueryError> {
        let row = self.pair(role, own, other)?;
        Ok(self.store.insert(self.def.table, &row).await?)
    }

    /// Links `own` to every id in `others`, stopping at the first failure.
    pub async fn create_list(&self, role: EntityKind, own: i64, others: &[i64]) -> Result<(), QueryError> {
        for other in others {
            self.create(role, own, *other).await?;
        }
        Ok(())
    }

    pub async fn delete_pair(&self, role: EntityKind, own: i64, other: i64) -> Result<u64, QueryError> {
        let filters = [eq(self.column(role)?, own), eq(self.other_column(role)?, other)];
        Ok(self.store.delete_where(self.def.table, &filters).await?)
    }

    pub async fn delete_list(&self, role: EntityKind, own: i64, others: &[i64]) -> Result<u64, QueryError> {
        let mut removed = 0;
        for other in others {
            removed += self.delete_pair(role, own, *other).await?;
        }
        Ok(removed)
    }

    /// Whether `own` (on the `role` side) is linked to `other`. Used for ownership checks.
    pub async fn exists(&self, role: EntityKind, own: i64, other: i64) -> Result<bool, QueryError> {
        let filters = [eq(self.column(role)?, own), eq(self.other_column(role)?, other)];
        let rows = self.store.select_where(self.def.table, &filters).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{CATEGORY_TABLE, EVENT_TABLE, EVENT_TAG, TABLES, TAG_TABLE};
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn seeded() -> (Arc<dyn Store>, i64, i64, i64) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new(&TABLES));
        let row = |v: Value| v.as_object().cloned().unwrap();
        let cat = store.insert(&CATEGORY_TABLE, &row(json!({"name": "c"}))).await.unwrap();
        let event = store
            .insert(&EVENT_TABLE, &row(json!({"name": "e", "date": "2024-05-01T10:00:00", "category_id": cat})))
            .await
            .unwrap();
        let t1 = store.insert(&TAG_TABLE, &row(json!({"name": "t1"}))).await.unwrap();
        let t2 = store.insert(&TAG_TABLE, &row(json!({"name": "t2"}))).await.unwrap();
        (store, event, t1, t2)
    }

    #[tokio::test]
    async fn filters_by_either_side() {
        let (store, event, t1, t2) = seeded().await;
        let q = AssociationQuery::new(store, &EVENT_TAG);
        q.create_list(EntityKind::Event, event, &[t1, t2]).await.unwrap();
        assert_eq!(q.other_ids(EntityKind::Event, event).await.unwrap(), vec![t1, t2]);
        assert_eq!(q.other_ids(EntityKind::Tag, t2).await.unwrap(), vec![event]);
        assert!(q.exists(EntityKind::Tag, t1, event).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_role_is_unsupported() {
        let (store, event, _, _) = seeded().await;
        let q = AssociationQuery::new(store, &EVENT_TAG);
        let err = q.get_by_dependency(EntityKind::Tour, event).await.unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedFilter { role: EntityKind::Tour, .. }));
    }

    #[tokio::test]
    async fn delete_list_and_cascade() {
        let (store, event, t1, t2) = seeded().await;
        let q = AssociationQuery::new(store, &EVENT_TAG);
        q.create_list(EntityKind::Event, event, &[t1, t2]).await.unwrap();
        assert_eq!(q.delete_list(EntityKind::Event, event, &[t1]).await.unwrap(), 1);
        assert_eq!(q.delete_by_dependency(EntityKind::Event, event).await.unwrap(), 1);
        assert!(q.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dangling_link_is_a_constraint_error() {
        let (store, event, _, _) = seeded().await;
        let q = AssociationQuery::new(store, &EVENT_TAG);
        assert!(q.create(EntityKind::Event, event, 99).await.unwrap_err().is_constraint());
    }
}
