//! Per-entity data access over the generic store. Payloads are converted to rows through
//! serde; linked id lists (tour events) live in their association table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;

use super::AssociationQuery;
use crate::config::{EntityDef, LinkedIds, ID_COLUMN};
use crate::error::{QueryError, StoreError};
use crate::models::{Entity, Identified};
use crate::store::{eq, Row, Store};

pub struct EntityQuery<E: Entity> {
    store: Arc<dyn Store>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityQuery<E> {
    fn clone(&self) -> Self {
        EntityQuery::new(self.store.clone())
    }
}

impl<E: Entity> EntityQuery<E> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        EntityQuery {
            store,
            _entity: PhantomData,
        }
    }

    pub fn def(&self) -> &'static EntityDef {
        E::def()
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    fn linked(&self) -> Option<(&'static LinkedIds, AssociationQuery)> {
        self.def()
            .linked
            .as_ref()
            .map(|l| (l, AssociationQuery::new(self.store.clone(), l.association)))
    }

    /// Payload to row: drops `id` and the linked id field, which are not table columns.
    fn encode<T: Serialize>(&self, payload: &T) -> Result<Row, QueryError> {
        let table = self.def().table.name;
        let value = serde_json::to_value(payload).map_err(|source| QueryError::Encode { table, source })?;
        let mut row = match value {
            Value::Object(map) => map,
            other => {
                return Err(QueryError::Encode {
                    table,
                    source: serde::de::Error::custom(format!("expected an object, got {}", other)),
                })
            }
        };
        row.remove(ID_COLUMN);
        if let Some(l) = &self.def().linked {
            row.remove(l.field);
        }
        Ok(row)
    }

    fn linked_ids<T: Serialize>(&self, payload: &T, field: &str) -> Result<Vec<i64>, QueryError> {
        let table = self.def().table.name;
        let value = serde_json::to_value(payload).map_err(|source| QueryError::Encode { table, source })?;
        Ok(value
            .get(field)
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default())
    }

    /// Row to read schema. An empty image reference reads as "no image".
    fn decode(&self, mut row: Row, linked: Option<Vec<i64>>) -> Result<E::Read, QueryError> {
        let def = self.def();
        if let Some(slot) = &def.image {
            if row.get(slot.column).and_then(Value::as_str) == Some("") {
                row.insert(slot.column.to_string(), Value::Null);
            }
        }
        if let (Some(l), Some(ids)) = (&def.linked, linked) {
            row.insert(l.field.to_string(), Value::from(ids));
        }
        decode_value(def.table.name, Value::Object(row))
    }

    pub async fn get_all(&self) -> Result<Vec<E::Read>, QueryError> {
        let rows = self.store.select_all(self.def().table).await?;
        let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
        if let Some((l, assoc)) = self.linked() {
            let own = assoc_column(l, l.own)?;
            let other = assoc_column(l, l.other)?;
            for r in assoc.get_all().await? {
                if let (Some(o), Some(x)) = (
                    r.get(own).and_then(Value::as_i64),
                    r.get(other).and_then(Value::as_i64),
                ) {
                    grouped.entry(o).or_default().push(x);
                }
            }
        }
        let has_linked = self.def().linked.is_some();
        rows.into_iter()
            .map(|row| {
                let id = row_id(&row);
                let linked = has_linked.then(|| grouped.remove(&id).unwrap_or_default());
                self.decode(row, linked)
            })
            .collect()
    }

    /// `None` when there is no record with this id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<E::Read>, QueryError> {
        let Some(row) = self.store.select_by_id(self.def().table, id).await? else {
            return Ok(None);
        };
        let linked = match self.linked() {
            Some((l, assoc)) => Some(assoc.other_ids(l.own, id).await?),
            None => None,
        };
        self.decode(row, linked).map(Some)
    }

    /// Records for the ids that exist, in the order given; unknown ids are skipped.
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<E::Read>, QueryError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(schema) = self.get_by_id(*id).await? {
                out.push(schema);
            }
        }
        Ok(out)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, QueryError> {
        Ok(self.store.select_by_id(self.def().table, id).await?.is_some())
    }

    /// Inserts the record and its linked rows. Returns the new id.
    pub async fn create(&self, payload: &E::Create) -> Result<i64, QueryError> {
        let row = self.encode(payload)?;
        let id = self.store.insert(self.def().table, &row).await?;
        if let Some((l, assoc)) = self.linked() {
            let ids = self.linked_ids(payload, l.field)?;
            if let Err(e) = assoc.create_list(l.own, id, &ids).await {
                self.undo_create(&assoc, l, id).await;
                return Err(e);
            }
        }
        Ok(id)
    }

    /// Removes a record whose linked rows could not be written.
    async fn undo_create(&self, assoc: &AssociationQuery, l: &LinkedIds, id: i64) {
        let undone = match assoc.delete_by_dependency(l.own, id).await {
            Ok(_) => self.store.delete(self.def().table, id).await.map(|_| ()).map_err(QueryError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = undone {
            tracing::error!(table = self.def().table.name, id, error = %e, "failed to roll back partial create");
        }
    }

    /// Overwrites every column of the record; a linked id list replaces the stored one.
    /// Unknown linked ids are rejected before anything is written.
    pub async fn update(&self, payload: &E::Update) -> Result<(), QueryError> {
        let id = payload.id();
        let row = self.encode(payload)?;
        let Some((l, assoc)) = self.linked() else {
            self.store.update(self.def().table, id, &row).await?;
            return Ok(());
        };
        let ids = self.linked_ids(payload, l.field)?;
        self.check_linked(l, &ids).await?;

        let previous_row = self.store.select_by_id(self.def().table, id).await?;
        let previous_ids = assoc.other_ids(l.own, id).await?;
        self.store.update(self.def().table, id, &row).await?;
        let relinked = match assoc.delete_by_dependency(l.own, id).await {
            Ok(_) => assoc.create_list(l.own, id, &ids).await,
            Err(e) => Err(e),
        };
        if let Err(e) = relinked {
            self.undo_update(&assoc, l, id, previous_row, &previous_ids).await;
            return Err(e);
        }
        Ok(())
    }

    /// Every id must exist in the linked table.
    async fn check_linked(&self, l: &LinkedIds, ids: &[i64]) -> Result<(), QueryError> {
        for id in ids {
            if self.store.select_by_id(l.target, *id).await?.is_none() {
                return Err(StoreError::Constraint(format!("{} id={} does not exist", l.target.name, id)).into());
            }
        }
        Ok(())
    }

    /// Puts back the row and linked ids seen before a failed update.
    async fn undo_update(&self, assoc: &AssociationQuery, l: &LinkedIds, id: i64, row: Option<Row>, ids: &[i64]) {
        let mut restored = Ok(());
        if let Some(mut row) = row {
            row.remove(ID_COLUMN);
            restored = self.store.update(self.def().table, id, &row).await.map(|_| ()).map_err(QueryError::from);
        }
        if restored.is_ok() {
            restored = match assoc.delete_by_dependency(l.own, id).await {
                Ok(_) => assoc.create_list(l.own, id, ids).await,
                Err(e) => Err(e),
            };
        }
        if let Err(e) = restored {
            tracing::error!(table = self.def().table.name, id, error = %e, "failed to roll back partial update");
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), QueryError> {
        self.store.delete(self.def().table, id).await?;
        Ok(())
    }

    /// Current image reference; `None` when unset or empty.
    pub async fn get_image(&self, id: i64) -> Result<Option<String>, QueryError> {
        let slot = self.image_column()?;
        let row = self.store.select_by_id(self.def().table, id).await?;
        Ok(row
            .and_then(|r| r.get(slot).and_then(Value::as_str).map(str::to_string))
            .filter(|s| !s.is_empty()))
    }

    /// Stores `reference` (a link, or "" for no image).
    pub async fn update_image(&self, id: i64, reference: &str) -> Result<(), QueryError> {
        let slot = self.image_column()?;
        let mut row = Row::new();
        row.insert(slot.to_string(), Value::from(reference));
        self.store.update(self.def().table, id, &row).await?;
        Ok(())
    }

    fn image_column(&self) -> Result<&'static str, QueryError> {
        self.def()
            .image
            .map(|s| s.column)
            .ok_or(QueryError::NoImageColumn {
                table: self.def().table.name,
            })
    }

    /// Records whose integer `column` equals `value`.
    pub async fn get_where(&self, column: &'static str, value: i64) -> Result<Vec<E::Read>, QueryError> {
        let rows = self.store.select_where(self.def().table, &[eq(column, value)]).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let linked = match self.linked() {
                Some((l, assoc)) => Some(assoc.other_ids(l.own, row_id(&row)).await?),
                None => None,
            };
            out.push(self.decode(row, linked)?);
        }
        Ok(out)
    }

    /// Records whose `column` matches any of `values`, in id order without duplicates.
    pub async fn get_where_any(&self, column: &'static str, values: &[i64]) -> Result<Vec<E::Read>, QueryError> {
        let wanted: BTreeSet<i64> = values.iter().copied().collect();
        let mut out = Vec::new();
        for value in wanted {
            out.extend(self.get_where(column, value).await?);
        }
        out.sort_by_key(|r| r.id());
        out.dedup_by_key(|r| r.id());
        Ok(out)
    }
}

fn assoc_column(l: &LinkedIds, role: crate::config::EntityKind) -> Result<&'static str, QueryError> {
    l.association.column(role).ok_or(QueryError::UnsupportedFilter {
        table: l.association.name(),
        role,
    })
}

fn row_id(row: &Row) -> i64 {
    row.get(ID_COLUMN).and_then(Value::as_i64).unwrap_or_default()
}

fn decode_value<T: DeserializeOwned>(table: &'static str, value: Value) -> Result<T, QueryError> {
    serde_json::from_value(value).map_err(|source| QueryError::Decode { table, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::TABLES;
    use crate::models::{Category, CategoryCreate, CategoryUpdate, Tour, TourCreate};
    use crate::store::MemoryStore;

    fn store() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new(&TABLES))
    }

    fn tour(events: Vec<i64>) -> TourCreate {
        serde_json::from_value(serde_json::json!({
            "name": "Spring", "description": "d",
            "date_start": "2024-05-01T10:00:00", "date_end": "2024-05-03T18:00:00",
            "reg_deadline": "2024-04-20T00:00:00", "max_users": 30, "events": events
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let q = EntityQuery::<Category>::new(store());
        let id = q
            .create(&CategoryCreate { name: "Sport".into(), description: None })
            .await
            .unwrap();
        let read = q.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(read.name, "Sport");
        assert!(q.get_by_id(id + 1).await.unwrap().is_none());

        q.update(&CategoryUpdate { id, name: "Music".into(), description: Some("live".into()) })
            .await
            .unwrap();
        let all = q.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description.as_deref(), Some("live"));
    }

    #[tokio::test]
    async fn tour_without_events_reads_empty_list() {
        let q = EntityQuery::<Tour>::new(store());
        let id = q.create(&tour(vec![])).await.unwrap();
        assert!(q.get_by_id(id).await.unwrap().unwrap().events.is_empty());
        assert_eq!(q.get_all().await.unwrap()[0].events, Vec::<i64>::new());
    }

    #[tokio::test]
    async fn unknown_linked_event_rolls_the_tour_back() {
        let q = EntityQuery::<Tour>::new(store());
        let err = q.create(&tour(vec![42])).await.unwrap_err();
        assert!(err.is_constraint());
        assert!(q.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_reference_round_trip() {
        let q = EntityQuery::<Tour>::new(store());
        let id = q.create(&tour(vec![])).await.unwrap();
        assert_eq!(q.get_image(id).await.unwrap(), None);
        q.update_image(id, "https://cdn/tour/a.png").await.unwrap();
        assert_eq!(q.get_image(id).await.unwrap().as_deref(), Some("https://cdn/tour/a.png"));
        q.update_image(id, "").await.unwrap();
        assert_eq!(q.get_image(id).await.unwrap(), None);
        assert_eq!(q.get_by_id(id).await.unwrap().unwrap().image, None);
    }

    #[tokio::test]
    async fn categories_have_no_image_column() {
        let q = EntityQuery::<Category>::new(store());
        assert!(matches!(q.get_image(1).await, Err(QueryError::NoImageColumn { .. })));
    }
}
