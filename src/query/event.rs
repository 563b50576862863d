//! Event filters: by category, by a category list, and the combined filter.

use std::collections::BTreeSet;

use super::{AssociationQuery, EntityQuery};
use crate::config::catalog::{EVENT_TAG, TOUR_EVENT, UNIVERSITY_EVENT};
use crate::config::{AssociationDef, EntityKind};
use crate::error::QueryError;
use crate::models::{Event, EventFilter, EventRead};

const CATEGORY_COLUMN: &str = "category_id";

impl EntityQuery<Event> {
    pub async fn get_by_category(&self, category_id: i64) -> Result<Vec<EventRead>, QueryError> {
        self.get_where(CATEGORY_COLUMN, category_id).await
    }

    pub async fn get_by_categories(&self, categories: &[i64]) -> Result<Vec<EventRead>, QueryError> {
        self.get_where_any(CATEGORY_COLUMN, categories).await
    }

    /// Events matching every supplied criterion. An empty filter returns every event.
    pub async fn get_by_filter(&self, filter: &EventFilter) -> Result<Vec<EventRead>, QueryError> {
        let mut events = if filter.categories.is_empty() {
            self.get_all().await?
        } else {
            self.get_by_categories(&filter.categories).await?
        };
        let criteria: [(Option<i64>, &'static AssociationDef, EntityKind); 3] = [
            (filter.tag_id, &EVENT_TAG, EntityKind::Tag),
            (filter.tour_id, &TOUR_EVENT, EntityKind::Tour),
            (filter.university_id, &UNIVERSITY_EVENT, EntityKind::University),
        ];
        for (value, def, role) in criteria {
            let Some(value) = value else { continue };
            let assoc = AssociationQuery::new(self.store(), def);
            let allowed: BTreeSet<i64> = assoc.other_ids(role, value).await?.into_iter().collect();
            events.retain(|e| allowed.contains(&e.id));
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{CATEGORY_TABLE, TABLES, TAG_TABLE};
    use crate::models::EventCreate;
    use crate::store::{MemoryStore, Row, Store};
    use serde_json::json;
    use std::sync::Arc;

    fn row(v: serde_json::Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn event(name: &str, category_id: i64) -> EventCreate {
        serde_json::from_value(json!({"name": name, "date": "2024-05-01T10:00:00", "category_id": category_id})).unwrap()
    }

    #[tokio::test]
    async fn filters_intersect() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new(&TABLES));
        let c1 = store.insert(&CATEGORY_TABLE, &row(json!({"name": "c1"}))).await.unwrap();
        let c2 = store.insert(&CATEGORY_TABLE, &row(json!({"name": "c2"}))).await.unwrap();
        let c3 = store.insert(&CATEGORY_TABLE, &row(json!({"name": "c3"}))).await.unwrap();
        let tag = store.insert(&TAG_TABLE, &row(json!({"name": "t"}))).await.unwrap();

        let q = EntityQuery::<Event>::new(store.clone());
        let a = q.create(&event("a", c1)).await.unwrap();
        let b = q.create(&event("b", c2)).await.unwrap();
        let c = q.create(&event("c", c3)).await.unwrap();
        AssociationQuery::new(store, &EVENT_TAG)
            .create_list(EntityKind::Tag, tag, &[b, c])
            .await
            .unwrap();

        let ids = |v: Vec<EventRead>| v.into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(q.get_by_category(c1).await.unwrap()), vec![a]);
        assert_eq!(ids(q.get_by_categories(&[c2, c1, c2]).await.unwrap()), vec![a, b]);

        let filter = EventFilter {
            categories: vec![c1, c2],
            tag_id: Some(tag),
            ..EventFilter::default()
        };
        assert_eq!(ids(q.get_by_filter(&filter).await.unwrap()), vec![b]);
        assert_eq!(ids(q.get_by_filter(&EventFilter::default()).await.unwrap()), vec![a, b, c]);
    }
}
