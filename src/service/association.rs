//! Envelopes for join-table operations: reverse lookups and link management.

use std::sync::Arc;

use super::handler::{encoded, failure};
use super::messages::AssociationMessages;
use crate::config::{AssociationDef, EntityKind};
use crate::query::AssociationQuery;
use crate::response::{data_many, Envelope};
use crate::store::Store;

pub struct AssociationHandler {
    query: AssociationQuery,
    messages: AssociationMessages,
}

impl AssociationHandler {
    pub fn new(store: Arc<dyn Store>, def: &'static AssociationDef) -> Self {
        AssociationHandler {
            query: AssociationQuery::new(store, def),
            messages: AssociationMessages::of(def),
        }
    }

    pub fn query(&self) -> &AssociationQuery {
        &self.query
    }

    /// Ids on the opposite side of rows whose `role` column equals `value`,
    /// as `{count, <other>_ids: [...]}`.
    pub async fn get_by_filter(&self, role: EntityKind, value: i64) -> Envelope {
        let error = self.messages.filter_error(role, value);
        let Some((other, _)) = self.query.def().other(role) else {
            let unsupported = crate::error::QueryError::UnsupportedFilter {
                table: self.query.def().name(),
                role,
            };
            return failure(error, &unsupported);
        };
        match self.query.other_ids(role, value).await {
            Ok(ids) => encoded(
                self.messages.filter_success(role, value),
                data_many(&format!("{}_ids", other), &ids),
            ),
            Err(e) => failure(error, &e),
        }
    }

    pub async fn create(&self, role: EntityKind, own: i64, other: i64) -> Envelope {
        self.create_list(role, own, &[other]).await
    }

    /// Links `own` to each id; stops at the first rejected link, earlier links stay.
    pub async fn create_list(&self, role: EntityKind, own: i64, others: &[i64]) -> Envelope {
        match self.query.create_list(role, own, others).await {
            Ok(()) => Envelope::success(self.messages.create_success()),
            Err(e) => failure(self.messages.create_error(), &e),
        }
    }

    pub async fn delete(&self, role: EntityKind, own: i64, other: i64) -> Envelope {
        self.delete_list(role, own, &[other]).await
    }

    pub async fn delete_list(&self, role: EntityKind, own: i64, others: &[i64]) -> Envelope {
        match self.query.delete_list(role, own, others).await {
            Ok(removed) => {
                tracing::debug!(association = self.query.def().name(), own, removed, "links removed");
                Envelope::success(self.messages.delete_success())
            }
            Err(e) => failure(self.messages.delete_error(), &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog::{TABLES, TOUR_EVENT};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn filter_reports_other_side_ids() {
        let handler = AssociationHandler::new(Arc::new(MemoryStore::new(&TABLES)), &TOUR_EVENT);
        let env = handler.get_by_filter(EntityKind::Tour, 1).await;
        assert!(env.is_success());
        assert_eq!(env.data_field("count"), Some(&serde_json::json!(0)));
        assert_eq!(env.data_field("event_ids"), Some(&serde_json::json!([])));

        let env = handler.get_by_filter(EntityKind::User, 1).await;
        assert!(!env.is_success());
    }

    #[tokio::test]
    async fn link_to_missing_parents_fails() {
        let handler = AssociationHandler::new(Arc::new(MemoryStore::new(&TABLES)), &TOUR_EVENT);
        let env = handler.create(EntityKind::Tour, 1, 2).await;
        assert!(!env.is_success());
        assert!(env.details.is_none());
    }
}
