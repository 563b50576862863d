//! Generic response handler: runs one query operation and wraps the outcome in an envelope.
//! Deleting an entity with a dependency registry first clears every registered association.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::messages::Messages;
use super::Validate;
use crate::config::{EntityDef, ID_COLUMN};
use crate::error::QueryError;
use crate::images::{ImageStorage, ImageUpload};
use crate::models::{Entity, Identified};
use crate::query::{AssociationQuery, EntityQuery};
use crate::response::{data_many, data_one, Envelope};
use crate::state::AppState;
use crate::store::{eq, DeleteStep, Store};

pub struct ResponseHandler<E: Entity> {
    query: EntityQuery<E>,
    store: Arc<dyn Store>,
    images: Arc<dyn ImageStorage>,
    atomic_cascade: bool,
    messages: Messages,
}

/// Error envelope for a failed query. Constraint violations get the generic message only.
pub(crate) fn failure(message: String, err: &QueryError) -> Envelope {
    if err.is_constraint() {
        tracing::warn!(error = %err, "{}", message);
        Envelope::error(message)
    } else {
        tracing::error!(error = %err, "{}", message);
        Envelope::error(message).with_details(err.to_string())
    }
}

pub(crate) fn encoded(message: String, data: Result<Map<String, Value>, serde_json::Error>) -> Envelope {
    match data {
        Ok(data) => Envelope::success(message).with_data(data),
        Err(e) => {
            tracing::error!(error = %e, "cannot serialise response data");
            Envelope::error(message).with_details(e.to_string())
        }
    }
}

impl<E: Entity> ResponseHandler<E> {
    pub fn new(store: Arc<dyn Store>, images: Arc<dyn ImageStorage>, atomic_cascade: bool) -> Self {
        ResponseHandler {
            query: EntityQuery::new(store.clone()),
            store,
            images,
            atomic_cascade,
            messages: Messages::of(E::def()),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.images.clone(), state.settings.atomic_cascade)
    }

    pub fn query(&self) -> &EntityQuery<E> {
        &self.query
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    fn def(&self) -> &'static EntityDef {
        E::def()
    }

    /// `{count, plural: [...]}` or the given error message.
    pub fn list(&self, result: Result<Vec<E::Read>, QueryError>, success: String, error: String) -> Envelope {
        match result {
            Ok(schemas) => encoded(success, data_many(self.def().plural, &schemas)),
            Err(e) => failure(error, &e),
        }
    }

    pub async fn get_all(&self) -> Envelope {
        let result = self.query.get_all().await;
        self.list(result, self.messages.get_all_success(), self.messages.get_all_error())
    }

    pub async fn get_by_id(&self, id: i64) -> Envelope {
        match self.query.get_by_id(id).await {
            Ok(Some(schema)) => encoded(self.messages.get_one_success(id), data_one(self.def().name, &schema)),
            Ok(None) => Envelope::error(self.messages.get_one_error(id)).with_details(self.messages.wrong_id(id)),
            Err(e) => failure(self.messages.get_one_error(id), &e),
        }
    }

    /// Records for the given ids; ids without a record are left out.
    pub async fn get_by_id_list(&self, ids: &[i64]) -> Envelope {
        let result = self.query.get_by_ids(ids).await;
        self.list(result, self.messages.get_all_success(), self.messages.get_all_error())
    }

    pub async fn create(&self, payload: E::Create) -> Envelope {
        if let Err(e) = payload.validate() {
            return Envelope::error(self.messages.create_error()).with_details(e.to_string());
        }
        match self.query.create(&payload).await {
            Ok(id) => {
                tracing::info!(entity = self.def().name, id, "created");
                Envelope::success(self.messages.create_success())
            }
            Err(e) => failure(self.messages.create_error(), &e),
        }
    }

    /// Existence is checked first; an unknown id is reported and nothing is written.
    pub async fn update(&self, payload: E::Update) -> Envelope {
        let id = payload.id();
        if let Some(rejected) = self.require_existing(id, self.messages.update_error(id)).await {
            return rejected;
        }
        if let Err(e) = payload.validate() {
            return Envelope::error(self.messages.update_error(id)).with_details(e.to_string());
        }
        match self.query.update(&payload).await {
            Ok(()) => Envelope::success(self.messages.update_success(id)),
            Err(e) => failure(self.messages.update_error(id), &e),
        }
    }

    /// Like `update`, but the id in the route must match the one in the body.
    pub async fn update_at(&self, path_id: i64, payload: E::Update) -> Envelope {
        if payload.id() != path_id {
            return Envelope::error(self.messages.update_error(path_id))
                .with_details(self.messages.id_mismatch(path_id, payload.id()));
        }
        self.update(payload).await
    }

    /// Cascade delete: every registered association in declaration order, then the record.
    pub async fn delete(&self, id: i64) -> Envelope {
        if let Some(rejected) = self.require_existing(id, self.messages.delete_error(id)).await {
            return rejected;
        }
        let outcome = if self.atomic_cascade {
            self.delete_atomically(id).await
        } else {
            self.delete_in_steps(id).await
        };
        match outcome {
            Ok(()) => {
                tracing::info!(entity = self.def().name, id, "deleted");
                Envelope::success(self.messages.delete_success(id))
            }
            Err(rejected) => rejected,
        }
    }

    /// Each step commits on its own; a failed step leaves earlier steps applied.
    async fn delete_in_steps(&self, id: i64) -> Result<(), Envelope> {
        for dep in self.def().dependencies {
            let assoc = AssociationQuery::new(self.store.clone(), dep.association);
            match assoc.delete_by_dependency(dep.role, id).await {
                Ok(removed) => {
                    tracing::debug!(association = dep.association.name(), id, removed, "cascade step done");
                }
                Err(e) => {
                    let message = self.messages.dependency_error(dep.association.name(), id);
                    tracing::error!(error = %e, "{}", message);
                    return Err(Envelope::error(message).with_details(e.to_string()));
                }
            }
        }
        self.query
            .delete(id)
            .await
            .map_err(|e| failure(self.messages.delete_error(id), &e))
    }

    async fn delete_atomically(&self, id: i64) -> Result<(), Envelope> {
        let steps = cascade_steps(self.def(), id);
        self.store
            .delete_atomically(&steps)
            .await
            .map_err(|e| failure(self.messages.delete_error(id), &QueryError::from(e)))
    }

    /// `Some(envelope)` when the record is missing or the lookup failed.
    async fn require_existing(&self, id: i64, error: String) -> Option<Envelope> {
        match self.query.exists(id).await {
            Ok(true) => None,
            Ok(false) => Some(Envelope::error(error).with_details(self.messages.wrong_id(id))),
            Err(e) => Some(failure(error, &e)),
        }
    }

    /// Replace the image: the old object is deleted best-effort, then the new one is
    /// uploaded and its link stored.
    pub async fn update_image(&self, id: i64, image: ImageUpload) -> Envelope {
        let error = self.messages.image_error(id);
        let Some(slot) = self.def().image else {
            return failure(error, &QueryError::NoImageColumn { table: self.def().table.name });
        };
        if let Some(rejected) = self.require_existing(id, error.clone()).await {
            return rejected;
        }
        match self.query.get_image(id).await {
            Ok(Some(old)) => self.discard_image(id, &old).await,
            Ok(None) => {}
            Err(e) => return failure(error, &e),
        }
        let link = match self.images.upload(image, slot.directory).await {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(entity = self.def().name, id, error = %e, "image upload failed");
                return Envelope::error(error).with_details(e.to_string());
            }
        };
        if let Err(e) = self.query.update_image(id, &link).await {
            return failure(error, &e);
        }
        let mut data = Map::new();
        data.insert(slot.column.to_string(), Value::String(link));
        Envelope::success(self.messages.image_success(id)).with_data(data)
    }

    /// Remove the image. An entity without one is reported as an error.
    pub async fn delete_image(&self, id: i64) -> Envelope {
        let error = self.messages.image_error(id);
        if self.def().image.is_none() {
            return failure(error, &QueryError::NoImageColumn { table: self.def().table.name });
        }
        if let Some(rejected) = self.require_existing(id, error.clone()).await {
            return rejected;
        }
        let old = match self.query.get_image(id).await {
            Ok(Some(old)) => old,
            Ok(None) => return Envelope::error(error).with_details(self.messages.no_image(id)),
            Err(e) => return failure(error, &e),
        };
        self.discard_image(id, &old).await;
        match self.query.update_image(id, "").await {
            Ok(()) => Envelope::success(self.messages.image_success(id)),
            Err(e) => failure(error, &e),
        }
    }

    /// Storage-side delete of a stored link. Failures are logged, never returned.
    async fn discard_image(&self, id: i64, link: &str) {
        let Some(slot) = self.def().image else { return };
        let Some(image_id) = self.images.image_id(link, slot.directory) else {
            tracing::warn!(entity = self.def().name, id, link, "stored image link is not recognised");
            return;
        };
        if let Err(e) = self.images.delete_by_id(&image_id, slot.directory).await {
            tracing::warn!(entity = self.def().name, id, image_id = %image_id, error = %e, "old image was not deleted");
        }
    }
}

/// Delete steps for `id` of `def`: each registered association in order, then the record itself.
pub fn cascade_steps(def: &'static EntityDef, id: i64) -> Vec<DeleteStep> {
    def.dependencies
        .iter()
        .filter_map(|dep| {
            dep.association.column(dep.role).map(|column| DeleteStep {
                table: dep.association.table,
                filter: eq(column, id),
            })
        })
        .chain(std::iter::once(DeleteStep {
            table: def.table,
            filter: eq(ID_COLUMN, id),
        }))
        .collect()
}
