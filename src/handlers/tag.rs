//! Tag handlers. Mutations are admin-only.

use axum::extract::{Path, State};
use axum::Json;

use crate::access::Role;
use crate::config::catalog::EVENT_TAG;
use crate::config::EntityKind;
use crate::extractors::Caller;
use crate::models::{Tag, TagCreate, TagUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::{AssociationHandler, ResponseHandler};
use crate::state::AppState;

fn handler(state: &AppState) -> ResponseHandler<Tag> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

pub async fn create(State(state): State<AppState>, caller: Caller, Json(tag): Json<TagCreate>) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).create(tag).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(tag): Json<TagUpdate>,
) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).update_at(id, tag).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).delete(id).await
}

/// Tag ids of an event.
pub async fn by_event(State(state): State<AppState>, Path(event_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &EVENT_TAG)
        .get_by_filter(EntityKind::Event, event_id)
        .await
}
