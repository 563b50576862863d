//! Category handlers. Mutations are admin-only.

use axum::extract::{Path, State};
use axum::Json;

use crate::access::Role;
use crate::extractors::Caller;
use crate::models::{Category, CategoryCreate, CategoryUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::ResponseHandler;
use crate::state::AppState;

fn handler(state: &AppState) -> ResponseHandler<Category> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

pub async fn create(State(state): State<AppState>, caller: Caller, Json(category): Json<CategoryCreate>) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).create(category).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(category): Json<CategoryUpdate>,
) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).update_at(id, category).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).delete(id).await
}
