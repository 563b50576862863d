//! User handlers: registration, profile, and sign-ups for events, tours and universities.

use axum::extract::{Multipart, Path, State};
use axum::Json;

use super::common::{admin_or_self, read_image};
use crate::access::Role;
use crate::config::catalog::{USER_EVENT, USER_TOUR, USER_UNIVERSITY};
use crate::config::{AssociationDef, EntityKind};
use crate::error::AppError;
use crate::extractors::Caller;
use crate::models::{User, UserCreate, UserUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::{AssociationHandler, ResponseHandler};
use crate::state::AppState;

fn handler(state: &AppState) -> ResponseHandler<User> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

/// Open to every role.
pub async fn create(State(state): State<AppState>, Json(user): Json<UserCreate>) -> Envelope {
    handler(&state).create(user).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(user): Json<UserUpdate>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    handler(&state).update_at(id, user).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    handler(&state).delete(id).await
}

pub async fn update_image(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Envelope, AppError> {
    if !admin_or_self(&caller, Role::User, id) {
        return Ok(access_denied());
    }
    let image = read_image(multipart).await?;
    Ok(handler(&state).update_image(id, image).await)
}

pub async fn delete_image(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    handler(&state).delete_image(id).await
}

fn links(state: &AppState, association: &'static AssociationDef) -> AssociationHandler {
    AssociationHandler::new(state.store.clone(), association)
}

pub async fn join_event(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, event_id)): Path<(i64, i64)>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    links(&state, &USER_EVENT).create(EntityKind::User, id, event_id).await
}

pub async fn leave_event(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, event_id)): Path<(i64, i64)>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    links(&state, &USER_EVENT).delete(EntityKind::User, id, event_id).await
}

pub async fn join_tour(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, tour_id)): Path<(i64, i64)>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    links(&state, &USER_TOUR).create(EntityKind::User, id, tour_id).await
}

pub async fn leave_tour(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, tour_id)): Path<(i64, i64)>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    links(&state, &USER_TOUR).delete(EntityKind::User, id, tour_id).await
}

pub async fn join_university(
    State(state): State<AppState>,
    caller: Caller,
    Path((id, university_id)): Path<(i64, i64)>,
) -> Envelope {
    if !admin_or_self(&caller, Role::User, id) {
        return access_denied();
    }
    links(&state, &USER_UNIVERSITY).create(EntityKind::User, id, university_id).await
}

/// User ids signed up for an event.
pub async fn by_event(State(state): State<AppState>, Path(event_id): Path<i64>) -> Envelope {
    links(&state, &USER_EVENT).get_by_filter(EntityKind::Event, event_id).await
}

/// User ids signed up for a tour.
pub async fn by_tour(State(state): State<AppState>, Path(tour_id): Path<i64>) -> Envelope {
    links(&state, &USER_TOUR).get_by_filter(EntityKind::Tour, tour_id).await
}

/// User ids belonging to a university.
pub async fn by_university(State(state): State<AppState>, Path(university_id): Path<i64>) -> Envelope {
    links(&state, &USER_UNIVERSITY).get_by_filter(EntityKind::University, university_id).await
}
