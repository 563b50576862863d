//! University handlers. A university caller identifies as its own university id.

use axum::extract::{Multipart, Path, State};
use axum::Json;

use super::common::{admin_or_self, read_image};
use crate::access::Role;
use crate::config::catalog::{UNIVERSITY_EVENT, UNIVERSITY_TOUR, USER_UNIVERSITY};
use crate::config::{AssociationDef, EntityKind};
use crate::error::AppError;
use crate::extractors::Caller;
use crate::models::{University, UniversityCreate, UniversityEventLink, UniversityTourLink, UniversityUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::{AssociationHandler, ResponseHandler};
use crate::state::AppState;

fn handler(state: &AppState) -> ResponseHandler<University> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Json(university): Json<UniversityCreate>,
) -> Envelope {
    if !caller.at_least(Role::Admin) {
        return access_denied();
    }
    handler(&state).create(university).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(university): Json<UniversityUpdate>,
) -> Envelope {
    if !admin_or_self(&caller, Role::University, id) {
        return access_denied();
    }
    handler(&state).update_at(id, university).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !caller.at_least(Role::Admin) {
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
    if !admin_or_self(&caller, Role::University, id) {
        return Ok(access_denied());
    }
    let image = read_image(multipart).await?;
    Ok(handler(&state).update_image(id, image).await)
}

pub async fn delete_image(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_self(&caller, Role::University, id) {
        return access_denied();
    }
    handler(&state).delete_image(id).await
}

async fn link(
    state: &AppState,
    caller: &Caller,
    association: &'static AssociationDef,
    path_id: i64,
    university_id: i64,
    other: i64,
) -> Envelope {
    if !admin_or_self(caller, Role::University, university_id) {
        return access_denied();
    }
    if path_id != university_id {
        return Envelope::error(format!("Failed to create {} rows", association.name())).with_details(format!(
            "Path id={} does not match university_id={} in the body",
            path_id, university_id
        ));
    }
    AssociationHandler::new(state.store.clone(), association)
        .create(EntityKind::University, university_id, other)
        .await
}

pub async fn add_tour(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(body): Json<UniversityTourLink>,
) -> Envelope {
    link(&state, &caller, &UNIVERSITY_TOUR, id, body.university_id, body.tour_id).await
}

pub async fn add_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(body): Json<UniversityEventLink>,
) -> Envelope {
    link(&state, &caller, &UNIVERSITY_EVENT, id, body.university_id, body.event_id).await
}

/// University ids a user belongs to.
pub async fn by_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &USER_UNIVERSITY)
        .get_by_filter(EntityKind::User, user_id)
        .await
}
