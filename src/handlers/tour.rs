//! Tour handlers.

use axum::extract::{Multipart, Path, State};
use axum::Json;

use super::common::{admin_or_owning_university, read_image};
use crate::access::Role;
use crate::config::catalog::{TOUR_EVENT, UNIVERSITY_TOUR};
use crate::config::EntityKind;
use crate::error::AppError;
use crate::extractors::Caller;
use crate::models::{Tour, TourCreate, TourUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::{AssociationHandler, ResponseHandler};
use crate::state::AppState;

fn handler(state: &AppState) -> ResponseHandler<Tour> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

pub async fn create(State(state): State<AppState>, caller: Caller, Json(tour): Json<TourCreate>) -> Envelope {
    if !caller.at_least(Role::University) {
        return access_denied();
    }
    handler(&state).create(tour).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(tour): Json<TourUpdate>,
) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_TOUR, id).await {
        return access_denied();
    }
    handler(&state).update_at(id, tour).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_TOUR, id).await {
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
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_TOUR, id).await {
        return Ok(access_denied());
    }
    let image = read_image(multipart).await?;
    Ok(handler(&state).update_image(id, image).await)
}

pub async fn delete_image(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_TOUR, id).await {
        return access_denied();
    }
    handler(&state).delete_image(id).await
}

/// Tour ids of a university.
pub async fn by_university(State(state): State<AppState>, Path(university_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &UNIVERSITY_TOUR)
        .get_by_filter(EntityKind::University, university_id)
        .await
}

/// Ids of the tours that include an event.
pub async fn by_event(State(state): State<AppState>, Path(event_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &TOUR_EVENT)
        .get_by_filter(EntityKind::Event, event_id)
        .await
}
