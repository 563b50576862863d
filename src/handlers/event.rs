//! Event handlers, including filters and tag links.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;

use super::common::{admin_or_owning_university, id_list, optional_id, read_image};
use crate::access::Role;
use crate::config::catalog::{EVENT_TAG, TOUR_EVENT, UNIVERSITY_EVENT};
use crate::config::EntityKind;
use crate::error::AppError;
use crate::extractors::Caller;
use crate::models::{Event, EventCreate, EventFilter, EventTagList, EventUpdate};
use crate::response::{access_denied, Envelope};
use crate::service::{AssociationHandler, ResponseHandler};
use crate::state::AppState;

type QueryPairs = Query<Vec<(String, String)>>;

fn handler(state: &AppState) -> ResponseHandler<Event> {
    ResponseHandler::from_state(state)
}

pub async fn get_all(State(state): State<AppState>) -> Envelope {
    handler(&state).get_all().await
}

pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Envelope {
    handler(&state).get_by_id(id).await
}

/// `?category_list=..&tag_id=&tour_id=&university_id=`; every supplied criterion applies.
pub async fn filter(State(state): State<AppState>, Query(pairs): QueryPairs) -> Result<Envelope, AppError> {
    let filter = EventFilter {
        categories: id_list(&pairs, "category_list")?,
        tag_id: optional_id(&pairs, "tag_id")?,
        tour_id: optional_id(&pairs, "tour_id")?,
        university_id: optional_id(&pairs, "university_id")?,
    };
    Ok(handler(&state).get_by_filter(&filter).await)
}

/// `?id=1&id=2`
pub async fn by_ids(State(state): State<AppState>, Query(pairs): QueryPairs) -> Result<Envelope, AppError> {
    let ids = id_list(&pairs, "id")?;
    Ok(handler(&state).get_by_id_list(&ids).await)
}

/// `?category_list=1&category_list=2`
pub async fn by_categories(State(state): State<AppState>, Query(pairs): QueryPairs) -> Result<Envelope, AppError> {
    let categories = id_list(&pairs, "category_list")?;
    Ok(handler(&state).get_by_categories(&categories).await)
}

pub async fn by_category(State(state): State<AppState>, Path(category_id): Path<i64>) -> Envelope {
    handler(&state).get_by_category(category_id).await
}

pub async fn create(State(state): State<AppState>, caller: Caller, Json(event): Json<EventCreate>) -> Envelope {
    if !caller.at_least(Role::University) {
        return access_denied();
    }
    handler(&state).create(event).await
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(event): Json<EventUpdate>,
) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, id).await {
        return access_denied();
    }
    handler(&state).update_at(id, event).await
}

pub async fn delete(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, id).await {
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
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, id).await {
        return Ok(access_denied());
    }
    let image = read_image(multipart).await?;
    Ok(handler(&state).update_image(id, image).await)
}

pub async fn delete_image(State(state): State<AppState>, caller: Caller, Path(id): Path<i64>) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, id).await {
        return access_denied();
    }
    handler(&state).delete_image(id).await
}

fn tag_links(state: &AppState) -> AssociationHandler {
    AssociationHandler::new(state.store.clone(), &EVENT_TAG)
}

fn mismatched(path_id: i64, body_id: i64) -> Option<Envelope> {
    (path_id != body_id).then(|| {
        Envelope::error("Failed to change event tags")
            .with_details(format!("Path id={} does not match event_id={} in the body", path_id, body_id))
    })
}

pub async fn add_tags(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(body): Json<EventTagList>,
) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, body.event_id).await {
        return access_denied();
    }
    if let Some(rejected) = mismatched(id, body.event_id) {
        return rejected;
    }
    tag_links(&state).create_list(EntityKind::Event, body.event_id, &body.tag_ids).await
}

pub async fn remove_tags(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(body): Json<EventTagList>,
) -> Envelope {
    if !admin_or_owning_university(&state, &caller, &UNIVERSITY_EVENT, body.event_id).await {
        return access_denied();
    }
    if let Some(rejected) = mismatched(id, body.event_id) {
        return rejected;
    }
    tag_links(&state).delete_list(EntityKind::Event, body.event_id, &body.tag_ids).await
}

/// Event ids of a tour.
pub async fn by_tour(State(state): State<AppState>, Path(tour_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &TOUR_EVENT)
        .get_by_filter(EntityKind::Tour, tour_id)
        .await
}

/// Event ids carrying a tag.
pub async fn by_tag(State(state): State<AppState>, Path(tag_id): Path<i64>) -> Envelope {
    tag_links(&state).get_by_filter(EntityKind::Tag, tag_id).await
}

/// Event ids of a university.
pub async fn by_university(State(state): State<AppState>, Path(university_id): Path<i64>) -> Envelope {
    AssociationHandler::new(state.store.clone(), &UNIVERSITY_EVENT)
        .get_by_filter(EntityKind::University, university_id)
        .await
}
