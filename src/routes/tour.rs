use axum::{
    routing::{get, put},
    Router,
};

use super::with_image_limit;
use crate::handlers::tour;
use crate::state::AppState;

pub fn tour_routes(state: AppState) -> Router {
    let images = Router::new().route("/tour/:id/image", put(tour::update_image).delete(tour::delete_image));
    Router::new()
        .route("/tour", get(tour::get_all).post(tour::create))
        .route("/tour/", get(tour::get_all).post(tour::create))
        .route("/tour/university_filter/:university_id", get(tour::by_university))
        .route("/tour/event_filter/:event_id", get(tour::by_event))
        .route("/tour/:id", get(tour::get_by_id).put(tour::update).delete(tour::delete))
        .merge(with_image_limit(images, &state))
        .with_state(state)
}
