use axum::{
    routing::{get, post, put},
    Router,
};

use super::with_image_limit;
use crate::handlers::user;
use crate::state::AppState;

pub fn user_routes(state: AppState) -> Router {
    let images = Router::new().route("/user/:id/image", put(user::update_image).delete(user::delete_image));
    Router::new()
        .route("/user", get(user::get_all).post(user::create))
        .route("/user/", get(user::get_all).post(user::create))
        .route("/user/event_filter/:event_id", get(user::by_event))
        .route("/user/tour_filter/:tour_id", get(user::by_tour))
        .route("/user/university_filter/:university_id", get(user::by_university))
        .route("/user/:id", get(user::get_by_id).put(user::update).delete(user::delete))
        .route("/user/:id/events/:event_id", post(user::join_event).delete(user::leave_event))
        .route("/user/:id/tours/:tour_id", post(user::join_tour).delete(user::leave_tour))
        .route("/user/:id/universities/:university_id", post(user::join_university))
        .merge(with_image_limit(images, &state))
        .with_state(state)
}
