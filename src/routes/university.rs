use axum::{
    routing::{get, post, put},
    Router,
};

use super::with_image_limit;
use crate::handlers::university;
use crate::state::AppState;

pub fn university_routes(state: AppState) -> Router {
    let images = Router::new().route(
        "/university/:id/image",
        put(university::update_image).delete(university::delete_image),
    );
    Router::new()
        .route("/university", get(university::get_all).post(university::create))
        .route("/university/", get(university::get_all).post(university::create))
        .route("/university/user_filter/:user_id", get(university::by_user))
        .route(
            "/university/:id",
            get(university::get_by_id).put(university::update).delete(university::delete),
        )
        .route("/university/:id/tours", post(university::add_tour))
        .route("/university/:id/events", post(university::add_event))
        .merge(with_image_limit(images, &state))
        .with_state(state)
}
