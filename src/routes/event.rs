use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::with_image_limit;
use crate::handlers::{category, event, tag};
use crate::state::AppState;

/// `/event/...` including the nested category and tag families.
pub fn event_routes(state: AppState) -> Router {
    let images = Router::new().route("/event/:id/image", put(event::update_image).delete(event::delete_image));
    Router::new()
        .route("/event", get(event::get_all).post(event::create))
        .route("/event/", get(event::get_all).post(event::create))
        .route("/event/filter", get(event::filter))
        .route("/event/by_ids", get(event::by_ids))
        .route("/event/category_filter", get(event::by_categories))
        .route("/event/category_filter/", get(event::by_categories))
        .route("/event/category_filter/:category_id", get(event::by_category))
        .route("/event/tour_filter/:tour_id", get(event::by_tour))
        .route("/event/tag_filter/:tag_id", get(event::by_tag))
        .route("/event/university_filter/:university_id", get(event::by_university))
        .route("/event/:id", get(event::get_by_id).put(event::update).delete(event::delete))
        .route("/event/:id/tags", post(event::add_tags))
        .route("/event/:id/event_tag", delete(event::remove_tags))
        .route("/event/category", get(category::get_all).post(category::create))
        .route("/event/category/", get(category::get_all).post(category::create))
        .route(
            "/event/category/:id",
            get(category::get_by_id).put(category::update).delete(category::delete),
        )
        .route("/event/tag", get(tag::get_all).post(tag::create))
        .route("/event/tag/", get(tag::get_all).post(tag::create))
        .route("/event/tag/event_filter/:event_id", get(tag::by_event))
        .route("/event/tag/:id", get(tag::get_by_id).put(tag::update).delete(tag::delete))
        .merge(with_image_limit(images, &state))
        .with_state(state)
}
