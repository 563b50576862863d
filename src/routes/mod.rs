//! Routers per entity family, merged into one application router.

mod common;
mod event;
mod tour;
mod university;
mod user;

pub use common::service_routes;
pub use event::event_routes;
pub use tour::tour_routes;
pub use university::university_routes;
pub use user::user_routes;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Multipart image routes accept bodies up to `MAX_IMAGE_BYTES` instead of axum's default.
fn with_image_limit(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    routes
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.settings.max_image_bytes))
}

/// Every route of the platform with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(service_routes(state.clone()))
        .merge(tour_routes(state.clone()))
        .merge(event_routes(state.clone()))
        .merge(university_routes(state.clone()))
        .merge(user_routes(state))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn router() -> Router {
        let (state, _) = memory_state(false);
        app(state)
    }

    #[tokio::test]
    async fn health_and_ready() {
        let app = router();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!((status, body), (StatusCode::OK, json!({"status": "ok"})));
        let (status, body) = call(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "memory");
        let (_, body) = call(&app, Method::GET, "/version", None).await;
        assert_eq!(body["name"], "tour-platform");
    }

    #[tokio::test]
    async fn guests_cannot_write() {
        let app = router();
        let (status, body) = call(&app, Method::POST, "/event/category", Some(json!({"name": "Science"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "error", "message": "Access denied"}));

        let (_, body) = call(&app, Method::POST, "/event/category?user_role=user&user_id=1", Some(json!({"name": "Science"}))).await;
        assert_eq!(body["message"], "Access denied");

        let (_, body) = call(&app, Method::GET, "/event/category/", None).await;
        assert_eq!(body["data"]["count"], 0);
    }

    #[tokio::test]
    async fn unknown_role_is_a_bad_request() {
        let app = router();
        let (status, _) = call(&app, Method::DELETE, "/event/tag/1?user_role=root", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_creates_and_lists_with_or_without_trailing_slash() {
        let app = router();
        let (_, body) = call(&app, Method::POST, "/event/category/?user_role=admin", Some(json!({"name": "Science"}))).await;
        assert_eq!(body, json!({"status": "success", "message": "Category created successfully"}));

        for uri in ["/event/category", "/event/category/"] {
            let (_, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(body["status"], "success");
            assert_eq!(body["data"]["categories"][0]["name"], "Science");
        }
        let (_, body) = call(&app, Method::GET, "/event/category/1", None).await;
        assert_eq!(body["data"]["category"]["id"], 1);
    }

    #[tokio::test]
    async fn universities_edit_only_their_own_events() {
        let app = router();
        call(&app, Method::POST, "/event/category?user_role=admin", Some(json!({"name": "Science"}))).await;
        call(&app, Method::POST, "/university?user_role=admin", Some(json!({"name": "TSU"}))).await;
        call(&app, Method::POST, "/university?user_role=admin", Some(json!({"name": "TPU"}))).await;
        let event = json!({"name": "Open day", "date": "2024-05-01T10:00:00+07:00", "category_id": 1});
        let (_, body) = call(&app, Method::POST, "/event?user_role=university&user_id=1", Some(event)).await;
        assert_eq!(body["status"], "success");
        let (_, body) = call(&app, Method::POST, "/university/1/events?user_role=university&user_id=1", Some(json!({"university_id": 1, "event_id": 1}))).await;
        assert_eq!(body["status"], "success");

        let update = json!({"id": 1, "name": "Open house", "date": "2024-05-02T10:00:00", "category_id": 1});
        let (_, body) = call(&app, Method::PUT, "/event/1?user_role=university&user_id=2", Some(update.clone())).await;
        assert_eq!(body["message"], "Access denied");
        let (_, body) = call(&app, Method::PUT, "/event/1?user_role=university&user_id=1", Some(update)).await;
        assert_eq!(body["status"], "success");

        let (_, body) = call(&app, Method::GET, "/event/1", None).await;
        assert_eq!(body["data"]["event"]["name"], "Open house");
        assert_eq!(body["data"]["event"]["date"], "2024-05-02T10:00:00");
    }

    #[tokio::test]
    async fn events_filter_by_repeated_categories() {
        let app = router();
        for name in ["Science", "Sport", "Art"] {
            call(&app, Method::POST, "/event/category?user_role=admin", Some(json!({"name": name}))).await;
        }
        for category_id in [1, 2, 3, 2] {
            let event = json!({"name": "e", "date": "2024-05-01T10:00:00", "category_id": category_id});
            call(&app, Method::POST, "/event?user_role=admin", Some(event)).await;
        }
        let (_, body) = call(&app, Method::GET, "/event/category_filter/?category_list=1&category_list=2", None).await;
        assert_eq!(body["data"]["count"], 3);
        let (_, body) = call(&app, Method::GET, "/event/category_filter?category_list=3", None).await;
        assert_eq!(body["data"]["count"], 1);
        let (_, body) = call(&app, Method::GET, "/event/filter?category_list=2", None).await;
        assert_eq!(body["data"]["count"], 2);
        let (status, _) = call(&app, Method::GET, "/event/filter?category_list=x", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn users_sign_themselves_up() {
        let app = router();
        call(&app, Method::POST, "/user", Some(json!({"name": "Ann", "email": "ann@example.com"}))).await;
        call(&app, Method::POST, "/event/category?user_role=admin", Some(json!({"name": "Science"}))).await;
        call(&app, Method::POST, "/event?user_role=admin", Some(json!({"name": "e", "date": "2024-05-01T10:00:00", "category_id": 1}))).await;

        let (_, body) = call(&app, Method::POST, "/user/1/events/1?user_role=user&user_id=2", None).await;
        assert_eq!(body["message"], "Access denied");
        let (_, body) = call(&app, Method::POST, "/user/1/events/1?user_role=user&user_id=1", None).await;
        assert_eq!(body["status"], "success");
        let (_, body) = call(&app, Method::GET, "/user/event_filter/1", None).await;
        assert_eq!(body["data"]["user_ids"], json!([1]));
    }
}
