//! Items routes for local runs: real HTTP requests are adapted into gateway events
//! and answered by the same method table the deployed function uses.

use crate::handler::{handle_request, ApiEvent};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{Method, Uri},
    routing::any,
    Router,
};
use std::collections::HashMap;
use tower_http::limit::RequestBodyLimitLayer;

/// Matches the gateway's payload ceiling.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

fn to_event(method: &Method, uri: &Uri, id: Option<String>, body: String) -> ApiEvent {
    ApiEvent {
        http_method: method.as_str().to_string(),
        path: uri.path().to_string(),
        path_parameters: id.map(|id| HashMap::from([("id".to_string(), id)])),
        body: (!body.is_empty()).then_some(body),
    }
}

async fn collection(State(state): State<AppState>, method: Method, uri: Uri, body: String) -> ApiResponse {
    let event = to_event(&method, &uri, None, body);
    handle_request(state.store.as_ref(), &event).await
}

async fn member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    body: String,
) -> ApiResponse {
    let event = to_event(&method, &uri, Some(id), body);
    handle_request(state.store.as_ref(), &event).await
}

/// `/items` and `/items/:id`, any method. Unsupported methods get the handler's 405.
/// The body ceiling is `MAX_BODY_BYTES`; axum's own smaller default is switched off.
pub fn items_routes(state: AppState) -> Router {
    Router::new()
        .route("/items", any(collection))
        .route("/items/:id", any(member))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::MemoryItemStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        items_routes(AppState::new(Arc::new(MemoryItemStore::new())))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_round_trips_through_http() {
        let app = app();
        let put = Request::builder()
            .method("PUT")
            .uri("/items/abc")
            .body(Body::from(r#"{"name":"widget"}"#))
            .unwrap();
        let response = app.clone().oneshot(put).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let get = Request::builder().uri("/items/abc").body(Body::empty()).unwrap();
        let response = app.oneshot(get).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_json(response).await, serde_json::json!({ "pk": "abc", "name": "widget" }));
    }

    #[tokio::test]
    async fn patch_is_method_not_allowed() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/items/abc")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn body_under_gateway_ceiling_is_accepted() {
        let filler = "x".repeat(3 * 1024 * 1024);
        let body = serde_json::json!({ "id": "big", "blob": filler }).to_string();
        assert!(body.len() > 2 * 1024 * 1024 && body.len() < MAX_BODY_BYTES);
        let request = Request::builder().method("POST").uri("/items").body(Body::from(body)).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn body_over_gateway_ceiling_is_rejected() {
        let body = "x".repeat(MAX_BODY_BYTES + 1);
        let request = Request::builder().method("POST").uri("/items").body(Body::from(body)).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn empty_post_body_is_bad_request() {
        let request = Request::builder().method("POST").uri("/items").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
