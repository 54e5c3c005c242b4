//! Items handler flows against the in-memory store.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use axum::http::Method;
use modular_stack::handler::{handle_request, ApiEvent, ItemStore, MemoryItemStore};
use serde_json::json;
use std::collections::HashMap;

#[tokio::test]
async fn create_list_update_delete() {
    let store = MemoryItemStore::new();

    let created = handle_request(&store, &ApiEvent::new("POST", "/items").with_body(r#"{"id":"a","qty":1}"#)).await;
    assert_eq!(created.status_code, 201);
    handle_request(&store, &ApiEvent::new("POST", "/items").with_body(r#"{"id":"b","qty":2}"#)).await;

    let listed = handle_request(&store, &ApiEvent::new("GET", "/items")).await;
    assert_eq!(listed.status_code, 200);
    assert_eq!(listed.json_body().unwrap().as_array().unwrap().len(), 2);

    let updated = handle_request(
        &store,
        &ApiEvent::new("PUT", "/items/a").with_id("a").with_body(r#"{"qty":5}"#),
    )
    .await;
    assert_eq!(updated.status_code, 200);
    assert_eq!(store.get("a").await.unwrap().unwrap()["qty"], json!(5));
    // full overwrite drops the old `id` field
    assert!(store.get("a").await.unwrap().unwrap().get("id").is_none());

    let deleted = handle_request(&store, &ApiEvent::new("DELETE", "/items/b").with_id("b")).await;
    assert_eq!(deleted.status_code, 204);
    assert!(store.get("b").await.unwrap().is_none());
}

#[tokio::test]
async fn gateway_request_round_trips_to_proxy_response() {
    let store = MemoryItemStore::new();
    let request = ApiGatewayProxyRequest {
        http_method: Method::GET,
        path: Some("/items/none".to_string()),
        path_parameters: HashMap::from([("id".to_string(), "none".to_string())]),
        ..Default::default()
    };
    let response: ApiGatewayProxyResponse = handle_request(&store, &ApiEvent::from(request)).await.into();
    assert_eq!(response.status_code, 200);
    assert!(matches!(response.body, Some(Body::Text(ref text)) if text == "{}"));
    assert_eq!(response.headers["content-type"], "application/json");
    assert_eq!(response.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn empty_table_lists_as_empty_array() {
    let store = MemoryItemStore::new();
    let response = handle_request(&store, &ApiEvent::new("GET", "/items")).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body(), Some(json!([])));
}
