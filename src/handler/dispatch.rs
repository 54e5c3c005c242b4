//! Method table for the items API. Every failure is normalized in one place.

use crate::error::AppError;
use crate::handler::event::ApiEvent;
use crate::handler::store::{Item, ItemStore, PARTITION_KEY};
use crate::response::{json_response, no_content, ApiResponse};
use serde_json::Value;

const ID_REQUIRED: &str = "ID is required";
const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

/// Handle one event against `store`. Never fails: errors become 400/405/500 responses.
pub async fn handle_request(store: &dyn ItemStore, event: &ApiEvent) -> ApiResponse {
    tracing::debug!(method = %event.http_method, path = %event.path, id = ?event.id(), "event received");
    match route(store, event).await {
        Ok(response) => {
            tracing::info!(method = %event.http_method, path = %event.path, status = response.status_code, "handled");
            response
        }
        Err(e) => {
            tracing::warn!(method = %event.http_method, path = %event.path, error = %e, "request rejected");
            e.into_response()
        }
    }
}

async fn route(store: &dyn ItemStore, event: &ApiEvent) -> Result<ApiResponse, AppError> {
    match event.http_method.as_str() {
        "GET" => match event.id() {
            Some(id) => {
                let item = store.get(id).await?.unwrap_or_default();
                Ok(json_response(200, &Value::Object(item)))
            }
            None => {
                let items = store.scan().await?;
                Ok(json_response(200, &Value::Array(items.into_iter().map(Value::Object).collect())))
            }
        },
        "POST" => {
            let mut item = parse_item(event.body.as_deref())?;
            let pk = generated_key(&item);
            item.insert(PARTITION_KEY.to_string(), Value::String(pk));
            store.put(item.clone()).await?;
            Ok(json_response(201, &Value::Object(item)))
        }
        "PUT" => {
            let id = require_id(event)?;
            let mut item = parse_item(event.body.as_deref())?;
            item.insert(PARTITION_KEY.to_string(), Value::String(id.to_string()));
            store.put(item.clone()).await?;
            Ok(json_response(200, &Value::Object(item)))
        }
        "DELETE" => {
            let id = require_id(event)?;
            store.delete(id).await?;
            Ok(no_content())
        }
        other => Err(AppError::MethodNotAllowed(other.to_string())),
    }
}

fn require_id(event: &ApiEvent) -> Result<&str, AppError> {
    event.id().ok_or_else(|| AppError::BadRequest(ID_REQUIRED.to_string()))
}

/// Body must be a JSON object; a missing body counts as malformed.
fn parse_item(body: Option<&str>) -> Result<Item, AppError> {
    match body.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(item))) => Ok(item),
        _ => Err(AppError::BadRequest(BODY_NOT_OBJECT.to_string())),
    }
}

/// Client `id` when it is a non-empty string or a non-zero number, otherwise the current time in millis.
fn generated_key(item: &Item) -> String {
    match item.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) if id.as_f64() != Some(0.0) => id.to_string(),
        _ => chrono::Utc::now().timestamp_millis().to_string(),
    }
}
