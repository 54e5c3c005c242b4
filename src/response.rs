//! HTTP-shaped response produced by the items handler, plus envelope helpers.
//!
//! Converted to the gateway proxy response for Lambda and to an axum response for local runs.

use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::collections::BTreeMap;

pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Status, headers and optional JSON text body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl ApiResponse {
    /// Parse the body back into JSON. `None` for empty bodies or non-JSON text.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }

    /// Headers as an HTTP map. Names or values that are not valid HTTP are dropped.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, value);
            }
        }
        map
    }
}

impl From<ApiResponse> for ApiGatewayProxyResponse {
    fn from(response: ApiResponse) -> Self {
        ApiGatewayProxyResponse {
            status_code: i64::from(response.status_code),
            headers: response.header_map(),
            body: response.body.map(Body::Text),
            ..Default::default()
        }
    }
}

fn cors_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string());
    headers
}

/// JSON response with the permissive cross-origin header.
pub fn json_response(status_code: u16, body: &serde_json::Value) -> ApiResponse {
    let mut headers = cors_headers();
    headers.insert(CONTENT_TYPE_HEADER.to_string(), "application/json".to_string());
    ApiResponse {
        status_code,
        headers,
        body: Some(body.to_string()),
    }
}

pub fn error_response(status_code: u16, message: &str) -> ApiResponse {
    json_response(status_code, &serde_json::json!({ "error": message }))
}

/// 204 with no body and no content type.
pub fn no_content() -> ApiResponse {
    ApiResponse {
        status_code: 204,
        headers: cors_headers(),
        body: None,
    }
}

impl axum::response::IntoResponse for ApiResponse {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let headers = self.header_map();
        let mut response = axum::response::Response::new(axum::body::Body::from(self.body.unwrap_or_default()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_carries_cors_and_content_type() {
        let resp = json_response(200, &serde_json::json!({"pk": "1"}));
        assert_eq!(resp.headers.get(ALLOW_ORIGIN_HEADER).map(String::as_str), Some("*"));
        assert_eq!(
            resp.headers.get(CONTENT_TYPE_HEADER).map(String::as_str),
            Some("application/json")
        );
        assert_eq!(resp.json_body(), Some(serde_json::json!({"pk": "1"})));
    }

    #[test]
    fn no_content_has_no_body_for_the_gateway() {
        let proxy = ApiGatewayProxyResponse::from(no_content());
        assert_eq!(proxy.status_code, 204);
        assert!(proxy.body.is_none());
        assert_eq!(proxy.headers["access-control-allow-origin"], "*");
        assert!(proxy.headers.get("content-type").is_none());
    }

    #[test]
    fn json_body_becomes_gateway_text_body() {
        let proxy = ApiGatewayProxyResponse::from(error_response(405, "Method not allowed"));
        assert_eq!(proxy.status_code, 405);
        assert_eq!(proxy.headers["content-type"], "application/json");
        assert!(matches!(proxy.body, Some(Body::Text(ref text)) if text == r#"{"error":"Method not allowed"}"#));
    }
}
