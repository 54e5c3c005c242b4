//! Request event the method table dispatches on, built from the gateway proxy request
//! or from a local HTTP request.

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiEvent {
    pub http_method: String,
    pub path: String,
    pub path_parameters: Option<HashMap<String, String>>,
    pub body: Option<String>,
}

impl ApiEvent {
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        ApiEvent {
            http_method: http_method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert("id".to_string(), id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Non-empty `pathParameters.id`.
    pub fn id(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|p| p.get("id"))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

impl From<ApiGatewayProxyRequest> for ApiEvent {
    fn from(request: ApiGatewayProxyRequest) -> Self {
        ApiEvent {
            http_method: request.http_method.as_str().to_string(),
            path: request.path.unwrap_or_default(),
            path_parameters: (!request.path_parameters.is_empty()).then_some(request.path_parameters),
            body: request.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn converts_gateway_request() {
        let request = ApiGatewayProxyRequest {
            http_method: Method::PUT,
            path: Some("/items/7".to_string()),
            path_parameters: HashMap::from([("id".to_string(), "7".to_string())]),
            body: Some("{\"name\":\"x\"}".to_string()),
            ..Default::default()
        };
        let event = ApiEvent::from(request);
        assert_eq!(event.http_method, "PUT");
        assert_eq!(event.path, "/items/7");
        assert_eq!(event.id(), Some("7"));
        assert_eq!(event.body.as_deref(), Some("{\"name\":\"x\"}"));
    }

    #[test]
    fn empty_path_parameters_mean_no_id() {
        let request = ApiGatewayProxyRequest {
            http_method: Method::GET,
            path: Some("/items".to_string()),
            ..Default::default()
        };
        let event = ApiEvent::from(request);
        assert_eq!(event.path_parameters, None);
        assert_eq!(event.id(), None);
        assert_eq!(ApiEvent::new("GET", "/items/").with_id("").id(), None);
    }
}
