//! REST gateway: path resources, Lambda proxy methods, optional CORS preflight, deployment stage.

use crate::constructs::lambda_function::LambdaFunction;
use crate::error::ConfigError;
use crate::synth::{account_id, get_att, join, ref_, region, Resource, Stack, Token};
use serde_json::json;
use std::collections::BTreeMap;

pub const REST_API_RESOURCE_TYPE: &str = "AWS::ApiGateway::RestApi";
pub const METHOD_RESOURCE_TYPE: &str = "AWS::ApiGateway::Method";
pub const DEFAULT_STAGE_NAME: &str = "prod";
pub const CORS_ALLOW_HEADERS: [&str; 2] = ["Content-Type", "Authorization"];
pub const CORS_ALL_METHODS: [&str; 7] = ["OPTIONS", "GET", "PUT", "POST", "DELETE", "PATCH", "HEAD"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottleSettings {
    pub rate_limit: u32,
    pub burst_limit: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ApiGatewayProps {
    pub api_name: String,
    pub description: Option<String>,
    pub enable_cors: Option<bool>,
    pub stage_name: Option<String>,
    pub throttle: Option<ThrottleSettings>,
}

#[derive(Debug)]
pub struct ApiGateway {
    id: String,
    pub logical_id: String,
    enable_cors: bool,
    stage_name: String,
    throttle: Option<ThrottleSettings>,
    /// Path (e.g. `/items/{id}`) → logical id of its path resource. The root is not listed.
    path_resources: BTreeMap<String, String>,
    methods: Vec<String>,
}

/// Handles of a deployed gateway.
#[derive(Clone, Debug)]
pub struct DeployedApi {
    pub rest_api_logical_id: String,
    pub stage_name: String,
    pub url: Token,
}

impl ApiGateway {
    pub fn new(stack: &mut Stack, id: &str, props: ApiGatewayProps) -> Result<Self, ConfigError> {
        let mut properties = json!({ "Name": props.api_name });
        if let Some(description) = &props.description {
            properties["Description"] = json!(description);
        }
        let logical_id = stack.add_resource(&[id, "Api"], Resource::new(REST_API_RESOURCE_TYPE, properties))?;
        let mut api = ApiGateway {
            id: id.to_string(),
            logical_id,
            enable_cors: props.enable_cors.unwrap_or(false),
            stage_name: props.stage_name.unwrap_or_else(|| DEFAULT_STAGE_NAME.to_string()),
            throttle: props.throttle,
            path_resources: BTreeMap::new(),
            methods: Vec::new(),
        };
        if api.enable_cors {
            let root = get_att(&api.logical_id, "RootResourceId");
            api.add_cors_preflight(stack, &[], root)?;
        }
        Ok(api)
    }

    pub fn cors_enabled(&self) -> bool {
        self.enable_cors
    }

    /// Bind `method` on `path` to `function` through a Lambda proxy integration.
    pub fn add_lambda_integration(
        &mut self,
        stack: &mut Stack,
        path: &str,
        method: &str,
        function: &LambdaFunction,
    ) -> Result<(), ConfigError> {
        let method = method.to_ascii_uppercase();
        let segments = path_segments(path);
        let resource_id = self.resource_for_path(stack, &segments)?;

        let invoke_uri = join(vec![
            json!("arn:aws:apigateway:"),
            region(),
            json!(":lambda:path/2015-03-31/functions/"),
            function.arn(),
            json!("/invocations"),
        ]);
        let construct_path = self.construct_path(&segments, &[method.as_str()]);
        let method_resource = Resource::new(
            METHOD_RESOURCE_TYPE,
            json!({
                "HttpMethod": method,
                "ResourceId": resource_id,
                "RestApiId": ref_(&self.logical_id),
                "AuthorizationType": "NONE",
                "Integration": {
                    "Type": "AWS_PROXY",
                    "IntegrationHttpMethod": "POST",
                    "Uri": invoke_uri,
                },
            }),
        );
        let method_id = stack.add_resource(&as_strs(&construct_path), method_resource)?;
        self.methods.push(method_id);

        let source_arn = join(vec![
            json!("arn:aws:execute-api:"),
            region(),
            json!(":"),
            account_id(),
            json!(":"),
            ref_(&self.logical_id),
            json!(format!("/*/{}{}", method, normalized_path(&segments))),
        ]);
        let permission_path = self.construct_path(&segments, &[method.as_str(), "Permission"]);
        stack.add_resource(
            &as_strs(&permission_path),
            Resource::new(
                "AWS::Lambda::Permission",
                json!({
                    "Action": "lambda:InvokeFunction",
                    "FunctionName": function.arn(),
                    "Principal": "apigateway.amazonaws.com",
                    "SourceArn": source_arn,
                }),
            ),
        )?;
        tracing::debug!(api = %self.id, method = %method, path = %normalized_path(&segments), "integration added");
        Ok(())
    }

    /// Create the deployment and stage. Consumes the construct: no methods may be added afterwards.
    pub fn deploy(self, stack: &mut Stack) -> Result<DeployedApi, ConfigError> {
        if self.methods.is_empty() {
            return Err(ConfigError::Validation(format!(
                "API '{}' has no methods to deploy",
                stack.path(&[self.id.as_str()])
            )));
        }
        let mut deployment = Resource::new(
            "AWS::ApiGateway::Deployment",
            json!({
                "RestApiId": ref_(&self.logical_id),
                "Description": "Automatically created deployment",
            }),
        );
        for method in &self.methods {
            deployment = deployment.with_dependency(method);
        }
        let deployment_id = stack.add_resource(&[self.id.as_str(), "Deployment"], deployment)?;

        let mut stage_properties = json!({
            "RestApiId": ref_(&self.logical_id),
            "DeploymentId": ref_(&deployment_id),
            "StageName": self.stage_name,
        });
        if let Some(throttle) = self.throttle {
            stage_properties["MethodSettings"] = json!([{
                "ResourcePath": "/*",
                "HttpMethod": "*",
                "ThrottlingRateLimit": throttle.rate_limit,
                "ThrottlingBurstLimit": throttle.burst_limit,
            }]);
        }
        stack.add_resource(
            &[self.id.as_str(), "DeploymentStage", self.stage_name.as_str()],
            Resource::new("AWS::ApiGateway::Stage", stage_properties),
        )?;

        let url = join(vec![
            json!("https://"),
            ref_(&self.logical_id),
            json!(".execute-api."),
            region(),
            json!(".amazonaws.com/"),
            json!(format!("{}/", self.stage_name)),
        ]);
        Ok(DeployedApi {
            rest_api_logical_id: self.logical_id,
            stage_name: self.stage_name,
            url,
        })
    }

    fn resource_for_path(&mut self, stack: &mut Stack, segments: &[String]) -> Result<Token, ConfigError> {
        let mut parent = get_att(&self.logical_id, "RootResourceId");
        for depth in 1..=segments.len() {
            let prefix = &segments[..depth];
            let key = normalized_path(prefix);
            let logical_id = match self.path_resources.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let construct_path = self.construct_path(prefix, &[]);
                    let id = stack.add_resource(
                        &as_strs(&construct_path),
                        Resource::new(
                            "AWS::ApiGateway::Resource",
                            json!({
                                "ParentId": parent,
                                "PathPart": prefix[depth - 1],
                                "RestApiId": ref_(&self.logical_id),
                            }),
                        ),
                    )?;
                    self.path_resources.insert(key, id.clone());
                    if self.enable_cors {
                        self.add_cors_preflight(stack, prefix, ref_(&id))?;
                    }
                    id
                }
            };
            parent = ref_(&logical_id);
        }
        Ok(parent)
    }

    fn add_cors_preflight(&mut self, stack: &mut Stack, segments: &[String], resource_id: Token) -> Result<(), ConfigError> {
        let allow_headers = format!("'{}'", CORS_ALLOW_HEADERS.join(","));
        let allow_methods = format!("'{}'", CORS_ALL_METHODS.join(","));
        let construct_path = self.construct_path(segments, &["OPTIONS"]);
        let id = stack.add_resource(
            &as_strs(&construct_path),
            Resource::new(
                METHOD_RESOURCE_TYPE,
                json!({
                    "HttpMethod": "OPTIONS",
                    "ResourceId": resource_id,
                    "RestApiId": ref_(&self.logical_id),
                    "AuthorizationType": "NONE",
                    "Integration": {
                        "Type": "MOCK",
                        "RequestTemplates": { "application/json": "{ statusCode: 200 }" },
                        "IntegrationResponses": [{
                            "StatusCode": "204",
                            "ResponseParameters": {
                                "method.response.header.Access-Control-Allow-Headers": allow_headers,
                                "method.response.header.Access-Control-Allow-Origin": "'*'",
                                "method.response.header.Access-Control-Allow-Methods": allow_methods,
                            },
                        }],
                    },
                    "MethodResponses": [{
                        "StatusCode": "204",
                        "ResponseParameters": {
                            "method.response.header.Access-Control-Allow-Headers": true,
                            "method.response.header.Access-Control-Allow-Origin": true,
                            "method.response.header.Access-Control-Allow-Methods": true,
                        },
                    }],
                }),
            ),
        )?;
        self.methods.push(id);
        Ok(())
    }

    fn construct_path(&self, segments: &[String], tail: &[&str]) -> Vec<String> {
        let mut path = vec![self.id.clone(), "Default".to_string()];
        path.extend(segments.iter().cloned());
        path.extend(tail.iter().map(|s| s.to_string()));
        path
    }
}

fn path_segments(path: &str) -> Vec<String> {
    path.split('/').filter(|s| !s.is_empty()).map(String::from).collect()
}

fn normalized_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

fn as_strs(parts: &[String]) -> Vec<&str> {
    parts.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::lambda_function::LambdaFunctionProps;

    fn setup(enable_cors: bool) -> (Stack, ApiGateway, LambdaFunction) {
        let mut stack = Stack::new("Api-test", "us-east-1");
        let function = LambdaFunction::new(
            &mut stack,
            "ApiFunction",
            LambdaFunctionProps {
                function_name: "handler".into(),
                code_path: "lambda".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let api = ApiGateway::new(
            &mut stack,
            "Api",
            ApiGatewayProps {
                api_name: "test-api".into(),
                enable_cors: Some(enable_cors),
                ..Default::default()
            },
        )
        .unwrap();
        (stack, api, function)
    }

    fn options_methods(stack: &Stack) -> Vec<&Resource> {
        stack
            .resources_of_type(METHOD_RESOURCE_TYPE)
            .map(|(_, r)| r)
            .filter(|r| r.properties["HttpMethod"] == "OPTIONS")
            .collect()
    }

    #[test]
    fn cors_enabled_adds_unrestricted_preflight_everywhere() {
        let (mut stack, mut api, function) = setup(true);
        api.add_lambda_integration(&mut stack, "/items", "GET", &function).unwrap();
        api.add_lambda_integration(&mut stack, "/items/{id}", "GET", &function).unwrap();
        let preflights = options_methods(&stack);
        // root, /items, /items/{id}
        assert_eq!(preflights.len(), 3);
        let params = &preflights[0].properties["Integration"]["IntegrationResponses"][0]["ResponseParameters"];
        assert_eq!(params["method.response.header.Access-Control-Allow-Origin"], "'*'");
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Headers"],
            "'Content-Type,Authorization'"
        );
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Methods"],
            "'OPTIONS,GET,PUT,POST,DELETE,PATCH,HEAD'"
        );
    }

    #[test]
    fn cors_disabled_has_no_preflight() {
        let (mut stack, mut api, function) = setup(false);
        api.add_lambda_integration(&mut stack, "/items", "GET", &function).unwrap();
        assert!(options_methods(&stack).is_empty());
    }

    #[test]
    fn path_resources_are_shared_between_methods() {
        let (mut stack, mut api, function) = setup(false);
        api.add_lambda_integration(&mut stack, "/items", "GET", &function).unwrap();
        api.add_lambda_integration(&mut stack, "/items", "POST", &function).unwrap();
        api.add_lambda_integration(&mut stack, "/items/{id}", "DELETE", &function).unwrap();
        assert_eq!(stack.resources_of_type("AWS::ApiGateway::Resource").count(), 2);
        assert_eq!(stack.resources_of_type(METHOD_RESOURCE_TYPE).count(), 3);
        assert_eq!(stack.resources_of_type("AWS::Lambda::Permission").count(), 3);
    }

    #[test]
    fn duplicate_binding_is_rejected() {
        let (mut stack, mut api, function) = setup(false);
        api.add_lambda_integration(&mut stack, "/items", "GET", &function).unwrap();
        assert!(api.add_lambda_integration(&mut stack, "/items", "get", &function).is_err());
    }

    #[test]
    fn deploy_applies_throttling_and_exposes_url() {
        let mut stack = Stack::new("Api-test", "us-east-1");
        let function = LambdaFunction::new(
            &mut stack,
            "ApiFunction",
            LambdaFunctionProps {
                function_name: "handler".into(),
                code_path: "lambda".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let mut api = ApiGateway::new(
            &mut stack,
            "Api",
            ApiGatewayProps {
                api_name: "test-api".into(),
                throttle: Some(ThrottleSettings { rate_limit: 100, burst_limit: 200 }),
                ..Default::default()
            },
        )
        .unwrap();
        api.add_lambda_integration(&mut stack, "/items", "GET", &function).unwrap();
        let deployed = api.deploy(&mut stack).unwrap();
        let (_, stage) = stack.resources_of_type("AWS::ApiGateway::Stage").next().unwrap();
        assert_eq!(stage.properties["StageName"], "prod");
        assert_eq!(stage.properties["MethodSettings"][0]["ThrottlingRateLimit"], 100);
        assert_eq!(stage.properties["MethodSettings"][0]["ThrottlingBurstLimit"], 200);
        assert!(deployed.url.to_string().contains("execute-api"));
    }

    #[test]
    fn deploy_without_methods_fails() {
        let (mut stack, api, _) = setup(false);
        assert!(api.deploy(&mut stack).is_err());
    }
}
