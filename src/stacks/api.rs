//! API stack: the items handler function behind a REST gateway.

use crate::config::{DeployContext, API_CONFIG};
use crate::constructs::{
    ApiGateway, ApiGatewayProps, LambdaFunction, LambdaFunctionProps, PolicyStatement, ThrottleSettings,
};
use crate::error::ConfigError;
use crate::stacks::handles::{stack_id, ApiHandle, FunctionHandle, TableHandle};
use crate::synth::Stack;
use std::collections::BTreeMap;

pub const SUBSYSTEM: &str = "Api";
/// Where the packaged `handler` binary is expected.
pub const HANDLER_CODE_PATH: &str = "target/lambda/handler";

/// Exactly the table actions the handler needs.
pub const TABLE_ACTIONS: [&str; 6] = [
    "dynamodb:GetItem",
    "dynamodb:PutItem",
    "dynamodb:UpdateItem",
    "dynamodb:DeleteItem",
    "dynamodb:Query",
    "dynamodb:Scan",
];

/// Path/method bindings, all served by the one function.
pub const ROUTES: [(&str, &str); 5] = [
    ("/items", "GET"),
    ("/items", "POST"),
    ("/items/{id}", "GET"),
    ("/items/{id}", "PUT"),
    ("/items/{id}", "DELETE"),
];

pub struct ApiStack {
    pub stack: Stack,
    pub function: FunctionHandle,
    pub api: ApiHandle,
}

impl ApiStack {
    pub fn compose(ctx: &DeployContext, table: &TableHandle) -> Result<Self, ConfigError> {
        let config = API_CONFIG.lookup(&ctx.stage)?;
        let mut stack = Stack::new(stack_id(SUBSYSTEM, &ctx.stage), &ctx.region)
            .with_description(format!("Items API for {} environment", ctx.stage));
        stack.add_dependency(&table.stack_id);

        let mut environment = BTreeMap::new();
        environment.insert("TABLE_NAME".to_string(), table.table_name.clone());
        environment.insert("STAGE".to_string(), ctx.stage.clone());
        let mut function = LambdaFunction::new(
            &mut stack,
            "ApiFunction",
            LambdaFunctionProps {
                function_name: format!("{}-handler", config.api_name),
                code_path: HANDLER_CODE_PATH.to_string(),
                environment,
                ..Default::default()
            },
        )?;
        function.add_to_role_policy(
            &mut stack,
            PolicyStatement::allow(TABLE_ACTIONS, vec![table.table_arn.clone()]),
        )?;

        let mut api = ApiGateway::new(
            &mut stack,
            "Api",
            ApiGatewayProps {
                api_name: config.api_name.to_string(),
                description: Some(format!("API for {} environment", ctx.stage)),
                enable_cors: Some(config.enable_cors),
                stage_name: None,
                throttle: Some(ThrottleSettings {
                    rate_limit: config.throttle_rate_limit,
                    burst_limit: config.throttle_burst_limit,
                }),
            },
        )?;
        for (path, method) in ROUTES {
            api.add_lambda_integration(&mut stack, path, method, &function)?;
        }
        let deployed = api.deploy(&mut stack)?;

        let url = stack.export_value("ApiUrl", deployed.url, Some("Items API invoke URL"));
        tracing::info!(
            stack = %stack.id(),
            api = %config.api_name,
            cors = config.enable_cors,
            routes = ROUTES.len(),
            "api stack composed"
        );

        Ok(ApiStack {
            function: FunctionHandle {
                stack_id: stack.id().to_string(),
                function_name: function.function_name.clone(),
            },
            api: ApiHandle {
                stack_id: stack.id().to_string(),
                url,
            },
            stack,
        })
    }
}
