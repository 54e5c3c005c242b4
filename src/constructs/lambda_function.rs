//! Compute function with its own execution role and log group.

use crate::constructs::iam::{assume_role_policy, policy_document, PolicyStatement, BASIC_EXECUTION_POLICY_ARN};
use crate::error::ConfigError;
use crate::synth::{get_att, join, ref_, RemovalPolicy, Resource, Stack, Token};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MEMORY_MB: u32 = 128;
pub const DEFAULT_HANDLER: &str = "bootstrap";
/// OS-only runtime for a compiled `bootstrap` binary.
pub const DEFAULT_RUNTIME: &str = "provided.al2023";
const ROLE_MAX_SESSION_SECS: u64 = 3600;

/// Log retention in days, restricted to the values the log service accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetentionDays {
    OneDay,
    OneWeek,
    #[default]
    TwoWeeks,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl RetentionDays {
    pub fn days(&self) -> u32 {
        match self {
            RetentionDays::OneDay => 1,
            RetentionDays::OneWeek => 7,
            RetentionDays::TwoWeeks => 14,
            RetentionDays::OneMonth => 30,
            RetentionDays::ThreeMonths => 90,
            RetentionDays::SixMonths => 180,
            RetentionDays::OneYear => 365,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LambdaFunctionProps {
    pub function_name: String,
    /// Directory holding the packaged `bootstrap` binary.
    pub code_path: String,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub timeout: Option<Duration>,
    pub memory_size: Option<u32>,
    pub environment: BTreeMap<String, String>,
    pub log_retention: Option<RetentionDays>,
}

#[derive(Clone, Debug)]
pub struct LambdaFunction {
    id: String,
    pub function_name: String,
    pub logical_id: String,
    pub role_logical_id: String,
    pub log_group_logical_id: String,
    policy_logical_id: Option<String>,
    statements: Vec<PolicyStatement>,
}

impl LambdaFunction {
    pub fn new(stack: &mut Stack, id: &str, props: LambdaFunctionProps) -> Result<Self, ConfigError> {
        let role = Resource::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": assume_role_policy("lambda.amazonaws.com"),
                "ManagedPolicyArns": [BASIC_EXECUTION_POLICY_ARN],
                "MaxSessionDuration": ROLE_MAX_SESSION_SECS,
                "Description": format!("IAM role for Lambda function {}", props.function_name),
            }),
        );
        let role_logical_id = stack.add_resource(&[id, "Role"], role)?;

        // Logs are not business data.
        let log_group = Resource::new(
            "AWS::Logs::LogGroup",
            json!({
                "LogGroupName": format!("/aws/lambda/{}", props.function_name),
                "RetentionInDays": props.log_retention.unwrap_or_default().days(),
            }),
        )
        .with_removal_policy(RemovalPolicy::Destroy);
        let log_group_logical_id = stack.add_resource(&[id, "LogGroup"], log_group)?;

        let mut properties = json!({
            "FunctionName": props.function_name,
            "Runtime": props.runtime.as_deref().unwrap_or(DEFAULT_RUNTIME),
            "Handler": props.handler.as_deref().unwrap_or(DEFAULT_HANDLER),
            "Code": asset_code(&props.code_path),
            "Role": get_att(&role_logical_id, "Arn"),
            "Timeout": props.timeout.unwrap_or(DEFAULT_TIMEOUT).as_secs(),
            "MemorySize": props.memory_size.unwrap_or(DEFAULT_MEMORY_MB),
            "LoggingConfig": { "LogGroup": ref_(&log_group_logical_id) },
        });
        if !props.environment.is_empty() {
            properties["Environment"] = json!({ "Variables": props.environment });
        }
        let function = Resource::new(FUNCTION_RESOURCE_TYPE, properties)
            .with_asset_path(&props.code_path)
            .with_dependency(&role_logical_id);
        let logical_id = stack.add_resource(&[id, "Function"], function)?;

        Ok(LambdaFunction {
            id: id.to_string(),
            function_name: props.function_name,
            logical_id,
            role_logical_id,
            log_group_logical_id,
            policy_logical_id: None,
            statements: Vec::new(),
        })
    }

    /// Attach a statement to the role's default inline policy, creating the policy on first use.
    pub fn add_to_role_policy(&mut self, stack: &mut Stack, statement: PolicyStatement) -> Result<(), ConfigError> {
        self.statements.push(statement);
        let document = policy_document(&self.statements);
        match &self.policy_logical_id {
            Some(policy_id) => {
                let policy = stack
                    .resource_mut(policy_id)
                    .ok_or_else(|| ConfigError::Validation(format!("policy {} vanished from stack", policy_id)))?;
                policy.properties["PolicyDocument"] = document;
            }
            None => {
                let policy = Resource::new(
                    "AWS::IAM::Policy",
                    json!({
                        "PolicyName": format!("{}RoleDefaultPolicy", self.id),
                        "Roles": [ref_(&self.role_logical_id)],
                        "PolicyDocument": document,
                    }),
                );
                let policy_id = stack.add_resource(&[self.id.as_str(), "Role", "DefaultPolicy"], policy)?;
                if let Some(function) = stack.resource_mut(&self.logical_id) {
                    function.depends_on.push(policy_id.clone());
                }
                self.policy_logical_id = Some(policy_id);
            }
        }
        Ok(())
    }

    pub fn arn(&self) -> Token {
        get_att(&self.logical_id, "Arn")
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }
}

fn asset_code(code_path: &str) -> Value {
    let key: String = code_path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    json!({
        "S3Bucket": join(vec![json!("cdk-assets-"), crate::synth::account_id(), json!("-"), crate::synth::region()]),
        "S3Key": format!("{}.zip", key.trim_matches('-')),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::has_resource_properties;

    fn props() -> LambdaFunctionProps {
        LambdaFunctionProps {
            function_name: "fn-handler".into(),
            code_path: "target/lambda/handler".into(),
            ..Default::default()
        }
    }

    #[test]
    fn applies_operational_defaults() {
        let mut stack = Stack::new("Test", "us-east-1");
        let f = LambdaFunction::new(&mut stack, "ApiFunction", props()).unwrap();
        assert!(has_resource_properties(
            &stack,
            FUNCTION_RESOURCE_TYPE,
            &json!({ "Timeout": 30, "MemorySize": 128, "Runtime": "provided.al2023", "Handler": "bootstrap" })
        ));
        let log_group = stack.resource(&f.log_group_logical_id).unwrap();
        assert_eq!(log_group.properties["RetentionInDays"], 14);
        assert_eq!(log_group.properties["LogGroupName"], "/aws/lambda/fn-handler");
        assert_eq!(log_group.deletion_policy, Some("Delete"));
    }

    #[test]
    fn role_starts_with_only_basic_execution() {
        let mut stack = Stack::new("Test", "us-east-1");
        let f = LambdaFunction::new(&mut stack, "ApiFunction", props()).unwrap();
        let role = stack.resource(&f.role_logical_id).unwrap();
        assert_eq!(role.properties["ManagedPolicyArns"], json!([BASIC_EXECUTION_POLICY_ARN]));
        assert_eq!(stack.resources_of_type("AWS::IAM::Policy").count(), 0);
    }

    #[test]
    fn overrides_are_respected() {
        let mut stack = Stack::new("Test", "us-east-1");
        let mut p = props();
        p.timeout = Some(Duration::from_secs(10));
        p.memory_size = Some(512);
        p.log_retention = Some(RetentionDays::OneWeek);
        p.environment.insert("TABLE_NAME".into(), "t".into());
        let f = LambdaFunction::new(&mut stack, "ApiFunction", p).unwrap();
        let function = stack.resource(&f.logical_id).unwrap();
        assert_eq!(function.properties["Timeout"], 10);
        assert_eq!(function.properties["MemorySize"], 512);
        assert_eq!(function.properties["Environment"]["Variables"]["TABLE_NAME"], "t");
        assert_eq!(stack.resource(&f.log_group_logical_id).unwrap().properties["RetentionInDays"], 7);
    }

    #[test]
    fn role_policy_accumulates_statements_in_one_policy() {
        let mut stack = Stack::new("Test", "us-east-1");
        let mut f = LambdaFunction::new(&mut stack, "ApiFunction", props()).unwrap();
        f.add_to_role_policy(&mut stack, PolicyStatement::allow(["s3:GetObject"], vec![json!("arn:a")]))
            .unwrap();
        f.add_to_role_policy(&mut stack, PolicyStatement::allow(["s3:PutObject"], vec![json!("arn:b")]))
            .unwrap();
        let policies: Vec<_> = stack.resources_of_type("AWS::IAM::Policy").collect();
        assert_eq!(policies.len(), 1);
        let statements = policies[0].1.properties["PolicyDocument"]["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 2);
        let function = stack.resource(&f.logical_id).unwrap();
        assert!(function.depends_on.contains(policies[0].0));
    }
}
