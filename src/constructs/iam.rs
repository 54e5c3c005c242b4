//! IAM policy statements and trust documents.

use crate::synth::Token;
use serde_json::{json, Value};

pub const BASIC_EXECUTION_POLICY_ARN: &str = "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<Token>,
}

impl PolicyStatement {
    pub fn allow<I, S>(actions: I, resources: Vec<Token>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PolicyStatement {
            actions: actions.into_iter().map(Into::into).collect(),
            resources,
        }
    }

    pub fn to_json(&self) -> Value {
        let resource = if self.resources.len() == 1 {
            self.resources[0].clone()
        } else {
            Value::Array(self.resources.clone())
        };
        json!({
            "Effect": "Allow",
            "Action": self.actions,
            "Resource": resource,
        })
    }
}

/// Trust policy letting `service` assume a role.
pub fn assume_role_policy(service: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": service },
            "Action": "sts:AssumeRole",
        }],
    })
}

pub fn policy_document(statements: &[PolicyStatement]) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": statements.iter().map(PolicyStatement::to_json).collect::<Vec<_>>(),
    })
}
