//! Monitoring stack: alert topic and alarms over already-built function and table handles.
//!
//! Creates observability bindings only; no tables, functions or gateways are ever added here.

use crate::config::DeployContext;
use crate::error::ConfigError;
use crate::stacks::handles::{stack_id, FunctionHandle, TableHandle};
use crate::synth::{ref_, Resource, Stack};
use serde_json::{json, Value};
use std::time::Duration;

pub const SUBSYSTEM: &str = "Monitoring";
pub const ALARM_RESOURCE_TYPE: &str = "AWS::CloudWatch::Alarm";
const DEFAULT_PERIOD: Duration = Duration::from_secs(300);

/// Where an alarm's datapoints come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricSource {
    FunctionErrors,
    FunctionDuration,
    TableThrottles,
}

impl MetricSource {
    fn namespace(&self) -> &'static str {
        match self {
            MetricSource::FunctionErrors | MetricSource::FunctionDuration => "AWS/Lambda",
            MetricSource::TableThrottles => "AWS/DynamoDB",
        }
    }

    fn metric_name(&self) -> &'static str {
        match self {
            MetricSource::FunctionErrors => "Errors",
            MetricSource::FunctionDuration => "Duration",
            MetricSource::TableThrottles => "ThrottledRequests",
        }
    }

    fn statistic(&self) -> &'static str {
        match self {
            MetricSource::FunctionErrors => "Sum",
            MetricSource::FunctionDuration | MetricSource::TableThrottles => "Average",
        }
    }

    fn dimensions(&self, function: &FunctionHandle, table: &TableHandle) -> Value {
        match self {
            MetricSource::FunctionErrors | MetricSource::FunctionDuration => {
                json!([{ "Name": "FunctionName", "Value": function.function_name }])
            }
            MetricSource::TableThrottles => json!([{ "Name": "TableName", "Value": table.table_name }]),
        }
    }
}

/// Threshold + evaluation window bound to a metric source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertRule {
    pub construct_id: &'static str,
    pub name_suffix: &'static str,
    pub description: &'static str,
    pub metric: MetricSource,
    pub period: Duration,
    pub threshold: u32,
    pub evaluation_periods: u32,
}

pub const ALERT_RULES: [AlertRule; 3] = [
    AlertRule {
        construct_id: "LambdaErrorAlarm",
        name_suffix: "lambda-errors",
        description: "Lambda function error rate is too high",
        metric: MetricSource::FunctionErrors,
        period: DEFAULT_PERIOD,
        threshold: 5,
        evaluation_periods: 2,
    },
    AlertRule {
        construct_id: "LambdaDurationAlarm",
        name_suffix: "lambda-duration",
        description: "Lambda function duration is too high",
        metric: MetricSource::FunctionDuration,
        period: DEFAULT_PERIOD,
        // milliseconds
        threshold: 10_000,
        evaluation_periods: 3,
    },
    AlertRule {
        construct_id: "DynamoThrottleAlarm",
        name_suffix: "dynamo-throttles",
        description: "DynamoDB is being throttled",
        metric: MetricSource::TableThrottles,
        period: DEFAULT_PERIOD,
        threshold: 1,
        evaluation_periods: 1,
    },
];

pub struct MonitoringStack {
    pub stack: Stack,
    pub topic_logical_id: String,
}

impl MonitoringStack {
    pub fn compose(ctx: &DeployContext, function: &FunctionHandle, table: &TableHandle) -> Result<Self, ConfigError> {
        let mut stack = Stack::new(stack_id(SUBSYSTEM, &ctx.stage), &ctx.region)
            .with_description(format!("Alarms for {} environment", ctx.stage));
        stack.add_dependency(&function.stack_id);
        stack.add_dependency(&table.stack_id);

        let topic_logical_id = stack.add_resource(
            &["AlertTopic"],
            Resource::new(
                "AWS::SNS::Topic",
                json!({
                    "TopicName": format!("{}-app-alerts", ctx.stage),
                    "DisplayName": format!("Alerts for {} environment", ctx.stage),
                }),
            ),
        )?;

        if let Some(email) = &ctx.alert_email {
            stack.add_resource(
                &["AlertTopic", "EmailSubscription"],
                Resource::new(
                    "AWS::SNS::Subscription",
                    json!({
                        "Protocol": "email",
                        "Endpoint": email,
                        "TopicArn": ref_(&topic_logical_id),
                    }),
                ),
            )?;
        }

        for rule in &ALERT_RULES {
            let alarm = Resource::new(
                ALARM_RESOURCE_TYPE,
                json!({
                    "AlarmName": format!("{}-{}", ctx.stage, rule.name_suffix),
                    "AlarmDescription": rule.description,
                    "Namespace": rule.metric.namespace(),
                    "MetricName": rule.metric.metric_name(),
                    "Dimensions": rule.metric.dimensions(function, table),
                    "Statistic": rule.metric.statistic(),
                    "Period": rule.period.as_secs(),
                    "Threshold": rule.threshold,
                    "EvaluationPeriods": rule.evaluation_periods,
                    "ComparisonOperator": "GreaterThanOrEqualToThreshold",
                    "AlarmActions": [ref_(&topic_logical_id)],
                }),
            );
            stack.add_resource(&[rule.construct_id], alarm)?;
        }

        tracing::info!(
            stack = %stack.id(),
            alarms = ALERT_RULES.len(),
            email_subscription = ctx.alert_email.is_some(),
            "monitoring stack composed"
        );
        Ok(MonitoringStack { stack, topic_logical_id })
    }
}
