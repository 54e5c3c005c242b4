//! Key-value table with a single string partition key `pk`.

use crate::error::ConfigError;
use crate::synth::{get_att, ref_, RemovalPolicy, Resource, Stack, Token};
use serde_json::json;

pub const PARTITION_KEY: &str = "pk";
pub const TABLE_RESOURCE_TYPE: &str = "AWS::DynamoDB::Table";

#[derive(Clone, Debug, Default)]
pub struct DynamoTableProps {
    pub table_name: String,
    /// Defaults to enabled.
    pub enable_point_in_time_recovery: Option<bool>,
    /// Defaults to retain.
    pub removal_policy: Option<RemovalPolicy>,
    /// Attribute holding the expiry epoch seconds, when TTL is wanted.
    pub time_to_live_attribute: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DynamoTable {
    pub logical_id: String,
    pub table_name: String,
}

impl DynamoTable {
    pub fn new(stack: &mut Stack, id: &str, props: DynamoTableProps) -> Result<Self, ConfigError> {
        let mut properties = json!({
            "TableName": props.table_name,
            "BillingMode": "PAY_PER_REQUEST",
            "AttributeDefinitions": [
                { "AttributeName": PARTITION_KEY, "AttributeType": "S" }
            ],
            "KeySchema": [
                { "AttributeName": PARTITION_KEY, "KeyType": "HASH" }
            ],
            "PointInTimeRecoverySpecification": {
                "PointInTimeRecoveryEnabled": props.enable_point_in_time_recovery.unwrap_or(true)
            },
        });
        if let Some(attribute) = &props.time_to_live_attribute {
            properties["TimeToLiveSpecification"] = json!({
                "AttributeName": attribute,
                "Enabled": true,
            });
        }
        let resource = Resource::new(TABLE_RESOURCE_TYPE, properties)
            .with_removal_policy(props.removal_policy.unwrap_or(RemovalPolicy::Retain));
        let logical_id = stack.add_resource(&[id, "Table"], resource)?;
        Ok(DynamoTable {
            logical_id,
            table_name: props.table_name,
        })
    }

    pub fn arn(&self) -> Token {
        get_att(&self.logical_id, "Arn")
    }

    pub fn name_ref(&self) -> Token {
        ref_(&self.logical_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::has_resource_properties;

    fn props(pitr: Option<bool>) -> DynamoTableProps {
        DynamoTableProps {
            table_name: "test-table".into(),
            enable_point_in_time_recovery: pitr,
            ..Default::default()
        }
    }

    #[test]
    fn creates_on_demand_table_keyed_by_pk() {
        let mut stack = Stack::new("Test", "us-east-1");
        DynamoTable::new(&mut stack, "TestTable", props(Some(true))).unwrap();
        assert!(has_resource_properties(
            &stack,
            TABLE_RESOURCE_TYPE,
            &json!({
                "TableName": "test-table",
                "BillingMode": "PAY_PER_REQUEST",
                "AttributeDefinitions": [{ "AttributeName": "pk", "AttributeType": "S" }],
                "KeySchema": [{ "AttributeName": "pk", "KeyType": "HASH" }],
                "PointInTimeRecoverySpecification": { "PointInTimeRecoveryEnabled": true }
            })
        ));
    }

    #[test]
    fn point_in_time_recovery_defaults_on() {
        let mut stack = Stack::new("Test", "us-east-1");
        DynamoTable::new(&mut stack, "TestTable", props(None)).unwrap();
        assert!(has_resource_properties(
            &stack,
            TABLE_RESOURCE_TYPE,
            &json!({ "PointInTimeRecoverySpecification": { "PointInTimeRecoveryEnabled": true } })
        ));
    }

    #[test]
    fn point_in_time_recovery_can_be_disabled() {
        let mut stack = Stack::new("Test", "us-east-1");
        DynamoTable::new(&mut stack, "TestTable", props(Some(false))).unwrap();
        assert!(has_resource_properties(
            &stack,
            TABLE_RESOURCE_TYPE,
            &json!({ "PointInTimeRecoverySpecification": { "PointInTimeRecoveryEnabled": false } })
        ));
    }

    #[test]
    fn retained_by_default_and_ttl_optional() {
        let mut stack = Stack::new("Test", "us-east-1");
        let table = DynamoTable::new(&mut stack, "TestTable", props(None)).unwrap();
        let resource = stack.resource(&table.logical_id).unwrap();
        assert_eq!(resource.deletion_policy, Some("Retain"));
        assert!(resource.property("TimeToLiveSpecification").is_none());

        let mut stack = Stack::new("Test", "us-east-1");
        let with_ttl = DynamoTableProps {
            time_to_live_attribute: Some("ttl".into()),
            removal_policy: Some(RemovalPolicy::Destroy),
            ..props(None)
        };
        let table = DynamoTable::new(&mut stack, "TestTable", with_ttl).unwrap();
        let resource = stack.resource(&table.logical_id).unwrap();
        assert_eq!(resource.deletion_policy, Some("Delete"));
        assert_eq!(resource.properties["TimeToLiveSpecification"]["AttributeName"], "ttl");
    }
}
