//! DynamoDB item store.
//!
//! Items are stored as native attribute maps keyed by `pk` (String). JSON values map to
//! attribute values one to one; string and number sets read back as arrays.

use crate::error::StoreError;
use crate::handler::store::{partition_key, Item, ItemStore, PARTITION_KEY};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Number, Value};
use std::collections::HashMap;
use tracing::{debug, info};

pub struct DynamoItemStore {
    client: Client,
    table_name: String,
}

impl DynamoItemStore {
    /// Load credentials and region from the default provider chain.
    pub async fn new(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::with_client(Client::new(&config), table_name)
    }

    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        info!(table = %table_name, "item store bound to DynamoDB");
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// JSON value to attribute value.
pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(map.iter().map(|(k, v)| (k.clone(), to_attribute(v))).collect()),
    }
}

fn parse_number(raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str::<Number>(raw)
        .map(Value::Number)
        .map_err(|e| StoreError::Conversion(format!("number '{}': {}", raw, e)))
}

/// Attribute value to JSON value. Binary attributes are not representable and fail.
pub fn from_attribute(attribute: &AttributeValue) -> Result<Value, StoreError> {
    Ok(match attribute {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => parse_number(n)?,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => Value::Array(values.iter().map(from_attribute).collect::<Result<_, _>>()?),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), from_attribute(v)?)))
                .collect::<Result<_, StoreError>>()?,
        ),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(values.iter().map(|n| parse_number(n)).collect::<Result<_, _>>()?),
        other => {
            return Err(StoreError::Conversion(format!(
                "unsupported attribute type: {:?}",
                other
            )))
        }
    })
}

pub fn item_to_attributes(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter().map(|(k, v)| (k.clone(), to_attribute(v))).collect()
}

pub fn item_from_attributes(attributes: &HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(k, v)| Ok((k.clone(), from_attribute(v)?)))
        .collect()
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn get(&self, pk: &str) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(pk.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB get_item failed: {}", e)))?;
        debug!(table = %self.table_name, pk = %pk, found = result.item.is_some(), "get_item");
        result.item.as_ref().map(item_from_attributes).transpose()
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut last_evaluated_key = None;
        let mut pages = 0usize;

        loop {
            let mut request = self.client.scan().table_name(&self.table_name);
            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }
            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Backend(format!("DynamoDB scan failed: {}", e)))?;
            pages += 1;

            for attributes in response.items() {
                items.push(item_from_attributes(attributes)?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => last_evaluated_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(table = %self.table_name, items = items.len(), pages = pages, "scan");
        Ok(items)
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        let pk = partition_key(&item)?.to_string();
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB put_item failed: {}", e)))?;
        debug!(table = %self.table_name, pk = %pk, "put_item");
        Ok(())
    }

    async fn delete(&self, pk: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(pk.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB delete_item failed: {}", e)))?;
        debug!(table = %self.table_name, pk = %pk, "delete_item");
        Ok(())
    }
}
