//! Deployable stack: resources, outputs, exports, tags and inter-stack dependencies.

use crate::error::ConfigError;
use crate::synth::template::{import_value, logical_id, ExportName, Output, Resource, Token};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

#[derive(Clone, Debug)]
pub struct Stack {
    id: String,
    region: String,
    description: Option<String>,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
    tags: BTreeMap<String, String>,
    dependencies: BTreeSet<String>,
}

impl Stack {
    pub fn new(id: impl Into<String>, region: impl Into<String>) -> Self {
        Stack {
            id: id.into(),
            region: region.into(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
            tags: BTreeMap::new(),
            dependencies: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Construct path under this stack, e.g. `Api-dev/ApiFunction/Role`.
    pub fn path(&self, segments: &[&str]) -> String {
        let mut path = self.id.clone();
        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// Register a resource at the given construct path. Returns its logical id.
    pub fn add_resource(&mut self, segments: &[&str], mut resource: Resource) -> Result<String, ConfigError> {
        let id = logical_id(segments);
        let path = self.path(segments);
        if self.resources.contains_key(&id) {
            return Err(ConfigError::Validation(format!(
                "duplicate construct '{}' (logical id {})",
                path, id
            )));
        }
        tracing::debug!(stack = %self.id, logical_id = %id, resource_type = %resource.type_, "resource registered");
        resource.metadata.path = path;
        self.resources.insert(id.clone(), resource);
        Ok(id)
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resource_mut(&mut self, logical_id: &str) -> Option<&mut Resource> {
        self.resources.get_mut(logical_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.resources.iter()
    }

    pub fn resources_of_type<'a>(&'a self, type_: &'a str) -> impl Iterator<Item = (&'a String, &'a Resource)> + 'a {
        self.resources.iter().filter(move |(_, r)| r.type_ == type_)
    }

    pub fn add_output(&mut self, id: &str, value: Token, description: Option<&str>) {
        self.outputs.insert(
            id.to_string(),
            Output {
                value,
                description: description.map(String::from),
                export: None,
            },
        );
    }

    /// Publish `value` as an exported output and return the token other stacks use to import it.
    pub fn export_value(&mut self, id: &str, value: Token, description: Option<&str>) -> Token {
        let name = format!("{}:{}", self.id, id);
        self.outputs.insert(
            id.to_string(),
            Output {
                value,
                description: description.map(String::from),
                export: Some(ExportName { name: name.clone() }),
            },
        );
        import_value(&name)
    }

    pub fn output(&self, id: &str) -> Option<&Output> {
        self.outputs.get(id)
    }

    /// Record that this stack must deploy after `stack_id`.
    pub fn add_dependency(&mut self, stack_id: &str) {
        if stack_id != self.id {
            self.dependencies.insert(stack_id.to_string());
        }
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    pub fn set_tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Render as a template document.
    pub fn to_template(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("AWSTemplateFormatVersion".into(), json!(TEMPLATE_FORMAT_VERSION));
        if let Some(description) = &self.description {
            doc.insert("Description".into(), json!(description));
        }
        doc.insert("Resources".into(), json!(self.resources));
        if !self.outputs.is_empty() {
            doc.insert("Outputs".into(), json!(self.outputs));
        }
        Value::Object(doc)
    }
}
