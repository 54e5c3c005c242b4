//! Cloud assembly: every synthesized stack template plus a manifest for the external deploy step.

use crate::synth::stack::Stack;
use serde_json::{json, Map, Value};
use std::path::Path;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const ASSEMBLY_VERSION: &str = "36.0.0";

#[derive(Clone, Debug, Default)]
pub struct CloudAssembly {
    stacks: Vec<Stack>,
}

impl CloudAssembly {
    pub fn new(stacks: Vec<Stack>) -> Self {
        CloudAssembly { stacks }
    }

    /// Stacks in composition order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, id: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.id() == id)
    }

    pub fn stack_ids(&self) -> Vec<&str> {
        self.stacks.iter().map(Stack::id).collect()
    }

    pub fn template_file(stack_id: &str) -> String {
        format!("{}.template.json", stack_id)
    }

    /// Manifest: one artifact per stack with environment, tags, dependencies and template file.
    pub fn manifest(&self) -> Value {
        let mut artifacts = Map::new();
        for stack in &self.stacks {
            artifacts.insert(
                stack.id().to_string(),
                json!({
                    "type": "aws:cloudformation:stack",
                    "environment": format!("aws://unknown-account/{}", stack.region()),
                    "properties": {
                        "templateFile": Self::template_file(stack.id()),
                        "tags": stack.tags(),
                    },
                    "dependencies": stack.dependencies(),
                }),
            );
        }
        json!({
            "version": ASSEMBLY_VERSION,
            "artifacts": artifacts,
        })
    }

    /// Write every template and the manifest into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        for stack in &self.stacks {
            let path = dir.join(Self::template_file(stack.id()));
            std::fs::write(&path, serde_json::to_string_pretty(&stack.to_template())?)?;
            tracing::info!(stack = %stack.id(), path = %path.display(), "template written");
        }
        std::fs::write(dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&self.manifest())?)?;
        Ok(())
    }
}

/// True when every key in `expected` is present in `actual` with a matching value.
/// Objects match partially (recursively); arrays and scalars must match exactly.
pub fn matches_partial(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(a), Value::Object(e)) => e
            .iter()
            .all(|(k, ev)| a.get(k).map(|av| matches_partial(av, ev)).unwrap_or(false)),
        (Value::Array(a), Value::Array(e)) => {
            a.len() == e.len() && a.iter().zip(e.iter()).all(|(av, ev)| matches_partial(av, ev))
        }
        _ => actual == expected,
    }
}

/// True when `stack` holds a resource of `type_` whose properties partially match `expected`.
pub fn has_resource_properties(stack: &Stack, type_: &str, expected: &Value) -> bool {
    stack
        .resources_of_type(type_)
        .any(|(_, r)| matches_partial(&r.properties, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::template::Resource;

    #[test]
    fn partial_match_ignores_extra_keys() {
        let actual = json!({"a": 1, "b": {"c": 2, "d": 3}});
        assert!(matches_partial(&actual, &json!({"b": {"c": 2}})));
        assert!(!matches_partial(&actual, &json!({"b": {"c": 3}})));
        assert!(!matches_partial(&actual, &json!({"z": 1})));
    }

    #[test]
    fn writes_templates_and_manifest() {
        let mut stack = Stack::new("Database-dev", "us-east-1");
        stack
            .add_resource(&["AppTable", "Table"], Resource::new("AWS::DynamoDB::Table", json!({})))
            .unwrap();
        stack.set_tag("Environment", "dev");
        let assembly = CloudAssembly::new(vec![stack]);

        let dir = tempfile::tempdir().unwrap();
        assembly.write_to(dir.path()).unwrap();

        let template: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("Database-dev.template.json")).unwrap()).unwrap();
        assert_eq!(template["Resources"]["AppTableTable"]["Type"], "AWS::DynamoDB::Table");
        let manifest: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(manifest["artifacts"]["Database-dev"]["properties"]["tags"]["Environment"], "dev");
        assert_eq!(manifest["artifacts"]["Database-dev"]["environment"], "aws://unknown-account/us-east-1");
    }
}
