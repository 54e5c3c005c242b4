//! Template building blocks: resources, removal policies and intrinsic-function tokens.

use serde::Serialize;
use serde_json::{json, Value};

/// Unresolved value rendered as an intrinsic function (`Ref`, `Fn::GetAtt`, ...).
pub type Token = Value;

pub fn ref_(logical_id: &str) -> Token {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Token {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn import_value(export_name: &str) -> Token {
    json!({ "Fn::ImportValue": export_name })
}

pub fn join(parts: Vec<Token>) -> Token {
    json!({ "Fn::Join": ["", parts] })
}

/// Current region pseudo parameter.
pub fn region() -> Token {
    ref_("AWS::Region")
}

pub fn account_id() -> Token {
    ref_("AWS::AccountId")
}

/// What happens to a resource when it leaves the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalPolicy {
    Retain,
    Destroy,
}

impl RemovalPolicy {
    pub fn as_deletion_policy(&self) -> &'static str {
        match self {
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Destroy => "Delete",
        }
    }
}

/// One provider resource in a stack template.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub type_: String,
    pub properties: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    pub metadata: ResourceMetadata,
}

/// Construct path of the resource: `{stack}/{construct}/{child}`.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceMetadata {
    #[serde(rename = "aws:cdk:path")]
    pub path: String,
    /// Local directory packaged as this resource's code asset.
    #[serde(rename = "aws:asset:path", skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
}

impl Resource {
    /// Unattached resource; the construct path is assigned when it is added to a stack.
    pub fn new(type_: &str, properties: Value) -> Self {
        Resource {
            type_: type_.to_string(),
            properties,
            deletion_policy: None,
            update_replace_policy: None,
            depends_on: Vec::new(),
            metadata: ResourceMetadata {
                path: String::new(),
                asset_path: None,
            },
        }
    }

    pub fn with_dependency(mut self, logical_id: &str) -> Self {
        if !self.depends_on.iter().any(|d| d == logical_id) {
            self.depends_on.push(logical_id.to_string());
        }
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.deletion_policy = Some(policy.as_deletion_policy());
        self.update_replace_policy = Some(policy.as_deletion_policy());
        self
    }

    pub fn with_asset_path(mut self, asset_path: &str) -> Self {
        self.metadata.asset_path = Some(asset_path.to_string());
        self
    }

    pub fn path(&self) -> &str {
        &self.metadata.path
    }

    /// Property lookup by top-level key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Stack output, optionally exported for other stacks to import.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportName>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportName {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Logical id from construct path segments: alphanumerics only, each segment capitalized.
pub fn logical_id(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments {
        let mut capitalize = true;
        for c in segment.chars() {
            if c.is_ascii_alphanumeric() {
                if capitalize {
                    out.push(c.to_ascii_uppercase());
                    capitalize = false;
                } else {
                    out.push(c);
                }
            } else {
                capitalize = true;
            }
        }
    }
    out
}
