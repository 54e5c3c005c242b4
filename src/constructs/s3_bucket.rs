//! Object storage bucket with encryption, TLS-only access and owner-enforced ownership.

use crate::constructs::iam::PolicyStatement;
use crate::error::ConfigError;
use crate::synth::{get_att, join, ref_, RemovalPolicy, Resource, Stack, Token};
use serde_json::{json, Value};

pub const BUCKET_RESOURCE_TYPE: &str = "AWS::S3::Bucket";
pub const BUCKET_POLICY_RESOURCE_TYPE: &str = "AWS::S3::BucketPolicy";

#[derive(Clone, Debug, Default)]
pub struct S3BucketProps {
    /// Generated by the provider when absent.
    pub bucket_name: Option<String>,
    pub enable_versioning: Option<bool>,
    pub removal_policy: Option<RemovalPolicy>,
    /// Public access stays blocked unless this is explicitly `false`.
    pub block_public_access: Option<bool>,
}

#[derive(Debug)]
pub struct S3Bucket {
    id: String,
    pub logical_id: String,
    pub policy_logical_id: String,
    /// Extra grants appended after the TLS-enforcement statement.
    grants: Vec<Value>,
}

impl S3Bucket {
    pub fn new(stack: &mut Stack, id: &str, props: S3BucketProps) -> Result<Self, ConfigError> {
        let block = props.block_public_access != Some(false);
        let mut properties = json!({
            "BucketEncryption": {
                "ServerSideEncryptionConfiguration": [{
                    "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" }
                }]
            },
            "PublicAccessBlockConfiguration": {
                "BlockPublicAcls": block,
                "BlockPublicPolicy": block,
                "IgnorePublicAcls": block,
                "RestrictPublicBuckets": block,
            },
            "OwnershipControls": {
                "Rules": [{ "ObjectOwnership": "BucketOwnerEnforced" }]
            },
        });
        if let Some(name) = &props.bucket_name {
            properties["BucketName"] = json!(name);
        }
        if props.enable_versioning.unwrap_or(false) {
            properties["VersioningConfiguration"] = json!({ "Status": "Enabled" });
        }
        let bucket = Resource::new(BUCKET_RESOURCE_TYPE, properties)
            .with_removal_policy(props.removal_policy.unwrap_or(RemovalPolicy::Retain));
        let logical_id = stack.add_resource(&[id, "Bucket"], bucket)?;

        let mut this = S3Bucket {
            id: id.to_string(),
            logical_id,
            policy_logical_id: String::new(),
            grants: Vec::new(),
        };
        let policy = Resource::new(
            BUCKET_POLICY_RESOURCE_TYPE,
            json!({
                "Bucket": ref_(&this.logical_id),
                "PolicyDocument": this.policy_document(),
            }),
        );
        this.policy_logical_id = stack.add_resource(&[id, "Bucket", "Policy"], policy)?;
        Ok(this)
    }

    pub fn arn(&self) -> Token {
        get_att(&self.logical_id, "Arn")
    }

    pub fn name_ref(&self) -> Token {
        ref_(&self.logical_id)
    }

    pub fn regional_domain_name(&self) -> Token {
        get_att(&self.logical_id, "RegionalDomainName")
    }

    /// Token for every object key in the bucket.
    pub fn objects_arn(&self) -> Token {
        join(vec![self.arn(), json!("/*")])
    }

    /// Append a service-principal grant to the bucket policy.
    pub fn grant_to_service(
        &mut self,
        stack: &mut Stack,
        service: &str,
        statement: PolicyStatement,
        condition: Option<Value>,
    ) -> Result<(), ConfigError> {
        let mut grant = statement.to_json();
        grant["Principal"] = json!({ "Service": service });
        if let Some(condition) = condition {
            grant["Condition"] = condition;
        }
        self.grants.push(grant);
        let document = self.policy_document();
        let policy = stack.resource_mut(&self.policy_logical_id).ok_or_else(|| {
            ConfigError::Validation(format!("bucket policy for {} vanished from stack", self.id))
        })?;
        policy.properties["PolicyDocument"] = document;
        Ok(())
    }

    fn policy_document(&self) -> Value {
        let mut statements = vec![json!({
            "Effect": "Deny",
            "Principal": { "AWS": "*" },
            "Action": "s3:*",
            "Resource": [self.arn(), self.objects_arn()],
            "Condition": { "Bool": { "aws:SecureTransport": "false" } },
        })];
        statements.extend(self.grants.iter().cloned());
        json!({ "Version": "2012-10-17", "Statement": statements })
    }
}
