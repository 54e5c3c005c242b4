//! CDN distribution in front of a private bucket, reached through an origin access control.

use crate::constructs::iam::PolicyStatement;
use crate::constructs::s3_bucket::S3Bucket;
use crate::error::ConfigError;
use crate::synth::{account_id, get_att, join, ref_, Resource, Stack, Token};
use serde_json::json;

pub const DISTRIBUTION_RESOURCE_TYPE: &str = "AWS::CloudFront::Distribution";
/// Managed `CachingOptimized` cache policy.
const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";
const ORIGIN_ID: &str = "s3-origin";

#[derive(Clone, Debug, Default)]
pub struct DistributionProps {
    pub comment: Option<String>,
    pub default_root_object: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Distribution {
    pub logical_id: String,
    pub origin_access_control_logical_id: String,
}

impl Distribution {
    /// Serve `bucket` and grant the distribution (and only it) read access to its objects.
    pub fn new(stack: &mut Stack, id: &str, bucket: &mut S3Bucket, props: DistributionProps) -> Result<Self, ConfigError> {
        let oac = Resource::new(
            "AWS::CloudFront::OriginAccessControl",
            json!({
                "OriginAccessControlConfig": {
                    "Name": stack.path(&[id, "OriginAccessControl"]).replace('/', "-"),
                    "OriginAccessControlOriginType": "s3",
                    "SigningBehavior": "always",
                    "SigningProtocol": "sigv4",
                }
            }),
        );
        let oac_id = stack.add_resource(&[id, "OriginAccessControl"], oac)?;

        let mut config = json!({
            "Enabled": true,
            "HttpVersion": "http2",
            "DefaultRootObject": props.default_root_object.as_deref().unwrap_or("index.html"),
            "Origins": [{
                "Id": ORIGIN_ID,
                "DomainName": bucket.regional_domain_name(),
                "S3OriginConfig": { "OriginAccessIdentity": "" },
                "OriginAccessControlId": get_att(&oac_id, "Id"),
            }],
            "DefaultCacheBehavior": {
                "TargetOriginId": ORIGIN_ID,
                "ViewerProtocolPolicy": "redirect-to-https",
                "CachePolicyId": CACHING_OPTIMIZED_POLICY_ID,
                "Compress": true,
            },
        });
        if let Some(comment) = &props.comment {
            config["Comment"] = json!(comment);
        }
        let logical_id = stack.add_resource(
            &[id, "Distribution"],
            Resource::new(DISTRIBUTION_RESOURCE_TYPE, json!({ "DistributionConfig": config })),
        )?;

        let distribution_arn = join(vec![
            json!("arn:aws:cloudfront::"),
            account_id(),
            json!(":distribution/"),
            ref_(&logical_id),
        ]);
        let read_objects = PolicyStatement::allow(["s3:GetObject"], vec![bucket.objects_arn()]);
        bucket.grant_to_service(
            stack,
            "cloudfront.amazonaws.com",
            read_objects,
            Some(json!({ "StringEquals": { "AWS:SourceArn": distribution_arn } })),
        )?;

        Ok(Distribution {
            logical_id,
            origin_access_control_logical_id: oac_id,
        })
    }

    pub fn domain_name(&self) -> Token {
        get_att(&self.logical_id, "DomainName")
    }
}
