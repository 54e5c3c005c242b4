//! Frontend stack: static site bucket, optional CDN, and the API address the site build needs.

use crate::config::{DeployContext, FRONTEND_CONFIG};
use crate::constructs::{Distribution, DistributionProps, S3Bucket, S3BucketProps};
use crate::error::ConfigError;
use crate::stacks::handles::{stack_id, ApiHandle};
use crate::synth::{join, Stack};
use serde_json::json;

pub const SUBSYSTEM: &str = "Frontend";

pub struct FrontendStack {
    pub stack: Stack,
}

impl FrontendStack {
    pub fn compose(ctx: &DeployContext, api: &ApiHandle) -> Result<Self, ConfigError> {
        let config = FRONTEND_CONFIG.lookup(&ctx.stage)?;
        let mut stack = Stack::new(stack_id(SUBSYSTEM, &ctx.stage), &ctx.region)
            .with_description(format!("Static frontend for {} environment", ctx.stage));
        stack.add_dependency(&api.stack_id);

        let mut bucket = S3Bucket::new(
            &mut stack,
            "SiteBucket",
            S3BucketProps {
                enable_versioning: Some(config.enable_versioning),
                ..Default::default()
            },
        )?;
        stack.add_output("SiteBucketName", bucket.name_ref(), Some("Bucket holding the built site"));

        if config.enable_cloud_front {
            let distribution = Distribution::new(
                &mut stack,
                "SiteDistribution",
                &mut bucket,
                DistributionProps {
                    comment: Some(format!("{} frontend", ctx.stage)),
                    default_root_object: None,
                },
            )?;
            stack.add_output("DistributionDomainName", distribution.domain_name(), None);
            let site_url = match config.domain_name {
                Some(domain) => json!(format!("https://{}", domain)),
                None => join(vec![json!("https://"), distribution.domain_name()]),
            };
            stack.add_output("SiteUrl", site_url, Some("Public site address"));
        }

        stack.add_output("ApiUrl", api.url.clone(), Some("API base URL baked into the site build"));
        tracing::info!(
            stack = %stack.id(),
            cdn = config.enable_cloud_front,
            versioning = config.enable_versioning,
            "frontend stack composed"
        );

        Ok(FrontendStack { stack })
    }
}
