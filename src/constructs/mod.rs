//! Reusable resource factories with fixed security and operational defaults.

pub mod iam;
pub mod dynamo_table;
pub mod lambda_function;
pub mod api_gateway;
pub mod s3_bucket;
pub mod distribution;

pub use iam::PolicyStatement;
pub use dynamo_table::{DynamoTable, DynamoTableProps};
pub use lambda_function::{LambdaFunction, LambdaFunctionProps, RetentionDays};
pub use api_gateway::{ApiGateway, ApiGatewayProps, DeployedApi, ThrottleSettings};
pub use s3_bucket::{S3Bucket, S3BucketProps};
pub use distribution::{Distribution, DistributionProps};
