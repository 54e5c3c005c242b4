//! Storage stack: the items table.

use crate::config::{DeployContext, DATABASE_CONFIG};
use crate::constructs::{DynamoTable, DynamoTableProps};
use crate::error::ConfigError;
use crate::stacks::handles::{stack_id, TableHandle};
use crate::synth::Stack;

pub const SUBSYSTEM: &str = "Database";
pub const TTL_ATTRIBUTE: &str = "ttl";

pub struct DatabaseStack {
    pub stack: Stack,
    pub table: TableHandle,
}

impl DatabaseStack {
    pub fn compose(ctx: &DeployContext) -> Result<Self, ConfigError> {
        let config = DATABASE_CONFIG.lookup(&ctx.stage)?;
        let mut stack = Stack::new(stack_id(SUBSYSTEM, &ctx.stage), &ctx.region)
            .with_description(format!("Items table for {} environment", ctx.stage));

        let table = DynamoTable::new(
            &mut stack,
            "AppTable",
            DynamoTableProps {
                table_name: config.table_name.to_string(),
                enable_point_in_time_recovery: Some(config.enable_backups),
                removal_policy: None,
                time_to_live_attribute: config.ttl_enabled.then(|| TTL_ATTRIBUTE.to_string()),
            },
        )?;

        let table_arn = stack.export_value("TableArn", table.arn(), Some("Items table ARN"));
        stack.add_output("TableName", table.name_ref(), Some("Items table name"));
        tracing::info!(stack = %stack.id(), table = %table.table_name, backups = config.enable_backups, "database stack composed");

        let table = TableHandle {
            stack_id: stack.id().to_string(),
            table_name: table.table_name,
            table_arn,
        };
        Ok(DatabaseStack { stack, table })
    }
}
