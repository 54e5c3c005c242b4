//! Entry orchestration: resolve the stage plan, compose stacks in dependency order, tag them.

use crate::config::{validate_tables, DeployContext};
use crate::error::ConfigError;
use crate::stacks::{
    ApiHandle, ApiStack, DatabaseStack, FrontendStack, FunctionHandle, MonitoringStack, TableHandle,
};
use crate::synth::{CloudAssembly, Stack};

pub const PROJECT_NAME: &str = "ModularCDKExample";
pub const ENVIRONMENT_TAG: &str = "Environment";
pub const PROJECT_TAG: &str = "Project";

/// One step of the composition plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composer {
    Database,
    Api,
    Frontend,
    Monitoring,
}

/// Composers to run for a stage, in order. Monitoring is skipped for dev.
pub fn composition_plan(stage: &str) -> Vec<Composer> {
    let mut plan = vec![Composer::Database, Composer::Api, Composer::Frontend];
    if stage != crate::config::DEV {
        plan.push(Composer::Monitoring);
    }
    plan
}

/// Compose every stack for `ctx.stage` into a cloud assembly.
pub fn synthesize(ctx: &DeployContext) -> Result<CloudAssembly, ConfigError> {
    validate_tables()?;
    let plan = composition_plan(&ctx.stage);
    tracing::info!(stage = %ctx.stage, region = %ctx.region, plan = ?plan, "synthesizing");

    let mut stacks: Vec<Stack> = Vec::with_capacity(plan.len());
    let mut table: Option<TableHandle> = None;
    let mut function: Option<FunctionHandle> = None;
    let mut api: Option<ApiHandle> = None;

    for composer in plan {
        match composer {
            Composer::Database => {
                let composed = DatabaseStack::compose(ctx)?;
                table = Some(composed.table);
                stacks.push(composed.stack);
            }
            Composer::Api => {
                let table = table.as_ref().ok_or(ConfigError::MissingHandle("table"))?;
                let composed = ApiStack::compose(ctx, table)?;
                function = Some(composed.function);
                api = Some(composed.api);
                stacks.push(composed.stack);
            }
            Composer::Frontend => {
                let api = api.as_ref().ok_or(ConfigError::MissingHandle("api"))?;
                let composed = FrontendStack::compose(ctx, api)?;
                stacks.push(composed.stack);
            }
            Composer::Monitoring => {
                let function = function.as_ref().ok_or(ConfigError::MissingHandle("function"))?;
                let table = table.as_ref().ok_or(ConfigError::MissingHandle("table"))?;
                let composed = MonitoringStack::compose(ctx, function, table)?;
                stacks.push(composed.stack);
            }
        }
    }

    for stack in &mut stacks {
        stack.set_tag(ENVIRONMENT_TAG, &ctx.stage);
        stack.set_tag(PROJECT_TAG, PROJECT_NAME);
    }
    tracing::info!(stage = %ctx.stage, stacks = stacks.len(), "synthesis complete");
    Ok(CloudAssembly::new(stacks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_skips_monitoring_for_dev() {
        assert_eq!(
            composition_plan("dev"),
            vec![Composer::Database, Composer::Api, Composer::Frontend]
        );
        assert_eq!(composition_plan("staging").last(), Some(&Composer::Monitoring));
        assert_eq!(composition_plan("prod").len(), 4);
    }

    #[test]
    fn every_stack_is_tagged() {
        let assembly = synthesize(&DeployContext::new("staging")).unwrap();
        assert_eq!(assembly.stacks().len(), 4);
        for stack in assembly.stacks() {
            assert_eq!(stack.tags().get("Environment").map(String::as_str), Some("staging"));
            assert_eq!(stack.tags().get("Project").map(String::as_str), Some("ModularCDKExample"));
        }
    }

    #[test]
    fn unknown_stage_aborts() {
        let err = synthesize(&DeployContext::new("qa")).err().unwrap();
        assert!(err.to_string().contains("qa"));
    }
}
