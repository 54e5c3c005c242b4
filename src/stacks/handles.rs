//! Typed outputs passed from one composer to the next. Tokens resolve through stack exports.

use crate::synth::Token;

/// Stack id for a subsystem in a stage, e.g. `Api-prod`.
pub fn stack_id(subsystem: &str, stage: &str) -> String {
    format!("{}-{}", subsystem, stage)
}

#[derive(Clone, Debug)]
pub struct TableHandle {
    pub stack_id: String,
    pub table_name: String,
    pub table_arn: Token,
}

#[derive(Clone, Debug)]
pub struct FunctionHandle {
    pub stack_id: String,
    /// Alarm dimension value.
    pub function_name: String,
}

#[derive(Clone, Debug)]
pub struct ApiHandle {
    pub stack_id: String,
    /// Externally reachable invoke URL.
    pub url: Token,
}
