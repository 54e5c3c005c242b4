//! Deploy context: stage, region and alert destination supplied at synthesis time.

use crate::config::tables::DEV;
use crate::error::ConfigError;
use std::collections::HashMap;

pub const DEFAULT_REGION: &str = "us-east-1";

pub const STAGE_KEY: &str = "stage";
pub const REGION_KEY: &str = "region";
pub const ALERT_EMAIL_KEY: &str = "alertEmail";

/// Resolved once by the orchestrator and passed to every composer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployContext {
    pub stage: String,
    pub region: String,
    pub alert_email: Option<String>,
}

impl Default for DeployContext {
    fn default() -> Self {
        DeployContext {
            stage: DEV.to_string(),
            region: DEFAULT_REGION.to_string(),
            alert_email: None,
        }
    }
}

impl DeployContext {
    pub fn new(stage: impl Into<String>) -> Self {
        DeployContext {
            stage: stage.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_alert_email(mut self, email: impl Into<String>) -> Self {
        self.alert_email = Some(email.into());
        self
    }

    /// Build from `key=value` context entries. Unknown keys are ignored; blank values fall back to defaults.
    pub fn from_values(values: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            values
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        DeployContext {
            stage: get(STAGE_KEY).unwrap_or_else(|| DEV.to_string()),
            region: get(REGION_KEY).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            alert_email: get(ALERT_EMAIL_KEY),
        }
    }

    /// True when the stage is the fast inner-loop environment.
    pub fn is_dev(&self) -> bool {
        self.stage == DEV
    }
}

/// Parse one `-c key=value` entry.
pub fn parse_context_pair(raw: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::Validation(format!("context entry must be key=value, got '{}'", raw)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::Validation(format!("context entry has an empty key: '{}'", raw)));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
