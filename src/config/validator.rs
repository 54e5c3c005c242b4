//! Stage table validation: naming rules and limit consistency.

use crate::config::tables::{StageTable, API_CONFIG, DATABASE_CONFIG, FRONTEND_CONFIG};
use crate::config::{ApiConfig, DatabaseConfig, FrontendConfig};
use crate::error::ConfigError;
use regex::Regex;

const TABLE_NAME_PATTERN: &str = r"^[A-Za-z0-9_.\-]{3,255}$";
const DOMAIN_NAME_PATTERN: &str = r"^([a-z0-9]([a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$";

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Validation(format!("invalid pattern {}: {}", pattern, e)))
}

pub fn validate_database(stage: &str, config: &DatabaseConfig) -> Result<(), ConfigError> {
    let re = compile(TABLE_NAME_PATTERN)?;
    if !re.is_match(config.table_name) {
        return Err(ConfigError::Validation(format!(
            "stage {}: table name '{}' must be 3-255 characters of [A-Za-z0-9_.-]",
            stage, config.table_name
        )));
    }
    Ok(())
}

pub fn validate_api(stage: &str, config: &ApiConfig) -> Result<(), ConfigError> {
    if config.api_name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("stage {}: api name is empty", stage)));
    }
    if config.throttle_burst_limit < config.throttle_rate_limit {
        return Err(ConfigError::Validation(format!(
            "stage {}: throttle burst limit {} is below rate limit {}",
            stage, config.throttle_burst_limit, config.throttle_rate_limit
        )));
    }
    Ok(())
}

pub fn validate_frontend(stage: &str, config: &FrontendConfig) -> Result<(), ConfigError> {
    if let Some(domain) = config.domain_name {
        let re = compile(DOMAIN_NAME_PATTERN)?;
        if !re.is_match(domain) {
            return Err(ConfigError::Validation(format!(
                "stage {}: '{}' is not a valid domain name",
                stage, domain
            )));
        }
    }
    Ok(())
}

fn validate_table<T>(
    table: &StageTable<T>,
    check: fn(&str, &T) -> Result<(), ConfigError>,
) -> Result<(), ConfigError> {
    for (stage, config) in table.entries() {
        check(stage, config)?;
    }
    Ok(())
}

/// Validate every record of every stage table.
pub fn validate_tables() -> Result<(), ConfigError> {
    validate_table(&DATABASE_CONFIG, validate_database)?;
    validate_table(&API_CONFIG, validate_api)?;
    validate_table(&FRONTEND_CONFIG, validate_frontend)?;
    Ok(())
}
