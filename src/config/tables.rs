//! Static stage tables. Values are fixed at compile time; lookups never read the environment.

use crate::config::types::{ApiConfig, DatabaseConfig, FrontendConfig};
use crate::error::ConfigError;

pub const DEV: &str = "dev";
pub const STAGING: &str = "staging";
pub const PROD: &str = "prod";

/// Stage identifier → record map for one subsystem.
#[derive(Debug)]
pub struct StageTable<T: 'static> {
    subsystem: &'static str,
    entries: &'static [(&'static str, T)],
}

impl<T> StageTable<T> {
    pub const fn new(subsystem: &'static str, entries: &'static [(&'static str, T)]) -> Self {
        StageTable { subsystem, entries }
    }

    /// Record for `stage`, or `StageNotFound` naming both the subsystem and the stage.
    pub fn lookup(&self, stage: &str) -> Result<&'static T, ConfigError> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, config)| config)
            .ok_or_else(|| ConfigError::StageNotFound {
                subsystem: self.subsystem,
                stage: stage.to_string(),
            })
    }

    pub fn entries(&self) -> &'static [(&'static str, T)] {
        self.entries
    }
}

const DATABASE_ENTRIES: &[(&str, DatabaseConfig)] = &[
    (
        DEV,
        DatabaseConfig {
            table_name: "my-app-dev-table",
            enable_backups: false,
            ttl_enabled: true,
        },
    ),
    (
        STAGING,
        DatabaseConfig {
            table_name: "my-app-staging-table",
            enable_backups: true,
            ttl_enabled: true,
        },
    ),
    (
        PROD,
        DatabaseConfig {
            table_name: "my-app-prod-table",
            enable_backups: true,
            ttl_enabled: false,
        },
    ),
];

pub static DATABASE_CONFIG: StageTable<DatabaseConfig> = StageTable::new("database", DATABASE_ENTRIES);

const API_ENTRIES: &[(&str, ApiConfig)] = &[
    (
        DEV,
        ApiConfig {
            api_name: "my-app-dev-api",
            enable_cors: true,
            throttle_rate_limit: 100,
            throttle_burst_limit: 200,
        },
    ),
    (
        STAGING,
        ApiConfig {
            api_name: "my-app-staging-api",
            enable_cors: true,
            throttle_rate_limit: 500,
            throttle_burst_limit: 1000,
        },
    ),
    (
        PROD,
        ApiConfig {
            api_name: "my-app-prod-api",
            enable_cors: false,
            throttle_rate_limit: 1000,
            throttle_burst_limit: 2000,
        },
    ),
];

pub static API_CONFIG: StageTable<ApiConfig> = StageTable::new("API", API_ENTRIES);

const FRONTEND_ENTRIES: &[(&str, FrontendConfig)] = &[
    (
        DEV,
        FrontendConfig {
            enable_versioning: false,
            enable_cloud_front: false,
            domain_name: None,
        },
    ),
    (
        STAGING,
        FrontendConfig {
            enable_versioning: true,
            enable_cloud_front: true,
            domain_name: Some("staging.myapp.com"),
        },
    ),
    (
        PROD,
        FrontendConfig {
            enable_versioning: true,
            enable_cloud_front: true,
            domain_name: Some("myapp.com"),
        },
    ),
];

pub static FRONTEND_CONFIG: StageTable<FrontendConfig> = StageTable::new("frontend", FRONTEND_ENTRIES);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_defined_stage_resolves_in_every_table() {
        for stage in [DEV, STAGING, PROD] {
            assert!(DATABASE_CONFIG.lookup(stage).is_ok(), "database {stage}");
            assert!(API_CONFIG.lookup(stage).is_ok(), "api {stage}");
            assert!(FRONTEND_CONFIG.lookup(stage).is_ok(), "frontend {stage}");
        }
    }

    #[test]
    fn unknown_stage_error_names_stage_and_subsystem() {
        let err = API_CONFIG.lookup("qa").unwrap_err();
        assert!(matches!(err, ConfigError::StageNotFound { stage, .. } if stage == "qa"));
        let message = DATABASE_CONFIG.lookup("qa").unwrap_err().to_string();
        assert_eq!(message, "No database configuration found for stage: qa");
    }

    #[test]
    fn prod_values() {
        let db = DATABASE_CONFIG.lookup(PROD).unwrap();
        assert_eq!(db.table_name, "my-app-prod-table");
        assert!(db.enable_backups);
        assert!(!db.ttl_enabled);
        let api = API_CONFIG.lookup(PROD).unwrap();
        assert!(!api.enable_cors);
        assert_eq!((api.throttle_rate_limit, api.throttle_burst_limit), (1000, 2000));
        assert_eq!(FRONTEND_CONFIG.lookup(PROD).unwrap().domain_name, Some("myapp.com"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(DATABASE_CONFIG.lookup("Prod").is_err());
    }
}
