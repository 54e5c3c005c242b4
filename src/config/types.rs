//! Per-subsystem stage configuration records.

use serde::Serialize;

/// Storage subsystem settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub table_name: &'static str,
    /// Maps to point-in-time recovery on the table.
    pub enable_backups: bool,
    pub ttl_enabled: bool,
}

/// API subsystem settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
    pub api_name: &'static str,
    pub enable_cors: bool,
    /// Steady-state requests per second.
    pub throttle_rate_limit: u32,
    pub throttle_burst_limit: u32,
}

/// Frontend delivery settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrontendConfig {
    pub enable_versioning: bool,
    pub enable_cloud_front: bool,
    pub domain_name: Option<&'static str>,
}
