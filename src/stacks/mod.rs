//! Stack composers. Each builds one subsystem for the active stage and hands typed handles to the next.

pub mod handles;
pub mod database;
pub mod api;
pub mod frontend;
pub mod monitoring;

pub use handles::{stack_id, ApiHandle, FunctionHandle, TableHandle};
pub use database::DatabaseStack;
pub use api::ApiStack;
pub use frontend::FrontendStack;
pub use monitoring::{AlertRule, MetricSource, MonitoringStack, ALERT_RULES};
