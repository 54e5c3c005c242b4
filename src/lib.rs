//! Modular stack: stage-parameterized infrastructure composition and the items API it deploys.

pub mod config;
pub mod error;
pub mod response;
pub mod synth;
pub mod constructs;
pub mod stacks;
pub mod app;
pub mod handler;
pub mod state;
pub mod routes;

pub use app::{composition_plan, synthesize, Composer, PROJECT_NAME};
pub use config::{DeployContext, API_CONFIG, DATABASE_CONFIG, FRONTEND_CONFIG};
pub use error::{AppError, ConfigError, StoreError};
pub use handler::{handle_request, ApiEvent, DynamoItemStore, ItemStore, MemoryItemStore};
pub use response::ApiResponse;
pub use routes::{common_routes, items_routes};
pub use state::AppState;
pub use synth::CloudAssembly;
