//! Items request handler: event shape, store seam and the method table.

pub mod event;
pub mod store;
pub mod dynamo;
pub mod dispatch;

pub use event::ApiEvent;
pub use store::{Item, ItemStore, MemoryItemStore, PARTITION_KEY};
pub use dynamo::DynamoItemStore;
pub use dispatch::handle_request;
