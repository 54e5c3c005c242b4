//! HTTP routes for the local server.

pub mod common;
pub mod items;

pub use common::common_routes;
pub use items::items_routes;
