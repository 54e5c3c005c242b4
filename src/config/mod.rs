pub mod types;
pub mod tables;
pub mod context;
pub mod validator;

pub use types::*;
pub use tables::*;
pub use context::*;
pub use validator::*;
