//! Resource model: stacks of provider resources rendered as template JSON.

pub mod template;
pub mod stack;
pub mod assembly;

pub use template::*;
pub use stack::*;
pub use assembly::*;
