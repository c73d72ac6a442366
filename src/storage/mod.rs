//! Storage collaborators that list blob names.

mod azure;
mod lister;
mod memory;

pub use azure::*;
pub use lister::*;
pub use memory::*;
