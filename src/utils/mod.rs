//! Utility modules

pub mod bill_files;
pub mod memory_storage;
pub mod validation;

pub use bill_files::*;
pub use memory_storage::*;
pub use validation::*;
