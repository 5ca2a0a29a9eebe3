//! Charge extraction from per-page bill text

pub mod extractor;
pub mod tokens;

pub use extractor::*;
pub use tokens::*;
