//! Orchestration of extraction and reconciliation around a configuration store

pub mod preview;
pub mod splitter;

pub use preview::*;
pub use splitter::*;
