//! Human-readable rendering of reconciliation results

pub mod breakdown;

pub use breakdown::*;
