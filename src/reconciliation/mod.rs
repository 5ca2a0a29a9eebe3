//! Reconciliation of extracted charges into per-group totals
//!
//! The engine runs three steps in a fixed order: matched line charges are
//! aggregated per group, transfer adjustments are applied in list order, and
//! finally the account-wide amount is distributed according to the policy.

pub mod distribution;
pub mod engine;
pub mod transfer;

pub use distribution::*;
pub use engine::*;
pub use transfer::*;
