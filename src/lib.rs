//! # Bill Split Core
//!
//! Splits a shared multi-line phone bill between family groups.
//!
//! ## Features
//!
//! - **Charge extraction**: recovers per-line charges and the account-wide
//!   amount from the plain-text lines of each bill page
//! - **Reconciliation**: sums matched line charges per group, applies manual
//!   transfer adjustments and distributes the account-wide amount
//! - **Decimal arithmetic**: all amounts are `BigDecimal`, so totals are
//!   exactly reproducible
//! - **Storage abstraction**: mappings, adjustments and the policy come from
//!   any backend implementing `BillConfigStore`
//!
//! ## Quick Start
//!
//! ```rust
//! use bill_split_core::{
//!     extract_charges, GroupMapping, GroupMappingEntry, ReconciliationEngine,
//!     ReconciliationPolicy,
//! };
//! use bigdecimal::BigDecimal;
//!
//! let pages = vec![vec!["John Doe", "$55.00", "iPhone 14", "(555) 123-4567"]];
//! let extraction = extract_charges(pages);
//!
//! let mapping = GroupMapping::from_entries(vec![GroupMappingEntry::new(
//!     "Does", "1", "John Doe", "(555) 123-4567",
//! )]);
//! let report = ReconciliationEngine::new().reconcile(
//!     &extraction,
//!     &mapping,
//!     &[],
//!     &ReconciliationPolicy::None,
//! );
//!
//! assert_eq!(report.totals.get("Does"), Some(&"55.00".parse::<BigDecimal>().unwrap()));
//! ```

pub mod config;
pub mod extraction;
pub mod reconciliation;
pub mod report;
pub mod split;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use extraction::*;
pub use reconciliation::*;
pub use report::*;
pub use split::*;
pub use traits::*;
pub use types::*;
