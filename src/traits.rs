//! Traits for the collaborators that own persisted bill-split configuration

use async_trait::async_trait;

use crate::types::*;

/// A line previously saved by the account owner
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KnownLine {
    pub id: String,
    pub name: String,
    pub number: String,
    pub device: String,
}

/// Storage abstraction for mappings, adjustments and the account-wide policy
///
/// The extraction and reconciliation core never touches storage. The
/// orchestrator reads everything it needs through this trait before a run,
/// so any backend (SQL, key-value, in-memory) can sit behind it.
#[async_trait]
pub trait BillConfigStore: Send + Sync {
    /// Current assignment of lines to groups
    async fn group_mapping(&self) -> SplitResult<GroupMapping>;

    /// Replace the assignment of lines to groups
    async fn save_group_mapping(&mut self, mapping: &GroupMapping) -> SplitResult<()>;

    /// Transfer adjustments in the order they should be applied
    async fn transfer_adjustments(&self) -> SplitResult<Vec<TransferAdjustment>>;

    /// Add a transfer adjustment and return its id
    async fn add_transfer_adjustment(
        &mut self,
        adjustment: &TransferAdjustment,
    ) -> SplitResult<String>;

    /// Remove a transfer adjustment
    async fn delete_transfer_adjustment(&mut self, adjustment_id: &str) -> SplitResult<()>;

    /// Stored account-wide policy, `None` when never configured
    async fn reconciliation_policy(&self) -> SplitResult<ReconciliationPolicy>;

    /// Store the account-wide policy
    async fn save_reconciliation_policy(&mut self, policy: &ReconciliationPolicy)
        -> SplitResult<()>;

    /// Lines saved from earlier bills
    async fn known_lines(&self) -> SplitResult<Vec<KnownLine>>;

    /// Save a line picked from a new bill
    async fn save_known_line(&mut self, line: &KnownLine) -> SplitResult<()>;
}
