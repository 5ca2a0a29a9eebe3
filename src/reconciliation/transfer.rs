//! Manual transfer adjustments between groups

use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::debug;

use crate::types::*;

/// What happened to one transfer adjustment
///
/// Each side is resolved on its own. A side whose line has no group is
/// dropped, so a transfer may take effect on one side only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOutcome {
    pub amount: BigDecimal,
    pub line_id_from: String,
    pub line_id_to: String,
    /// Group the amount was taken from
    pub from_group: Option<String>,
    /// Group the amount was given to
    pub to_group: Option<String>,
}

impl TransferOutcome {
    /// At least one side changed a total
    pub fn is_applied(&self) -> bool {
        self.from_group.is_some() || self.to_group.is_some()
    }

    /// Exactly one side changed a total
    pub fn is_partial(&self) -> bool {
        self.from_group.is_some() != self.to_group.is_some()
    }
}

/// Apply one adjustment to the running totals
pub fn apply_transfer(
    totals: &mut GroupTotals,
    mapping: &GroupMapping,
    adjustment: &TransferAdjustment,
) -> TransferOutcome {
    let from_group = mapping
        .owning_group(&adjustment.line_id_from)
        .map(str::to_string);
    let to_group = mapping
        .owning_group(&adjustment.line_id_to)
        .map(str::to_string);

    if let Some(group) = &from_group {
        totals.debit(group, &adjustment.amount);
    }
    if let Some(group) = &to_group {
        totals.credit(group, &adjustment.amount);
    }

    debug!(
        amount = %adjustment.amount,
        from = %adjustment.line_id_from,
        to = %adjustment.line_id_to,
        ?from_group,
        ?to_group,
        "transfer applied"
    );

    TransferOutcome {
        amount: adjustment.amount.clone(),
        line_id_from: adjustment.line_id_from.clone(),
        line_id_to: adjustment.line_id_to.clone(),
        from_group,
        to_group,
    }
}

/// Apply adjustments in list order
pub fn apply_transfers(
    totals: &mut GroupTotals,
    mapping: &GroupMapping,
    adjustments: &[TransferAdjustment],
) -> Vec<TransferOutcome> {
    adjustments
        .iter()
        .map(|adjustment| apply_transfer(totals, mapping, adjustment))
        .collect()
}
