//! Reconciliation engine turning extracted charges into group totals

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::reconciliation::distribution::{distribute_account_wide, DistributionOutcome};
use crate::reconciliation::transfer::{apply_transfers, TransferOutcome};
use crate::types::*;

/// Final totals plus what the adjustment steps did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub totals: GroupTotals,
    /// Adjustments where at least one side resolved to a group
    ///
    /// Adjustments whose lines are both unmapped are not counted, unlike a
    /// plain count of the configured adjustments.
    pub adjustments_applied: usize,
    /// Whether the account-wide step changed the totals
    pub account_wide_applied: bool,
    #[serde(skip)]
    pub transfers: Vec<TransferOutcome>,
    #[serde(skip)]
    pub distribution: Option<DistributionOutcome>,
}

impl ReconciliationReport {
    /// Sum across all groups
    pub fn total_amount(&self) -> BigDecimal {
        self.totals.grand_total()
    }
}

/// Everything the engine needs besides the extraction, in transport shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    pub extraction: ExtractionPayload,
    pub mapping: GroupMapping,
    #[serde(default)]
    pub adjustments: Vec<TransferAdjustment>,
    #[serde(default)]
    pub policy: ReconciliationPolicy,
}

/// Stateless engine; every call starts from fresh totals
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationEngine;

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Zero every group, then add the charges of each mapped line
    ///
    /// Records match a mapping entry on name and number only. Two records
    /// for the same name and number on different devices both count.
    pub fn aggregate_charges(
        &self,
        extraction: &BillExtractionResult,
        mapping: &GroupMapping,
    ) -> GroupTotals {
        let mut totals = GroupTotals::for_mapping(mapping);

        for entry in mapping.entries() {
            let matched: BigDecimal = extraction
                .records()
                .filter(|record| entry.matches(record))
                .map(|record| &record.amount)
                .sum();
            debug!(
                group = %entry.group,
                line = %entry.line_name,
                number = %entry.line_number,
                matched = %matched,
                "aggregated line charges"
            );
            totals.credit(&entry.group, &matched);
        }

        totals
    }

    /// Aggregate, apply transfers, then distribute the account-wide amount
    pub fn reconcile(
        &self,
        extraction: &BillExtractionResult,
        mapping: &GroupMapping,
        adjustments: &[TransferAdjustment],
        policy: &ReconciliationPolicy,
    ) -> ReconciliationReport {
        let mut totals = self.aggregate_charges(extraction, mapping);
        let transfers = apply_transfers(&mut totals, mapping, adjustments);
        let distribution =
            distribute_account_wide(&mut totals, policy, &extraction.account_wide_amount);

        let adjustments_applied = transfers.iter().filter(|t| t.is_applied()).count();
        let account_wide_applied = distribution.is_applied();

        info!(
            groups = totals.len(),
            adjustments = adjustments.len(),
            adjustments_applied,
            account_wide_applied,
            total = %totals.grand_total(),
            "reconciliation finished"
        );

        ReconciliationReport {
            totals,
            adjustments_applied,
            account_wide_applied,
            transfers,
            distribution: Some(distribution),
        }
    }

    /// Reconcile a request received in transport shape
    pub fn reconcile_request(&self, request: ReconciliationRequest) -> ReconciliationReport {
        let extraction = BillExtractionResult::from(request.extraction);
        self.reconcile(
            &extraction,
            &request.mapping,
            &request.adjustments,
            &request.policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn record(name: &str, device: &str, number: &str, charge: &str) -> LineChargeRecord {
        LineChargeRecord::new(
            name.to_string(),
            device.to_string(),
            number.to_string(),
            amount(charge),
        )
    }

    fn extraction(records: Vec<LineChargeRecord>, account_wide: &str) -> BillExtractionResult {
        let mut result = BillExtractionResult::new();
        result.account_wide_amount = amount(account_wide);
        for r in records {
            result.upsert(r);
        }
        result
    }

    #[test]
    fn test_groups_start_at_zero() {
        let mapping = GroupMapping::new()
            .with_group("Nobody")
            .with_entry(GroupMappingEntry::new("Papa", "1", "David", "555-000-0001"));
        let report = ReconciliationEngine::new().reconcile(
            &BillExtractionResult::new(),
            &mapping,
            &[],
            &ReconciliationPolicy::None,
        );

        assert_eq!(report.totals.len(), 2);
        assert_eq!(report.totals.get("Nobody"), Some(&BigDecimal::from(0)));
        assert_eq!(report.totals.get("Papa"), Some(&BigDecimal::from(0)));
        assert!(!report.account_wide_applied);
        assert_eq!(report.adjustments_applied, 0);
    }

    #[test]
    fn test_device_is_ignored_when_matching() {
        let extraction = extraction(
            vec![
                record("Tova", "iPhone 13", "555-222-3333", "30.00"),
                record("Tova", "Apple Watch", "555-222-3333", "10.00"),
                record("Tova", "iPhone 13", "555-999-0000", "99.00"),
            ],
            "0",
        );
        let mapping = GroupMapping::from_entries(vec![GroupMappingEntry::new(
            "Riverdale",
            "7",
            "Tova",
            "555-222-3333",
        )]);

        let totals = ReconciliationEngine::new().aggregate_charges(&extraction, &mapping);
        assert_eq!(totals.get("Riverdale"), Some(&amount("40.00")));
    }

    #[test]
    fn test_steps_run_in_order() {
        let extraction = extraction(
            vec![
                record("Elana", "iPhone", "555-100-0001", "50.00"),
                record("Tova", "Watch", "555-100-0002", "10.00"),
            ],
            "-20.00",
        );
        let mapping = GroupMapping::from_entries(vec![
            GroupMappingEntry::new("New Roc", "1", "Elana", "555-100-0001"),
            GroupMappingEntry::new("Riverdale", "2", "Tova", "555-100-0002"),
        ]);
        let adjustments = vec![TransferAdjustment::new(amount("7"), "1", "2")];

        let report = ReconciliationEngine::new().reconcile(
            &extraction,
            &mapping,
            &adjustments,
            &ReconciliationPolicy::Evenly,
        );

        assert_eq!(report.totals.get("New Roc"), Some(&amount("33.00")));
        assert_eq!(report.totals.get("Riverdale"), Some(&amount("7.00")));
        assert_eq!(report.total_amount(), amount("40.00"));
        assert_eq!(report.adjustments_applied, 1);
        assert!(report.account_wide_applied);
    }

    #[test]
    fn test_unmapped_lines_are_not_charged() {
        let extraction = extraction(
            vec![record("Stranger", "Phone", "555-555-5555", "80.00")],
            "0",
        );
        let mapping = GroupMapping::from_entries(vec![GroupMappingEntry::new(
            "Papa",
            "1",
            "David",
            "555-000-0001",
        )]);

        let report = ReconciliationEngine::new().reconcile(
            &extraction,
            &mapping,
            &[],
            &ReconciliationPolicy::None,
        );
        assert_eq!(report.total_amount(), BigDecimal::from(0));
    }

    #[test]
    fn test_reconcile_is_repeatable() {
        let extraction = extraction(
            vec![record("A", "Phone", "555-000-0001", "33.33")],
            "10.00",
        );
        let mapping = GroupMapping::new()
            .with_group("G2")
            .with_group("G3")
            .with_entry(GroupMappingEntry::new("G1", "1", "A", "555-000-0001"));
        let engine = ReconciliationEngine::new();

        let first = engine.reconcile(&extraction, &mapping, &[], &ReconciliationPolicy::Evenly);
        let second = engine.reconcile(&extraction, &mapping, &[], &ReconciliationPolicy::Evenly);
        assert_eq!(first.totals, second.totals);
        assert_eq!(
            serde_json::to_string(&first.totals).unwrap(),
            serde_json::to_string(&second.totals).unwrap()
        );
    }

    #[test]
    fn test_report_transport_shape() {
        let mapping = GroupMapping::new().with_group("A");
        let report = ReconciliationEngine::new().reconcile(
            &BillExtractionResult::new(),
            &mapping,
            &[],
            &ReconciliationPolicy::None,
        );
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.get("totals").is_some());
        assert_eq!(value["adjustments_applied"], 0);
        assert_eq!(value["account_wide_applied"], false);
        assert!(value.get("transfers").is_none());
    }

    #[test]
    fn test_reconcile_request_from_json() {
        let json = r#"{
            "extraction": {
                "account_wide_value": "12",
                "lines": [
                    {"name": "Emmy", "device": "iPhone", "number": "555-300-0001", "charge": "45.10"}
                ]
            },
            "mapping": [
                {"group": "Simchis", "line_id": "11", "line_name": "Emmy", "line_number": "555-300-0001"},
                {"group": "Papa", "line_id": "12", "line_name": "David", "line_number": "555-300-0002"}
            ],
            "adjustments": [{"amount": "5", "line_from": "11", "line_to": "12"}],
            "policy": "evenly"
        }"#;
        let request: ReconciliationRequest = serde_json::from_str(json).unwrap();
        let report = ReconciliationEngine::new().reconcile_request(request);

        assert_eq!(report.totals.get("Simchis"), Some(&amount("46.10")));
        assert_eq!(report.totals.get("Papa"), Some(&amount("11")));
    }
}
