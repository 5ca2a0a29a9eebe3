//! Distribution of the account-wide amount across groups

use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::types::*;

/// Why the account-wide step did not run
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionSkip {
    /// Policy says not to distribute
    PolicyNone,
    /// No groups to divide between
    NoGroups,
    /// The fixed amount could not be read as a number
    InvalidFixedAmount { raw: String },
}

/// Result of the account-wide step
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionOutcome {
    Applied {
        /// Amount divided between the groups
        amount: BigDecimal,
        /// Number of groups that received a share
        groups: usize,
        /// Share added to every group
        share: BigDecimal,
    },
    Skipped(DistributionSkip),
}

impl DistributionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DistributionOutcome::Applied { .. })
    }
}

/// Read a fixed policy amount
pub fn parse_fixed_amount(raw: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(raw.trim()).ok()
}

/// Add an equal share of the selected amount to every group
pub fn distribute_account_wide(
    totals: &mut GroupTotals,
    policy: &ReconciliationPolicy,
    account_wide_amount: &BigDecimal,
) -> DistributionOutcome {
    let amount = match policy {
        ReconciliationPolicy::None => {
            return DistributionOutcome::Skipped(DistributionSkip::PolicyNone)
        }
        ReconciliationPolicy::Evenly => account_wide_amount.clone(),
        ReconciliationPolicy::FixedAmount(raw) => match parse_fixed_amount(raw) {
            Some(amount) => amount,
            None => {
                warn!(raw = %raw, "account-wide amount is not a number, skipping distribution");
                return DistributionOutcome::Skipped(DistributionSkip::InvalidFixedAmount {
                    raw: raw.clone(),
                });
            }
        },
    };

    let groups = totals.len();
    if groups == 0 {
        return DistributionOutcome::Skipped(DistributionSkip::NoGroups);
    }

    let share = &amount / BigDecimal::from(groups as u64);
    totals.credit_all(&share);
    debug!(amount = %amount, groups, share = %share, "account-wide amount distributed");

    DistributionOutcome::Applied {
        amount,
        groups,
        share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(groups: &[&str]) -> GroupTotals {
        let mut mapping = GroupMapping::new();
        for group in groups {
            mapping.declare_group(group);
        }
        GroupTotals::for_mapping(&mapping)
    }

    #[test]
    fn test_evenly_splits_extracted_amount() {
        let mut totals = totals(&["A", "B", "C", "D"]);
        let outcome = distribute_account_wide(
            &mut totals,
            &ReconciliationPolicy::Evenly,
            &BigDecimal::from(100),
        );

        assert!(outcome.is_applied());
        for (_, total) in totals.iter() {
            assert_eq!(total, &BigDecimal::from(25));
        }
    }

    #[test]
    fn test_fixed_amount_replaces_extracted_amount() {
        let mut totals = totals(&["A", "B"]);
        let outcome = distribute_account_wide(
            &mut totals,
            &ReconciliationPolicy::FixedAmount("-30".to_string()),
            &BigDecimal::from(100),
        );

        assert_eq!(
            outcome,
            DistributionOutcome::Applied {
                amount: BigDecimal::from(-30),
                groups: 2,
                share: BigDecimal::from(-15),
            }
        );
        assert_eq!(totals.get("A"), Some(&BigDecimal::from(-15)));
    }

    #[test]
    fn test_invalid_fixed_amount_is_skipped() {
        let mut totals = totals(&["A"]);
        let outcome = distribute_account_wide(
            &mut totals,
            &ReconciliationPolicy::FixedAmount("half".to_string()),
            &BigDecimal::from(100),
        );

        assert_eq!(
            outcome,
            DistributionOutcome::Skipped(DistributionSkip::InvalidFixedAmount {
                raw: "half".to_string()
            })
        );
        assert_eq!(totals.get("A"), Some(&BigDecimal::from(0)));
    }

    #[test]
    fn test_no_groups_is_skipped() {
        let mut totals = totals(&[]);
        let outcome = distribute_account_wide(
            &mut totals,
            &ReconciliationPolicy::Evenly,
            &BigDecimal::from(100),
        );
        assert_eq!(outcome, DistributionOutcome::Skipped(DistributionSkip::NoGroups));
    }

    #[test]
    fn test_policy_none_is_skipped() {
        let mut totals = totals(&["A"]);
        let outcome = distribute_account_wide(
            &mut totals,
            &ReconciliationPolicy::None,
            &BigDecimal::from(100),
        );
        assert_eq!(outcome, DistributionOutcome::Skipped(DistributionSkip::PolicyNone));
        assert_eq!(totals.grand_total(), BigDecimal::from(0));
    }
}
