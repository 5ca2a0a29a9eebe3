//! Positional scan that turns bill text into line charge records
//!
//! A billed line is printed as four consecutive text lines:
//!
//! ```text
//! John Doe           <- name (i - 1)
//! $55.00             <- amount (i)
//! iPhone 14          <- device (i + 1)
//! (555) 123-4567     <- number (i + 2)
//! ```
//!
//! An amount directly below the account-wide label is the account-wide
//! charge. Only indices with all three neighbours present are examined, so
//! amounts on the last two lines of a page never produce anything.

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::extraction::tokens::{classify_amount, find_phone_number, AmountToken};
use crate::types::*;

/// Why a currency-shaped line did not produce anything
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The token looked like money but could not be read as a number
    MalformedAmount { token: String },
    /// No phone number two lines below, so not a line item (subtotal, footer)
    NoPhoneNumber { amount: BigDecimal },
}

/// Result of examining one currency-shaped line
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    AccountWide { index: usize, amount: BigDecimal },
    Charge { index: usize, record: LineChargeRecord },
    Skipped { index: usize, reason: SkipReason },
}

/// Counts gathered while extracting, for logging and diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub pages: usize,
    pub charges: usize,
    pub account_wide_hits: usize,
    pub malformed_amounts: usize,
    pub unmatched_amounts: usize,
}

impl ExtractionStats {
    fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::AccountWide { .. } => self.account_wide_hits += 1,
            ScanOutcome::Charge { .. } => self.charges += 1,
            ScanOutcome::Skipped {
                reason: SkipReason::MalformedAmount { .. },
                ..
            } => self.malformed_amounts += 1,
            ScanOutcome::Skipped {
                reason: SkipReason::NoPhoneNumber { .. },
                ..
            } => self.unmatched_amounts += 1,
        }
    }
}

/// Extracts line charges and the account-wide amount from page text
#[derive(Debug, Clone)]
pub struct ChargeExtractor {
    account_wide_label: String,
}

impl Default for ChargeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargeExtractor {
    /// Create an extractor for the standard bill layout
    pub fn new() -> Self {
        Self {
            account_wide_label: ACCOUNT_WIDE_LABEL.to_string(),
        }
    }

    /// Create an extractor that looks for a different account-wide label
    pub fn with_account_wide_label(label: &str) -> Self {
        Self {
            account_wide_label: label.to_string(),
        }
    }

    /// Examine every eligible index of one page
    pub fn scan_page<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ScanOutcome> {
        let mut outcomes = Vec::new();
        let end = lines.len().saturating_sub(2);

        for index in 1..end {
            let amount = match classify_amount(lines[index].as_ref()) {
                AmountToken::NotCurrency => continue,
                AmountToken::Malformed => {
                    outcomes.push(ScanOutcome::Skipped {
                        index,
                        reason: SkipReason::MalformedAmount {
                            token: lines[index].as_ref().trim().to_string(),
                        },
                    });
                    continue;
                }
                AmountToken::Amount(amount) => amount,
            };

            let label = lines[index - 1].as_ref().trim();
            if label == self.account_wide_label {
                outcomes.push(ScanOutcome::AccountWide { index, amount });
                continue;
            }

            let candidate = lines[index + 2].as_ref().trim();
            match find_phone_number(candidate) {
                Some(number) => {
                    let device = lines[index + 1].as_ref().trim();
                    outcomes.push(ScanOutcome::Charge {
                        index,
                        record: LineChargeRecord::new(
                            label.to_string(),
                            device.to_string(),
                            number.to_string(),
                            amount,
                        ),
                    });
                }
                None => outcomes.push(ScanOutcome::Skipped {
                    index,
                    reason: SkipReason::NoPhoneNumber { amount },
                }),
            }
        }

        outcomes
    }

    /// Fold one page into an accumulating result
    pub fn extract_page<S: AsRef<str>>(
        &self,
        lines: &[S],
        result: &mut BillExtractionResult,
        stats: &mut ExtractionStats,
    ) {
        stats.pages += 1;
        for outcome in self.scan_page(lines) {
            stats.record(&outcome);
            match outcome {
                ScanOutcome::AccountWide { amount, .. } => {
                    result.account_wide_amount = amount;
                }
                ScanOutcome::Charge { record, .. } => {
                    result.upsert(record);
                }
                ScanOutcome::Skipped { index, reason } => {
                    debug!(page = stats.pages, index, ?reason, "skipped amount");
                }
            }
        }
    }

    /// Extract a whole document, one page at a time
    pub fn extract<I, P, S>(&self, pages: I) -> BillExtractionResult
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extract_with_stats(pages).0
    }

    /// Extract a whole document and report what was seen
    pub fn extract_with_stats<I, P, S>(&self, pages: I) -> (BillExtractionResult, ExtractionStats)
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = BillExtractionResult::new();
        let mut stats = ExtractionStats::default();

        for page in pages {
            let lines: Vec<S> = page.into_iter().collect();
            self.extract_page(&lines, &mut result, &mut stats);
        }

        debug!(
            pages = stats.pages,
            charges = stats.charges,
            distinct_lines = result.lines.len(),
            account_wide = %result.account_wide_amount,
            malformed = stats.malformed_amounts,
            unmatched = stats.unmatched_amounts,
            "extraction finished"
        );

        (result, stats)
    }
}

/// Extract with the standard layout
pub fn extract_charges<I, P, S>(pages: I) -> BillExtractionResult
where
    I: IntoIterator<Item = P>,
    P: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ChargeExtractor::new().extract(pages)
}
