//! Bill splitter that runs extraction and reconciliation with stored configuration

use bigdecimal::BigDecimal;
use serde::Serialize;
use tracing::info;

use crate::extraction::{ChargeExtractor, ExtractionStats};
use crate::reconciliation::{ReconciliationEngine, ReconciliationReport};
use crate::report::{render_breakdown, Breakdown, BreakdownFormat};
use crate::split::preview::{preview_lines, LinesPreview};
use crate::traits::*;
use crate::types::*;

/// Everything produced by one automated run
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    #[serde(skip)]
    pub extraction: BillExtractionResult,
    #[serde(skip)]
    pub stats: ExtractionStats,
    pub account_wide_value: BigDecimal,
    #[serde(flatten)]
    pub report: ReconciliationReport,
    pub total_amount: BigDecimal,
}

impl SplitSummary {
    /// Render the per-group breakdown of this run
    pub fn breakdown(&self, format: BreakdownFormat) -> Breakdown {
        render_breakdown(&self.report.totals, format)
    }
}

/// Main orchestrator tying the extractor and engine to a configuration store
pub struct BillSplitter<S: BillConfigStore> {
    store: S,
    extractor: ChargeExtractor,
    engine: ReconciliationEngine,
}

impl<S: BillConfigStore> BillSplitter<S> {
    /// Create a splitter over the given store
    pub fn new(store: S) -> Self {
        Self {
            store,
            extractor: ChargeExtractor::new(),
            engine: ReconciliationEngine::new(),
        }
    }

    /// Create a splitter with a custom extractor
    pub fn with_extractor(store: S, extractor: ChargeExtractor) -> Self {
        Self {
            store,
            extractor,
            engine: ReconciliationEngine::new(),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Extract the bill and split it using the stored configuration
    ///
    /// Fails only when no group is configured; everything inside the run is
    /// best effort.
    pub async fn split<I, P, T>(&self, pages: I) -> SplitResult<SplitSummary>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mapping = self.store.group_mapping().await?;
        if mapping.is_empty() {
            return Err(SplitError::IncompleteConfiguration(
                "configure groups and line mappings before splitting a bill".to_string(),
            ));
        }
        let adjustments = self.store.transfer_adjustments().await?;
        let policy = self.store.reconciliation_policy().await?;

        let (extraction, stats) = self.extractor.extract_with_stats(pages);
        let report = self
            .engine
            .reconcile(&extraction, &mapping, &adjustments, &policy);
        let total_amount = report.total_amount();

        info!(
            lines = extraction.lines.len(),
            groups = report.totals.len(),
            total = %total_amount,
            "bill split"
        );

        Ok(SplitSummary {
            account_wide_value: extraction.account_wide_amount.clone(),
            extraction,
            stats,
            report,
            total_amount,
        })
    }

    /// Extract the bill and compare its lines with the saved ones
    pub async fn preview<I, P, T>(&self, pages: I) -> SplitResult<LinesPreview>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let known = self.store.known_lines().await?;
        let extraction = self.extractor.extract(pages);
        Ok(preview_lines(&extraction, &known))
    }

    /// Save the previewed lines that are not known yet
    ///
    /// `assign_id` gives each new line its id. Returns the lines saved.
    pub async fn save_new_lines<F>(
        &mut self,
        preview: &LinesPreview,
        mut assign_id: F,
    ) -> SplitResult<Vec<KnownLine>>
    where
        F: FnMut(&LinePreviewRef<'_>) -> String,
    {
        let mut saved = Vec::new();
        for line in preview.lines.iter().filter(|line| !line.exists) {
            let known = KnownLine {
                id: assign_id(&LinePreviewRef {
                    name: &line.name,
                    number: &line.number,
                    device: &line.device,
                }),
                name: line.name.clone(),
                number: line.number.clone(),
                device: line.device.clone(),
            };
            self.store.save_known_line(&known).await?;
            saved.push(known);
        }
        Ok(saved)
    }
}

/// Borrowed view of a previewed line handed to id assignment
#[derive(Debug, Clone, Copy)]
pub struct LinePreviewRef<'a> {
    pub name: &'a str,
    pub number: &'a str,
    pub device: &'a str,
}
