//! Billing engine bundling a catalog snapshot with its configuration

use tracing::{debug, warn};

use crate::billing::invoice::aggregate_invoice_with;
use crate::billing::line_item::calculate_line_item_with;
use crate::config::EngineConfig;
use crate::tax::profile::TaxProfileCatalog;
use crate::tax::resolver::{resolve_tax_rates, TaxRates};
use crate::types::*;

/// Result of computing a whole draft
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceComputation {
    /// One outcome per draft line, in draft order
    pub lines: Vec<BillingResult<LineItemResult>>,
    /// Totals over the lines that computed successfully
    pub totals: InvoiceTotals,
}

impl InvoiceComputation {
    /// Indices of rows that could not be computed
    pub fn failed_rows(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether every row computed
    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(|outcome| outcome.is_ok())
    }
}

/// Billing engine
#[derive(Debug, Clone)]
pub struct BillingEngine {
    /// Tax profiles lines may reference
    catalog: TaxProfileCatalog,
    config: EngineConfig,
}

impl BillingEngine {
    /// Create an engine with the default configuration
    pub fn new(catalog: TaxProfileCatalog) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration
    pub fn with_config(catalog: TaxProfileCatalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &TaxProfileCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve rates for a profile id using the configured missing-profile policy
    pub fn rates_for(&self, profile_id: Option<&str>) -> BillingResult<TaxRates> {
        resolve_tax_rates(profile_id, &self.catalog, self.config.on_missing_profile)
    }

    /// Calculate a single line. Under NON_GST no profile is looked up.
    pub fn calculate_line(
        &self,
        input: &LineItemInput,
        mode: GstMode,
    ) -> BillingResult<LineItemResult> {
        let rates = if mode.is_taxed() {
            self.rates_for(input.tax_profile_id.as_deref())?
        } else {
            TaxRates::zero()
        };
        Ok(calculate_line_item_with(
            input,
            &rates,
            mode,
            self.config.component_rounding,
        ))
    }

    /// Aggregate already calculated lines
    pub fn aggregate(
        &self,
        lines: &[LineItemResult],
        overall_discount: &DiscountSpec,
        mode: GstMode,
    ) -> InvoiceTotals {
        aggregate_invoice_with(lines, overall_discount, mode, self.config.component_rounding)
    }

    /// Compute every line of a draft independently, then aggregate the rows that
    /// succeeded. A failing row is reported in place and does not block the others.
    pub fn compute(&self, draft: &InvoiceDraft) -> InvoiceComputation {
        let lines: Vec<BillingResult<LineItemResult>> = draft
            .lines
            .iter()
            .map(|input| self.calculate_line(input, draft.mode))
            .collect();

        let computed: Vec<LineItemResult> = lines
            .iter()
            .filter_map(|outcome| outcome.as_ref().ok().cloned())
            .collect();

        let failed = lines.len() - computed.len();
        if failed > 0 {
            warn!(failed, total = lines.len(), "invoice rows left out of totals");
        }

        let totals = self.aggregate(&computed, &draft.overall_discount, draft.mode);
        debug!(
            mode = ?draft.mode,
            rows = lines.len(),
            net_total = %totals.net_total,
            "computed invoice draft"
        );

        InvoiceComputation { lines, totals }
    }
}

impl Default for BillingEngine {
    fn default() -> Self {
        Self::new(TaxProfileCatalog::standard_slabs())
    }
}
