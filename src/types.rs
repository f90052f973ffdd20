//! Core value types shared by the tax resolver, line calculator and invoice aggregator

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::utils::validation::{validate_fixed_discount, validate_percent};

/// Pricing regime for a whole invoice. Exactly one mode is active per invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GstMode {
    /// Unit price already contains tax; tax is backed out of the discounted price
    Inclusive,
    /// Unit price excludes tax; tax is added on top of the discounted price
    Exclusive,
    /// No tax applies
    NonGst,
}

impl GstMode {
    /// Whether this mode computes any tax at all
    pub fn is_taxed(&self) -> bool {
        !matches!(self, GstMode::NonGst)
    }
}

/// A named tax component of a profile (e.g. CGST 6%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxComponent {
    /// Component name, e.g. "CGST", "SGST", "IGST"
    pub name: String,
    /// Rate in percent (0-100)
    pub rate: BigDecimal,
}

impl TaxComponent {
    pub fn new(name: impl Into<String>, rate: BigDecimal) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }

    /// Whether this is a central GST component
    pub fn is_cgst(&self) -> bool {
        is_cgst_name(&self.name)
    }

    /// Whether this is a state GST component
    pub fn is_sgst(&self) -> bool {
        is_sgst_name(&self.name)
    }
}

pub(crate) fn is_cgst_name(name: &str) -> bool {
    name.to_ascii_uppercase().contains("CGST")
}

pub(crate) fn is_sgst_name(name: &str) -> bool {
    name.to_ascii_uppercase().contains("SGST")
}

/// Amount computed for one named tax component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAmount {
    pub name: String,
    pub amount: BigDecimal,
}

impl ComponentAmount {
    pub fn new(name: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Position of the component that absorbs rounding differences: the first CGST
/// component, otherwise the first component.
pub(crate) fn nudge_index<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .enumerate()
        .find(|(_, name)| is_cgst_name(name))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Raw line as edited by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Units sold or purchased; zero or negative means the row is still incomplete
    pub quantity: i64,
    /// Price per unit, inclusive or exclusive of tax depending on the invoice mode
    pub unit_price: BigDecimal,
    /// Line discount in percent (0-100)
    pub discount_percent: BigDecimal,
    /// Tax profile chosen for this line
    pub tax_profile_id: Option<String>,
}

impl LineItemInput {
    /// Create a line without a tax profile
    pub fn new(quantity: i64, unit_price: BigDecimal, discount_percent: BigDecimal) -> Self {
        Self {
            quantity,
            unit_price,
            discount_percent,
            tax_profile_id: None,
        }
    }

    /// Attach a tax profile to the line
    pub fn with_tax_profile(mut self, profile_id: impl Into<String>) -> Self {
        self.tax_profile_id = Some(profile_id.into());
        self
    }
}

/// Fully derived figures for one line. Recomputed wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemResult {
    /// quantity x unit price
    pub gross_amount: BigDecimal,
    /// Line discount taken off the gross amount
    pub discount_amount: BigDecimal,
    /// Amount tax is levied on
    pub taxable_amount: BigDecimal,
    /// Tax per named component, in profile order
    pub component_amounts: Vec<ComponentAmount>,
    /// Sum of the component amounts
    pub tax_amount: BigDecimal,
    /// Amount payable for the line
    pub total: BigDecimal,
    /// Inputs that were adjusted while computing this line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<CalculationNotice>,
}

impl LineItemResult {
    /// All-zero result that keeps the component names of the applied rates
    pub fn zeroed<'a>(
        component_names: impl Iterator<Item = &'a str>,
        notices: Vec<CalculationNotice>,
    ) -> Self {
        Self {
            gross_amount: BigDecimal::from(0),
            discount_amount: BigDecimal::from(0),
            taxable_amount: BigDecimal::from(0),
            component_amounts: component_names
                .map(|name| ComponentAmount::new(name, BigDecimal::from(0)))
                .collect(),
            tax_amount: BigDecimal::from(0),
            total: BigDecimal::from(0),
            notices,
        }
    }

    /// Amount for a component by exact name
    pub fn component(&self, name: &str) -> Option<&BigDecimal> {
        self.component_amounts
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.amount)
    }

    /// Sum of all CGST components
    pub fn cgst_amount(&self) -> BigDecimal {
        self.component_amounts
            .iter()
            .filter(|c| is_cgst_name(&c.name))
            .map(|c| &c.amount)
            .sum()
    }

    /// Sum of all SGST components
    pub fn sgst_amount(&self) -> BigDecimal {
        self.component_amounts
            .iter()
            .filter(|c| is_sgst_name(&c.name))
            .map(|c| &c.amount)
            .sum()
    }
}

/// How an invoice-level discount is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Percentage of the net taxable amount
    Percent,
    /// Fixed currency amount, capped at the net taxable amount
    Fixed,
}

/// Invoice-level discount applied after all lines are summed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSpec {
    pub value: BigDecimal,
    pub kind: DiscountKind,
}

impl DiscountSpec {
    /// No overall discount
    pub fn none() -> Self {
        Self::percent(BigDecimal::from(0))
    }

    /// Percentage discount; out-of-range values are clamped at calculation time
    pub fn percent(value: BigDecimal) -> Self {
        Self {
            value,
            kind: DiscountKind::Percent,
        }
    }

    /// Fixed-amount discount; negative values are clamped at calculation time
    pub fn fixed(value: BigDecimal) -> Self {
        Self {
            value,
            kind: DiscountKind::Fixed,
        }
    }

    /// Percentage discount that rejects values outside 0-100
    pub fn try_percent(value: BigDecimal) -> BillingResult<Self> {
        validate_percent(&value, "Overall discount")?;
        Ok(Self::percent(value))
    }

    /// Fixed discount that rejects negative values
    pub fn try_fixed(value: BigDecimal) -> BillingResult<Self> {
        validate_fixed_discount(&value)?;
        Ok(Self::fixed(value))
    }

    /// Whether this discount can take anything off the invoice
    pub fn is_zero(&self) -> bool {
        self.value == BigDecimal::from(0)
    }
}

impl Default for DiscountSpec {
    fn default() -> Self {
        Self::none()
    }
}

/// Invoice-level figures derived from the line results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line gross amounts
    pub gross_total: BigDecimal,
    /// Line discounts plus the overall discount
    pub discount_total: BigDecimal,
    /// Taxable base after the overall discount
    pub net_taxable_amount: BigDecimal,
    /// Tax per named component across all lines
    pub component_totals: Vec<ComponentAmount>,
    /// Sum of the component totals
    pub tax_total: BigDecimal,
    /// Amount payable for the invoice
    pub net_total: BigDecimal,
    /// Inputs that were adjusted while aggregating
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<CalculationNotice>,
}

impl InvoiceTotals {
    /// Total for a component by exact name
    pub fn component(&self, name: &str) -> Option<&BigDecimal> {
        self.component_totals
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.amount)
    }
}

/// Everything needed to compute an invoice from scratch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub mode: GstMode,
    pub lines: Vec<LineItemInput>,
    #[serde(default)]
    pub overall_discount: DiscountSpec,
}

impl InvoiceDraft {
    /// Create an empty draft for the given mode
    pub fn new(mode: GstMode) -> Self {
        Self {
            mode,
            lines: Vec::new(),
            overall_discount: DiscountSpec::none(),
        }
    }

    /// Append a line
    pub fn add_line(&mut self, line: LineItemInput) {
        self.lines.push(line);
    }

    /// Replace the overall discount
    pub fn set_overall_discount(&mut self, discount: DiscountSpec) {
        self.overall_discount = discount;
    }
}

/// An input the engine adjusted instead of rejecting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationNotice {
    /// Line discount percent outside 0-100
    DiscountClamped {
        requested: BigDecimal,
        applied: BigDecimal,
    },
    /// Overall discount percent outside 0-100, or a negative fixed amount
    OverallDiscountClamped {
        requested: BigDecimal,
        applied: BigDecimal,
    },
    /// Fixed overall discount larger than the taxable base
    FixedDiscountCapped {
        requested: BigDecimal,
        applied: BigDecimal,
    },
    /// Tax profile not in the catalog; zero rates were used
    TaxProfileFallback { profile_id: String },
}

/// Errors raised by the billing engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BillingError {
    #[error("Tax profile not found: {0}")]
    TaxProfileNotFound(String),
    #[error("Invalid tax profile: {0}")]
    InvalidTaxProfile(String),
    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),
}

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;
