//! Turns a line's tax profile reference into the rates the calculator applies

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MissingProfilePolicy;
use crate::tax::profile::TaxProfile;
use crate::traits::TaxProfileLookup;
use crate::types::*;

/// Rates resolved for one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Profile the rates came from, `None` for zero rates
    pub profile_id: Option<String>,
    /// Components to apply, in profile order
    pub components: Vec<TaxComponent>,
    /// Fallbacks taken while resolving
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<CalculationNotice>,
}

impl TaxRates {
    /// Zero CGST and SGST
    pub fn zero() -> Self {
        Self {
            profile_id: None,
            components: vec![
                TaxComponent::new("CGST", BigDecimal::from(0)),
                TaxComponent::new("SGST", BigDecimal::from(0)),
            ],
            notices: Vec::new(),
        }
    }

    /// Rates taken from a catalog profile
    pub fn from_profile(profile: &TaxProfile) -> Self {
        Self {
            profile_id: Some(profile.id.clone()),
            components: profile.effective_components(),
            notices: Vec::new(),
        }
    }

    /// Explicit CGST/SGST rates with no catalog behind them
    pub fn cgst_sgst(cgst_rate: BigDecimal, sgst_rate: BigDecimal) -> Self {
        Self {
            profile_id: None,
            components: vec![
                TaxComponent::new("CGST", cgst_rate),
                TaxComponent::new("SGST", sgst_rate),
            ],
            notices: Vec::new(),
        }
    }

    /// Combined rate of every component
    pub fn total_rate(&self) -> BigDecimal {
        self.components.iter().map(|c| &c.rate).sum()
    }

    /// Combined rate of the CGST components
    pub fn cgst_rate(&self) -> BigDecimal {
        self.components
            .iter()
            .filter(|c| c.is_cgst())
            .map(|c| &c.rate)
            .sum()
    }

    /// Combined rate of the SGST components
    pub fn sgst_rate(&self) -> BigDecimal {
        self.components
            .iter()
            .filter(|c| c.is_sgst())
            .map(|c| &c.rate)
            .sum()
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }

    pub fn is_zero(&self) -> bool {
        self.total_rate() == BigDecimal::from(0)
    }

    /// Component that absorbs rounding differences
    pub(crate) fn nudge_index(&self) -> usize {
        nudge_index(self.component_names())
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self::zero()
    }
}

/// Resolve the rates for a profile id against a catalog snapshot.
///
/// An absent or blank id yields zero rates. An id the catalog does not know either
/// fails or falls back to zero rates, depending on `on_missing`. A profile that
/// fails validation is rejected with `InvalidTaxProfile`, since lookups other than
/// `TaxProfileCatalog::insert` never validated it.
pub fn resolve_tax_rates<L>(
    profile_id: Option<&str>,
    catalog: &L,
    on_missing: MissingProfilePolicy,
) -> BillingResult<TaxRates>
where
    L: TaxProfileLookup + ?Sized,
{
    let profile_id = match profile_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(TaxRates::zero()),
    };

    if let Some(profile) = catalog.find_profile(profile_id) {
        profile.validate()?;
        let rates = TaxRates::from_profile(profile);
        debug!(
            profile_id,
            total_rate = %rates.total_rate(),
            components = rates.components.len(),
            "resolved tax profile"
        );
        return Ok(rates);
    }

    match on_missing {
        MissingProfilePolicy::Raise => Err(BillingError::TaxProfileNotFound(profile_id.to_string())),
        MissingProfilePolicy::ZeroRate => {
            warn!(profile_id, "tax profile not found, using zero rates");
            let mut rates = TaxRates::zero();
            rates.notices.push(CalculationNotice::TaxProfileFallback {
                profile_id: profile_id.to_string(),
            });
            Ok(rates)
        }
    }
}
