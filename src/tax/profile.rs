//! Tax profiles and the immutable catalog they are looked up from

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::tax::gst::GstSlab;
use crate::traits::TaxProfileLookup;
use crate::types::*;
use crate::utils::validation::{validate_profile_id, validate_tax_rate};

/// Named bundle of tax components, e.g. "GST 12%" = CGST 6% + SGST 6%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Catalog key referenced by line items
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Declared combined rate; only used when `components` is empty
    pub total_rate: BigDecimal,
    /// Ordered components; their rates are authoritative for splitting
    #[serde(default)]
    pub components: Vec<TaxComponent>,
}

impl TaxProfile {
    /// Create a profile from explicit components
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        total_rate: BigDecimal,
        components: Vec<TaxComponent>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            total_rate,
            components,
        }
    }

    /// Intra-state profile: the total rate split evenly into CGST and SGST
    pub fn intra_state(
        id: impl Into<String>,
        display_name: impl Into<String>,
        total_rate: BigDecimal,
    ) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self::new(
            id,
            display_name,
            total_rate,
            vec![
                TaxComponent::new("CGST", half_rate.clone()),
                TaxComponent::new("SGST", half_rate),
            ],
        )
    }

    /// Inter-state profile: the total rate as a single IGST component
    pub fn inter_state(
        id: impl Into<String>,
        display_name: impl Into<String>,
        total_rate: BigDecimal,
    ) -> Self {
        Self::new(
            id,
            display_name,
            total_rate.clone(),
            vec![TaxComponent::new("IGST", total_rate)],
        )
    }

    /// Sum of the component rates
    pub fn component_rate_sum(&self) -> BigDecimal {
        self.components.iter().map(|c| &c.rate).sum()
    }

    /// Components to apply. A profile without components has its total rate split
    /// evenly into implicit CGST and SGST components.
    pub fn effective_components(&self) -> Vec<TaxComponent> {
        if self.components.is_empty() {
            let half_rate = &self.total_rate / BigDecimal::from(2);
            return vec![
                TaxComponent::new("CGST", half_rate.clone()),
                TaxComponent::new("SGST", half_rate),
            ];
        }
        self.components.clone()
    }

    /// Validate that the profile can be used for calculation
    pub fn validate(&self) -> BillingResult<()> {
        validate_profile_id(&self.id)?;

        if self.components.is_empty() {
            return validate_tax_rate(&self.id, "total", &self.total_rate);
        }

        for component in &self.components {
            validate_tax_rate(&self.id, &component.name, &component.rate)?;
        }

        let component_sum = self.component_rate_sum();
        if component_sum != self.total_rate {
            warn!(
                profile_id = %self.id,
                declared = %self.total_rate,
                components = %component_sum,
                "tax profile total differs from its components; components win"
            );
        }

        Ok(())
    }
}

/// Immutable snapshot of tax profiles keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxProfileCatalog {
    profiles: HashMap<String, TaxProfile>,
}

impl TaxProfileCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from profiles, validating each one
    pub fn from_profiles(profiles: impl IntoIterator<Item = TaxProfile>) -> BillingResult<Self> {
        let mut catalog = Self::new();
        for profile in profiles {
            catalog.insert(profile)?;
        }
        Ok(catalog)
    }

    /// Catalog holding the intra-state profile of every standard GST slab
    pub fn standard_slabs() -> Self {
        let profiles = GstSlab::ALL
            .iter()
            .map(|slab| {
                let profile = slab.intra_state_profile();
                (profile.id.clone(), profile)
            })
            .collect();
        Self { profiles }
    }

    /// Add or replace a profile after validating it
    pub fn insert(&mut self, profile: TaxProfile) -> BillingResult<()> {
        profile.validate()?;
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Get a profile by id
    pub fn get(&self, profile_id: &str) -> Option<&TaxProfile> {
        self.profiles.get(profile_id)
    }

    /// Iterate over all profiles in no particular order
    pub fn profiles(&self) -> impl Iterator<Item = &TaxProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl TaxProfileLookup for TaxProfileCatalog {
    fn find_profile(&self, profile_id: &str) -> Option<&TaxProfile> {
        self.get(profile_id)
    }
}
