//! Engine configuration
//!
//! The configuration is a plain serde value. Callers load it from whatever
//! source their application uses and hand it to [`crate::BillingEngine`].

use serde::{Deserialize, Serialize};

/// What to do when a line references a tax profile the catalog does not contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingProfilePolicy {
    /// Substitute zero rates and flag the line
    #[default]
    ZeroRate,
    /// Fail with `BillingError::TaxProfileNotFound`
    Raise,
}

/// How individually rounded tax components are reconciled with the rounded tax total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentRounding {
    /// The whole difference goes to the CGST component (first component if none)
    #[default]
    NudgeCgst,
    /// Cents go to the components with the largest rounding remainders
    LargestRemainder,
    /// Components are rounded on their own; the tax total is their sum
    Independent,
}

/// Behaviour switches for the billing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub on_missing_profile: MissingProfilePolicy,
    #[serde(default)]
    pub component_rounding: ComponentRounding,
}

impl EngineConfig {
    /// Strict configuration: unknown profiles are errors
    pub fn strict() -> Self {
        Self {
            on_missing_profile: MissingProfilePolicy::Raise,
            ..Self::default()
        }
    }

    pub fn with_component_rounding(mut self, rounding: ComponentRounding) -> Self {
        self.component_rounding = rounding;
        self
    }
}
