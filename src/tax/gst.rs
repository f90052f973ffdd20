//! Standard Indian GST slabs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::tax::profile::TaxProfile;

/// Standard GST rates for different categories of goods and services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstSlab {
    /// Exempt items (life-saving drugs, fresh food) - 0%
    Exempt,
    /// Reduced rate items (most medicines) - 5%
    Reduced,
    /// Standard rate items - 12%
    Standard,
    /// Higher rate items - 18%
    Higher,
    /// Luxury/Sin goods - 28%
    Luxury,
}

impl GstSlab {
    pub const ALL: [GstSlab; 5] = [
        GstSlab::Exempt,
        GstSlab::Reduced,
        GstSlab::Standard,
        GstSlab::Higher,
        GstSlab::Luxury,
    ];

    /// Get the combined GST rate for this slab
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstSlab::Exempt => BigDecimal::from(0),
            GstSlab::Reduced => BigDecimal::from(5),
            GstSlab::Standard => BigDecimal::from(12),
            GstSlab::Higher => BigDecimal::from(18),
            GstSlab::Luxury => BigDecimal::from(28),
        }
    }

    /// Catalog id of the slab's profile, e.g. `GST12`
    pub fn profile_id(&self) -> String {
        format!("GST{}", self.rate())
    }

    /// Intra-state profile for this slab (rate split evenly into CGST and SGST)
    pub fn intra_state_profile(&self) -> TaxProfile {
        TaxProfile::intra_state(
            self.profile_id(),
            format!("GST {}%", self.rate()),
            self.rate(),
        )
    }

    /// Inter-state profile for this slab (single IGST component)
    pub fn inter_state_profile(&self) -> TaxProfile {
        TaxProfile::inter_state(
            format!("IGST{}", self.rate()),
            format!("IGST {}%", self.rate()),
            self.rate(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_slab_profiles() {
        let profile = GstSlab::Standard.intra_state_profile();
        assert_eq!(profile.id, "GST12");
        assert_eq!(profile.display_name, "GST 12%");
        assert_eq!(profile.components.len(), 2);
        assert_eq!(profile.components[0].name, "CGST");
        assert_eq!(profile.components[0].rate, BigDecimal::from(6));
        assert_eq!(profile.components[1].rate, BigDecimal::from(6));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_odd_slab_splits_into_halves() {
        let profile = GstSlab::Reduced.intra_state_profile();
        assert_eq!(
            profile.components[0].rate,
            BigDecimal::from_str("2.5").unwrap()
        );
        assert_eq!(profile.component_rate_sum(), BigDecimal::from(5));
    }

    #[test]
    fn test_inter_state_profile() {
        let profile = GstSlab::Higher.inter_state_profile();
        assert_eq!(profile.id, "IGST18");
        assert_eq!(profile.components.len(), 1);
        assert_eq!(profile.components[0].name, "IGST");
        assert_eq!(profile.components[0].rate, BigDecimal::from(18));
    }
}
