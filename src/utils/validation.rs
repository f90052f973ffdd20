//! Validation and input sanitising utilities
//!
//! Strict `validate_*` helpers reject bad values; `clamp_*` helpers are what the
//! calculators use, since a row being edited must never make the engine fail.

use bigdecimal::BigDecimal;
use tracing::warn;

use crate::types::*;

fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

/// Validate that a percentage lies within 0-100
pub fn validate_percent(value: &BigDecimal, what: &str) -> BillingResult<()> {
    if *value < BigDecimal::from(0) || *value > hundred() {
        return Err(BillingError::InvalidDiscount(format!(
            "{} must be between 0 and 100, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Validate that a fixed discount is not negative
pub fn validate_fixed_discount(value: &BigDecimal) -> BillingResult<()> {
    if *value < BigDecimal::from(0) {
        return Err(BillingError::InvalidDiscount(format!(
            "Fixed discount cannot be negative, got {}",
            value
        )));
    }
    Ok(())
}

/// Validate that a tax profile ID is usable as a catalog key
pub fn validate_profile_id(profile_id: &str) -> BillingResult<()> {
    if profile_id.trim().is_empty() {
        return Err(BillingError::InvalidTaxProfile(
            "Tax profile ID cannot be empty".to_string(),
        ));
    }

    if profile_id.len() > 50 {
        return Err(BillingError::InvalidTaxProfile(
            "Tax profile ID cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a single component rate of a tax profile
pub fn validate_tax_rate(profile_id: &str, name: &str, rate: &BigDecimal) -> BillingResult<()> {
    if name.trim().is_empty() {
        return Err(BillingError::InvalidTaxProfile(format!(
            "Tax profile '{}' has a component without a name",
            profile_id
        )));
    }

    if *rate < BigDecimal::from(0) || *rate > hundred() {
        return Err(BillingError::InvalidTaxProfile(format!(
            "Tax profile '{}' component '{}' rate must be between 0 and 100, got {}",
            profile_id, name, rate
        )));
    }

    Ok(())
}

fn clamp_to_percent_range(value: &BigDecimal) -> BigDecimal {
    if *value < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else if *value > hundred() {
        hundred()
    } else {
        value.clone()
    }
}

/// Clamp a line discount percent into 0-100, recording a notice when it moves
pub fn clamp_line_discount(
    requested: &BigDecimal,
    notices: &mut Vec<CalculationNotice>,
) -> BigDecimal {
    let applied = clamp_to_percent_range(requested);
    if applied != *requested {
        warn!(%requested, %applied, "line discount percent clamped");
        notices.push(CalculationNotice::DiscountClamped {
            requested: requested.clone(),
            applied: applied.clone(),
        });
    }
    applied
}

/// Clamp an overall discount percent into 0-100, recording a notice when it moves
pub fn clamp_overall_percent(
    requested: &BigDecimal,
    notices: &mut Vec<CalculationNotice>,
) -> BigDecimal {
    let applied = clamp_to_percent_range(requested);
    if applied != *requested {
        warn!(%requested, %applied, "overall discount percent clamped");
        notices.push(CalculationNotice::OverallDiscountClamped {
            requested: requested.clone(),
            applied: applied.clone(),
        });
    }
    applied
}

/// Clamp a fixed overall discount to zero from below and to `ceiling` from above
pub fn clamp_fixed_discount(
    requested: &BigDecimal,
    ceiling: &BigDecimal,
    notices: &mut Vec<CalculationNotice>,
) -> BigDecimal {
    let zero = BigDecimal::from(0);
    if *requested < zero {
        warn!(%requested, "negative fixed discount clamped to zero");
        notices.push(CalculationNotice::OverallDiscountClamped {
            requested: requested.clone(),
            applied: zero.clone(),
        });
        return zero;
    }

    if requested > ceiling {
        let applied = if *ceiling > zero { ceiling.clone() } else { zero };
        warn!(%requested, %applied, "fixed discount capped at taxable amount");
        notices.push(CalculationNotice::FixedDiscountCapped {
            requested: requested.clone(),
            applied: applied.clone(),
        });
        return applied;
    }

    requested.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent(&dec("0"), "Discount").is_ok());
        assert!(validate_percent(&dec("100"), "Discount").is_ok());
        assert!(validate_percent(&dec("12.5"), "Discount").is_ok());
        assert!(validate_percent(&dec("-0.01"), "Discount").is_err());
        assert!(validate_percent(&dec("100.01"), "Discount").is_err());
    }

    #[test]
    fn test_validate_profile_id() {
        assert!(validate_profile_id("GST12").is_ok());
        assert!(validate_profile_id("  ").is_err());
        assert!(validate_profile_id(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate("GST12", "CGST", &dec("6")).is_ok());
        assert!(matches!(
            validate_tax_rate("GST12", "", &dec("6")),
            Err(BillingError::InvalidTaxProfile(_))
        ));
        assert!(validate_tax_rate("GST12", "CGST", &dec("101")).is_err());
    }

    #[test]
    fn test_clamp_line_discount_flags_only_when_moved() {
        let mut notices = Vec::new();
        assert_eq!(clamp_line_discount(&dec("10"), &mut notices), dec("10"));
        assert!(notices.is_empty());

        assert_eq!(clamp_line_discount(&dec("150"), &mut notices), dec("100"));
        assert_eq!(clamp_line_discount(&dec("-5"), &mut notices), dec("0"));
        assert_eq!(notices.len(), 2);
        assert_eq!(
            notices[0],
            CalculationNotice::DiscountClamped {
                requested: dec("150"),
                applied: dec("100"),
            }
        );
    }

    #[test]
    fn test_clamp_fixed_discount() {
        let mut notices = Vec::new();
        let ceiling = dec("500");
        assert_eq!(
            clamp_fixed_discount(&dec("50"), &ceiling, &mut notices),
            dec("50")
        );
        assert!(notices.is_empty());

        assert_eq!(
            clamp_fixed_discount(&dec("-1"), &ceiling, &mut notices),
            dec("0")
        );
        assert_eq!(
            clamp_fixed_discount(&dec("800"), &ceiling, &mut notices),
            dec("500")
        );
        assert!(matches!(
            notices[0],
            CalculationNotice::OverallDiscountClamped { .. }
        ));
        assert!(matches!(
            notices[1],
            CalculationNotice::FixedDiscountCapped { .. }
        ));
    }
}
