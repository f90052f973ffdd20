//! Per-line tax and discount calculation
//!
//! Each call is pure: the same input, rates and mode always produce the same
//! result, and the result is meant to replace whatever the caller displayed
//! before.
//!
//! | Mode      | taxable                              | total                 |
//! |-----------|--------------------------------------|-----------------------|
//! | NON_GST   | gross - discount                     | taxable               |
//! | EXCLUSIVE | gross - discount                     | taxable + tax         |
//! | INCLUSIVE | (gross - discount) / (1 + rate/100)  | gross - discount      |

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::config::ComponentRounding;
use crate::tax::resolver::TaxRates;
use crate::types::*;
use crate::utils::rounding::{percent_of, reconcile_components, round2};
use crate::utils::validation::clamp_line_discount;

/// Calculate a line with the default component rounding
pub fn calculate_line_item(
    input: &LineItemInput,
    rates: &TaxRates,
    mode: GstMode,
) -> LineItemResult {
    calculate_line_item_with(input, rates, mode, ComponentRounding::default())
}

/// Calculate a line with an explicit component rounding policy
pub fn calculate_line_item_with(
    input: &LineItemInput,
    rates: &TaxRates,
    mode: GstMode,
    rounding: ComponentRounding,
) -> LineItemResult {
    let zero_rates;
    let applied_rates = if mode.is_taxed() {
        rates
    } else {
        zero_rates = TaxRates::zero();
        &zero_rates
    };

    let mut notices = rates.notices.clone();
    let zero = BigDecimal::from(0);

    // Rows are edited incrementally; an incomplete row is all zeros, not an error
    if input.quantity <= 0 || input.unit_price <= zero {
        return LineItemResult::zeroed(applied_rates.component_names(), notices);
    }

    let discount_percent = clamp_line_discount(&input.discount_percent, &mut notices);
    let gross = BigDecimal::from(input.quantity) * &input.unit_price;
    let discounted = &gross - percent_of(&gross, &discount_percent);

    let total_rate = applied_rates.total_rate();
    let taxable_raw = match mode {
        GstMode::NonGst | GstMode::Exclusive => discounted.clone(),
        GstMode::Inclusive if total_rate <= zero => discounted.clone(),
        GstMode::Inclusive => {
            let divisor = BigDecimal::from(1) + percent_of(&BigDecimal::from(1), &total_rate);
            &discounted / divisor
        }
    };

    let raw_components: Vec<BigDecimal> = applied_rates
        .components
        .iter()
        .map(|c| percent_of(&taxable_raw, &c.rate))
        .collect();
    let rounded_components =
        reconcile_components(&raw_components, applied_rates.nudge_index(), rounding);

    let component_amounts: Vec<ComponentAmount> = applied_rates
        .components
        .iter()
        .zip(rounded_components)
        .map(|(c, amount)| ComponentAmount::new(c.name.clone(), amount))
        .collect();
    let tax_amount: BigDecimal = component_amounts.iter().map(|c| &c.amount).sum();

    let gross_amount = round2(&gross);
    let taxable_amount = round2(&taxable_raw);
    let discounted_amount = round2(&discounted);
    let total = match mode {
        GstMode::NonGst => taxable_amount.clone(),
        GstMode::Exclusive => &taxable_amount + &tax_amount,
        GstMode::Inclusive => discounted_amount.clone(),
    };

    let result = LineItemResult {
        discount_amount: &gross_amount - &discounted_amount,
        gross_amount,
        taxable_amount,
        component_amounts,
        tax_amount,
        total,
        notices,
    };

    debug!(
        ?mode,
        quantity = input.quantity,
        gross = %result.gross_amount,
        taxable = %result.taxable_amount,
        tax = %result.tax_amount,
        total = %result.total,
        "calculated line item"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn gst12() -> TaxRates {
        TaxRates::cgst_sgst(dec("6"), dec("6"))
    }

    fn ten_at_hundred() -> LineItemInput {
        LineItemInput::new(10, dec("100"), dec("10"))
    }

    #[test]
    fn test_exclusive_line() {
        let result = calculate_line_item(&ten_at_hundred(), &gst12(), GstMode::Exclusive);

        assert_eq!(result.gross_amount, dec("1000"));
        assert_eq!(result.discount_amount, dec("100"));
        assert_eq!(result.taxable_amount, dec("900"));
        assert_eq!(result.cgst_amount(), dec("54"));
        assert_eq!(result.sgst_amount(), dec("54"));
        assert_eq!(result.tax_amount, dec("108"));
        assert_eq!(result.total, dec("1008"));
        assert!(result.notices.is_empty());
    }

    #[test]
    fn test_inclusive_line_backs_tax_out() {
        let result = calculate_line_item(&ten_at_hundred(), &gst12(), GstMode::Inclusive);

        assert_eq!(result.gross_amount, dec("1000"));
        assert_eq!(result.taxable_amount, dec("803.57"));
        // 48.2142857.. each; the rounding cent goes to CGST
        assert_eq!(result.cgst_amount(), dec("48.22"));
        assert_eq!(result.sgst_amount(), dec("48.21"));
        assert_eq!(result.tax_amount, dec("96.43"));
        assert_eq!(result.total, dec("900"));
    }

    #[test]
    fn test_inclusive_line_independent_rounding() {
        let result = calculate_line_item_with(
            &ten_at_hundred(),
            &gst12(),
            GstMode::Inclusive,
            ComponentRounding::Independent,
        );

        assert_eq!(result.taxable_amount, dec("803.57"));
        assert_eq!(result.cgst_amount(), dec("48.21"));
        assert_eq!(result.sgst_amount(), dec("48.21"));
        assert_eq!(result.tax_amount, dec("96.42"));
        assert_eq!(result.total, dec("900"));
    }

    #[test]
    fn test_non_gst_line_ignores_rates() {
        let result = calculate_line_item(&ten_at_hundred(), &gst12(), GstMode::NonGst);

        assert_eq!(result.taxable_amount, dec("900"));
        assert_eq!(result.cgst_amount(), dec("0"));
        assert_eq!(result.sgst_amount(), dec("0"));
        assert_eq!(result.tax_amount, dec("0"));
        assert_eq!(result.total, dec("900"));
    }

    #[test]
    fn test_inclusive_zero_rate_keeps_price() {
        let result = calculate_line_item(&ten_at_hundred(), &TaxRates::zero(), GstMode::Inclusive);
        assert_eq!(result.taxable_amount, dec("900"));
        assert_eq!(result.tax_amount, dec("0"));
        assert_eq!(result.total, dec("900"));
    }

    #[test]
    fn test_inclusive_non_positive_rate_keeps_price() {
        let rates = TaxRates::cgst_sgst(dec("-50"), dec("-50"));
        let result = calculate_line_item(&ten_at_hundred(), &rates, GstMode::Inclusive);
        assert_eq!(result.taxable_amount, dec("900"));
        assert_eq!(result.total, dec("900"));
    }

    #[test]
    fn test_degenerate_rows_are_zeroed() {
        let rows = [
            LineItemInput::new(0, dec("100"), dec("10")),
            LineItemInput::new(-3, dec("100"), dec("0")),
            LineItemInput::new(5, dec("0"), dec("0")),
            LineItemInput::new(5, dec("-20"), dec("0")),
        ];
        for mode in [GstMode::Inclusive, GstMode::Exclusive, GstMode::NonGst] {
            for row in &rows {
                let result = calculate_line_item(row, &gst12(), mode);
                assert_eq!(result.gross_amount, dec("0"));
                assert_eq!(result.discount_amount, dec("0"));
                assert_eq!(result.taxable_amount, dec("0"));
                assert_eq!(result.tax_amount, dec("0"));
                assert_eq!(result.total, dec("0"));
                assert!(result.component_amounts.iter().all(|c| c.amount == dec("0")));
            }
        }
    }

    #[test]
    fn test_discount_is_clamped_and_flagged() {
        let input = LineItemInput::new(2, dec("50"), dec("130"));
        let result = calculate_line_item(&input, &gst12(), GstMode::Exclusive);
        assert_eq!(result.taxable_amount, dec("0"));
        assert_eq!(result.total, dec("0"));
        assert_eq!(
            result.notices,
            vec![CalculationNotice::DiscountClamped {
                requested: dec("130"),
                applied: dec("100"),
            }]
        );

        let input = LineItemInput::new(2, dec("50"), dec("-10"));
        let result = calculate_line_item(&input, &gst12(), GstMode::Exclusive);
        assert_eq!(result.taxable_amount, dec("100"));
        assert_eq!(result.total, dec("112"));
        assert_eq!(result.notices.len(), 1);
    }

    #[test]
    fn test_fallback_notice_carried_from_rates() {
        let mut rates = TaxRates::zero();
        rates.notices.push(CalculationNotice::TaxProfileFallback {
            profile_id: "GST99".to_string(),
        });
        let result = calculate_line_item(&ten_at_hundred(), &rates, GstMode::Exclusive);
        assert_eq!(result.total, dec("900"));
        assert_eq!(result.notices.len(), 1);
    }

    #[test]
    fn test_igst_and_cess_components() {
        let rates = TaxRates {
            profile_id: Some("IGST18C".to_string()),
            components: vec![
                TaxComponent::new("IGST", dec("18")),
                TaxComponent::new("CESS", dec("1")),
            ],
            notices: Vec::new(),
        };
        let input = LineItemInput::new(3, dec("33.33"), dec("0"));
        let result = calculate_line_item(&input, &rates, GstMode::Exclusive);

        // taxable 99.99; IGST 17.9982, CESS 0.9999
        assert_eq!(result.taxable_amount, dec("99.99"));
        assert_eq!(result.component("IGST"), Some(&dec("18.00")));
        assert_eq!(result.component("CESS"), Some(&dec("1.00")));
        assert_eq!(result.tax_amount, dec("19.00"));
        assert_eq!(result.total, dec("118.99"));
        assert_eq!(result.cgst_amount(), dec("0"));
    }

    #[test]
    fn test_rounding_cent_lands_on_cgst() {
        // taxable 0.25 at 2.5% + 2.5%: 0.00625 each -> 0.01 each, sum 0.0125 -> 0.01
        let rates = TaxRates::cgst_sgst(dec("2.5"), dec("2.5"));
        let input = LineItemInput::new(1, dec("0.25"), dec("0"));
        let result = calculate_line_item(&input, &rates, GstMode::Exclusive);
        assert_eq!(result.cgst_amount(), dec("0"));
        assert_eq!(result.sgst_amount(), dec("0.01"));
        assert_eq!(result.tax_amount, dec("0.01"));
        assert_eq!(result.total, dec("0.26"));
    }

    #[test]
    fn test_fractional_price_rounds_once() {
        let input = LineItemInput::new(3, dec("10.335"), dec("0"));
        let result = calculate_line_item(&input, &TaxRates::zero(), GstMode::NonGst);
        // 31.005 -> 31.01
        assert_eq!(result.gross_amount, dec("31.01"));
        assert_eq!(result.total, dec("31.01"));
        assert_eq!(result.discount_amount, dec("0"));
    }
}
