//! Invoice aggregation and the invoice-level overall discount
//!
//! Three strictly ordered steps:
//! 1. sum the already rounded line results,
//! 2. take the overall discount off the summed taxable base,
//! 3. re-derive tax on the discounted base from the blended invoice rate and
//!    split it across components in their pre-discount proportions.
//!
//! Lines may carry different profiles, so step 3 works on the aggregate rather
//! than re-running each line.

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::config::ComponentRounding;
use crate::types::*;
use crate::utils::rounding::{percent_of, reconcile_components, round2};
use crate::utils::validation::{clamp_fixed_discount, clamp_overall_percent};

/// Running sums of step 1
#[derive(Debug, Default)]
struct LineSums {
    gross: BigDecimal,
    discount: BigDecimal,
    taxable: BigDecimal,
    components: Vec<ComponentAmount>,
    tax: BigDecimal,
    total: BigDecimal,
}

impl LineSums {
    fn collect(lines: &[LineItemResult]) -> Self {
        let mut sums = Self::default();
        for line in lines {
            sums.gross += &line.gross_amount;
            sums.discount += &line.gross_amount - &line.taxable_amount;
            sums.taxable += &line.taxable_amount;
            sums.tax += &line.tax_amount;
            sums.total += &line.total;
            for component in &line.component_amounts {
                match sums
                    .components
                    .iter_mut()
                    .find(|c| c.name == component.name)
                {
                    Some(existing) => existing.amount += &component.amount,
                    None => sums.components.push(component.clone()),
                }
            }
        }

        if sums.components.is_empty() {
            sums.components = vec![
                ComponentAmount::new("CGST", BigDecimal::from(0)),
                ComponentAmount::new("SGST", BigDecimal::from(0)),
            ];
        }
        sums
    }

    /// Untaxed invoices carry no tax, whatever mode the lines were computed in
    fn drop_tax(&mut self) {
        let zero = BigDecimal::from(0);
        for component in &mut self.components {
            component.amount = zero.clone();
        }
        self.tax = zero;
        self.total = self.taxable.clone();
    }
}

/// Aggregate lines with the default component rounding
pub fn aggregate_invoice(
    lines: &[LineItemResult],
    overall_discount: &DiscountSpec,
    mode: GstMode,
) -> InvoiceTotals {
    aggregate_invoice_with(lines, overall_discount, mode, ComponentRounding::default())
}

/// Aggregate lines with an explicit component rounding policy
pub fn aggregate_invoice_with(
    lines: &[LineItemResult],
    overall_discount: &DiscountSpec,
    mode: GstMode,
    rounding: ComponentRounding,
) -> InvoiceTotals {
    let zero = BigDecimal::from(0);
    let mut sums = LineSums::collect(lines);
    if !mode.is_taxed() {
        sums.drop_tax();
    }
    let mut notices = Vec::new();

    // Step 2: overall discount on the summed taxable base. `extra` is rounded
    // here so that gross_total - discount_total == net_taxable_amount to the cent.
    let extra = match overall_discount.kind {
        DiscountKind::Percent => {
            let percent = clamp_overall_percent(&overall_discount.value, &mut notices);
            round2(&percent_of(&sums.taxable, &percent))
        }
        DiscountKind::Fixed => round2(&clamp_fixed_discount(
            &overall_discount.value,
            &sums.taxable,
            &mut notices,
        )),
    };

    if extra == zero {
        let totals = InvoiceTotals {
            gross_total: round2(&sums.gross),
            discount_total: round2(&sums.discount),
            net_taxable_amount: round2(&sums.taxable),
            component_totals: round_components(sums.components),
            tax_total: round2(&sums.tax),
            net_total: round2(&sums.total),
            notices,
        };
        debug!(?mode, lines = lines.len(), net_total = %totals.net_total, "aggregated invoice");
        return totals;
    }

    let net_taxable = &sums.taxable - &extra;

    // Step 3: re-derive tax from the blended rate of the undiscounted invoice
    let new_tax_raw = if sums.taxable == zero || !mode.is_taxed() {
        zero.clone()
    } else {
        &net_taxable * &sums.tax / &sums.taxable
    };

    let raw_components: Vec<BigDecimal> = sums
        .components
        .iter()
        .map(|c| {
            if sums.tax == zero {
                zero.clone()
            } else {
                &new_tax_raw * &c.amount / &sums.tax
            }
        })
        .collect();
    let index = nudge_index(sums.components.iter().map(|c| c.name.as_str()));
    let component_totals: Vec<ComponentAmount> = sums
        .components
        .iter()
        .zip(reconcile_components(&raw_components, index, rounding))
        .map(|(c, amount)| ComponentAmount::new(c.name.clone(), amount))
        .collect();
    let tax_total: BigDecimal = component_totals.iter().map(|c| &c.amount).sum();

    let net_taxable_amount = round2(&net_taxable);
    let net_total = match mode {
        GstMode::NonGst => net_taxable_amount.clone(),
        GstMode::Exclusive => &net_taxable_amount + &tax_total,
        GstMode::Inclusive => {
            // The discount leaves the price together with the tax it carried
            let extra_with_tax = if sums.taxable == zero {
                extra.clone()
            } else {
                &extra + &extra * &sums.tax / &sums.taxable
            };
            let net_total = round2(&(&sums.total - extra_with_tax));
            if net_total < zero {
                zero.clone()
            } else {
                net_total
            }
        }
    };

    let totals = InvoiceTotals {
        gross_total: round2(&sums.gross),
        discount_total: round2(&(&sums.discount + &extra)),
        net_taxable_amount,
        component_totals,
        tax_total,
        net_total,
        notices,
    };

    debug!(
        ?mode,
        lines = lines.len(),
        overall_discount = %extra,
        tax = %totals.tax_total,
        net_total = %totals.net_total,
        "aggregated invoice"
    );

    totals
}

fn round_components(components: Vec<ComponentAmount>) -> Vec<ComponentAmount> {
    components
        .into_iter()
        .map(|c| ComponentAmount::new(c.name, round2(&c.amount)))
        .collect()
}
