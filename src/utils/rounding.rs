//! Currency rounding and component reconciliation

use bigdecimal::{BigDecimal, RoundingMode};

use crate::config::ComponentRounding;

/// Round to 2 decimal places, ties away from zero
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// `amount * percent / 100`, unrounded
pub fn percent_of(amount: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    (amount * percent) / BigDecimal::from(100)
}

fn one_cent() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Round each raw component amount and make the rounded parts add up to the
/// rounded sum of the raw amounts.
///
/// `nudge_index` is the component that absorbs the whole difference under
/// [`ComponentRounding::NudgeCgst`]. Under [`ComponentRounding::Independent`] the
/// rounded parts are returned as they are.
pub fn reconcile_components(
    raw: &[BigDecimal],
    nudge_index: usize,
    policy: ComponentRounding,
) -> Vec<BigDecimal> {
    let mut rounded: Vec<BigDecimal> = raw.iter().map(round2).collect();
    if rounded.is_empty() || policy == ComponentRounding::Independent {
        return rounded;
    }

    let raw_sum: BigDecimal = raw.iter().sum();
    let rounded_sum: BigDecimal = rounded.iter().sum();
    let diff = round2(&raw_sum) - rounded_sum;
    let zero = BigDecimal::from(0);
    if diff == zero {
        return rounded;
    }

    match policy {
        ComponentRounding::NudgeCgst => {
            let index = nudge_index.min(rounded.len() - 1);
            rounded[index] += diff;
        }
        ComponentRounding::LargestRemainder => {
            let remainders: Vec<BigDecimal> = raw
                .iter()
                .zip(rounded.iter())
                .map(|(r, q)| r - q)
                .collect();
            let mut order: Vec<usize> = (0..rounded.len()).collect();
            if diff > zero {
                order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
            } else {
                order.sort_by(|&a, &b| remainders[a].cmp(&remainders[b]));
            }

            let step = if diff > zero { one_cent() } else { -one_cent() };
            let mut outstanding = diff;
            for index in order.iter().cycle() {
                if outstanding == zero {
                    break;
                }
                rounded[*index] += step.clone();
                outstanding -= step.clone();
            }
        }
        ComponentRounding::Independent => {}
    }

    rounded
}
