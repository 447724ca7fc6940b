//! Ordinary-annuity mathematics
//!
//! All functions return unrounded values. Callers round monetary results to
//! whole currency units once, at the boundary, so chained calls do not
//! compound rounding error.

use crate::error::PlanningError;
use crate::Result;

/// Monthly rates below this use the linear (zero-interest) formulas
pub const NEAR_ZERO_RATE: f64 = 1e-4;

/// Longest timeframe the engine will propose (50 years)
pub const MAX_TIMEFRAME_MONTHS: f64 = 600.0;

/// Convert a nominal annual rate to a monthly rate
pub fn monthly_rate(annual_rate: f64) -> f64 {
    annual_rate / 12.0
}

/// Future value of `total_months` end-of-month payments compounding at `monthly_rate`
pub fn future_value_of_annuity(payment: f64, monthly_rate: f64, total_months: u32) -> f64 {
    let n = f64::from(total_months);

    if monthly_rate < NEAR_ZERO_RATE {
        return payment * n;
    }

    payment * ((1.0 + monthly_rate).powf(n) - 1.0) / monthly_rate
}

/// Monthly payment needed to accumulate `target_future_value` after `total_months`
pub fn required_payment(target_future_value: f64, monthly_rate: f64, total_months: u32) -> f64 {
    if total_months == 0 {
        return target_future_value;
    }

    let n = f64::from(total_months);

    if monthly_rate < NEAR_ZERO_RATE {
        return target_future_value / n;
    }

    target_future_value * monthly_rate / ((1.0 + monthly_rate).powf(n) - 1.0)
}

/// Fractional number of months of `payment` needed to reach `target_future_value`
///
/// Solves `n = ln(FV·r/P + 1) / ln(1 + r)`. Fails with `UnreachableGoal` when
/// the ratio is not positive and with `UnrealisticTimeframe` when the result is
/// non-finite or beyond [`MAX_TIMEFRAME_MONTHS`].
pub fn periods_to_reach(target_future_value: f64, monthly_rate: f64, payment: f64) -> Result<f64> {
    if !(payment > 0.0) || !payment.is_finite() {
        return Err(PlanningError::UnreachableGoal(format!(
            "a monthly contribution of {:.0} can never reach the target",
            payment
        )));
    }

    // NaN fails this check too
    if !(target_future_value > 0.0) || !target_future_value.is_finite() {
        return Err(PlanningError::UnreachableGoal(format!(
            "target {:.0} is not a positive amount",
            target_future_value
        )));
    }

    let months = if monthly_rate < NEAR_ZERO_RATE {
        target_future_value / payment
    } else {
        let ratio = target_future_value * monthly_rate / payment;

        // NaN fails this check too
        if !(ratio > 0.0) {
            return Err(PlanningError::UnreachableGoal(format!(
                "target {:.0} cannot be reached with {:.0} per month",
                target_future_value, payment
            )));
        }

        (ratio + 1.0).ln() / (1.0 + monthly_rate).ln()
    };

    if !months.is_finite() {
        return Err(PlanningError::UnrealisticTimeframe(
            "timeframe calculation did not converge".to_string(),
        ));
    }

    if months > MAX_TIMEFRAME_MONTHS {
        return Err(PlanningError::UnrealisticTimeframe(format!(
            "reaching the target would take {:.0} months, beyond the {} year limit",
            months.ceil(),
            (MAX_TIMEFRAME_MONTHS / 12.0) as u32
        )));
    }

    Ok(months)
}
