//! Allocation planner
//!
//! Splits a feasible monthly savings amount across the instrument mix of a
//! timeframe bucket. The last instrument absorbs every rounding remainder so
//! that percentages sum to 100 and future values sum to the target exactly.

use crate::error::PlanningError;
use crate::finance::{future_value_of_annuity, monthly_rate};
use crate::models::{Amount, InvestmentAllocation, TimeframeBucket};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub instrument_type: String,
    pub allocation_percent: u32,
    pub annual_return: f64,
    pub estimated_return_range: String,
}

impl InstrumentSpec {
    pub fn new(
        instrument_type: &str,
        allocation_percent: u32,
        annual_return: f64,
        estimated_return_range: &str,
    ) -> Self {
        Self {
            instrument_type: instrument_type.to_string(),
            allocation_percent,
            annual_return,
            estimated_return_range: estimated_return_range.to_string(),
        }
    }
}

/// Ordered instrument mixes per timeframe bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentTable {
    /// Upper bound (inclusive, years) of the short-term bucket
    pub short_term_max_years: f64,
    /// Upper bound (inclusive, years) of the medium-term bucket
    pub medium_term_max_years: f64,
    pub short_term: Vec<InstrumentSpec>,
    pub medium_term: Vec<InstrumentSpec>,
    pub long_term: Vec<InstrumentSpec>,
}

impl Default for InstrumentTable {
    fn default() -> Self {
        Self {
            short_term_max_years: 3.0,
            medium_term_max_years: 7.0,
            short_term: vec![
                InstrumentSpec::new("Recurring Deposit", 40, 0.065, "6-7%"),
                InstrumentSpec::new("Debt Mutual Funds", 60, 0.075, "7-8%"),
            ],
            medium_term: vec![
                InstrumentSpec::new("Public Provident Fund", 20, 0.071, "7-7.5%"),
                InstrumentSpec::new("Debt Mutual Funds", 30, 0.075, "7-8%"),
                InstrumentSpec::new("Hybrid Mutual Funds", 50, 0.10, "9-11%"),
            ],
            long_term: vec![
                InstrumentSpec::new("Public Provident Fund", 15, 0.071, "7-7.5%"),
                InstrumentSpec::new("Index Funds", 25, 0.11, "10-12%"),
                InstrumentSpec::new("Equity Mutual Funds (SIP)", 60, 0.12, "11-14%"),
            ],
        }
    }
}

impl InstrumentTable {
    pub fn bucket_for(&self, years: f64) -> TimeframeBucket {
        if years <= self.short_term_max_years {
            TimeframeBucket::ShortTerm
        } else if years <= self.medium_term_max_years {
            TimeframeBucket::MediumTerm
        } else {
            TimeframeBucket::LongTerm
        }
    }

    pub fn instruments(&self, bucket: TimeframeBucket) -> &[InstrumentSpec] {
        match bucket {
            TimeframeBucket::ShortTerm => &self.short_term,
            TimeframeBucket::MediumTerm => &self.medium_term,
            TimeframeBucket::LongTerm => &self.long_term,
        }
    }

    /// Every bucket must be non-empty and sum to 100%
    pub fn validate(&self) -> Result<()> {
        for bucket in [
            TimeframeBucket::ShortTerm,
            TimeframeBucket::MediumTerm,
            TimeframeBucket::LongTerm,
        ] {
            let specs = self.instruments(bucket);
            if specs.is_empty() {
                return Err(PlanningError::Config(format!("{} bucket has no instruments", bucket)));
            }
            let total: u32 = specs.iter().map(|s| s.allocation_percent).sum();
            if total != 100 {
                return Err(PlanningError::Config(format!(
                    "{} bucket allocations sum to {}%, expected 100%",
                    bucket, total
                )));
            }
        }
        if self.short_term_max_years >= self.medium_term_max_years {
            return Err(PlanningError::Config(
                "short-term bound must be below medium-term bound".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub bucket: TimeframeBucket,
    pub allocations: Vec<InvestmentAllocation>,
}

pub struct AllocationPlanner {
    table: InstrumentTable,
}

impl AllocationPlanner {
    pub fn new(table: InstrumentTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &InstrumentTable {
        &self.table
    }

    pub fn allocate(
        &self,
        monthly_savings: Amount,
        years: f64,
        total_months: u32,
        target_amount: Amount,
    ) -> Result<AllocationPlan> {
        let bucket = self.table.bucket_for(years);
        let specs = self.table.instruments(bucket);

        let Some((last_spec, leading)) = specs.split_last() else {
            return Err(PlanningError::AllocationInvariant(format!(
                "{} bucket has no instruments",
                bucket
            )));
        };

        let mut allocations = Vec::with_capacity(specs.len());
        let mut percent_so_far = 0u32;
        let mut monthly_so_far: Amount = 0;

        for spec in leading {
            let monthly_investment = to_amount(
                monthly_savings as f64 * f64::from(spec.allocation_percent) / 100.0,
                "monthly investment",
            )?;
            percent_so_far += spec.allocation_percent;
            monthly_so_far = checked_total([monthly_so_far, monthly_investment], "monthly investments")?;
            allocations.push(Self::build(spec, spec.allocation_percent, monthly_investment, total_months)?);
        }

        let last_percent = 100u32.saturating_sub(percent_so_far);
        let last_monthly = monthly_savings.checked_sub(monthly_so_far).ok_or_else(|| {
            PlanningError::AllocationInvariant("monthly investments overflow".to_string())
        })?;
        allocations.push(Self::build(last_spec, last_percent, last_monthly, total_months)?);

        // Rounding reconciliation: the last instrument takes the residual
        let projected = checked_total(allocations.iter().map(|a| a.future_value), "future values")?;
        let residual = target_amount.checked_sub(projected).ok_or_else(|| {
            PlanningError::AllocationInvariant("future value residual overflows".to_string())
        })?;
        if let Some(last) = allocations.last_mut() {
            last.future_value = checked_total([last.future_value, residual], "future values")?;
        }

        debug!(
            %bucket,
            monthly_savings,
            projected,
            residual,
            "Allocation reconciled against target"
        );

        verify_allocations(&allocations, target_amount)?;

        Ok(AllocationPlan {
            bucket,
            allocations,
        })
    }

    fn build(
        spec: &InstrumentSpec,
        allocation_percent: u32,
        monthly_investment: Amount,
        total_months: u32,
    ) -> Result<InvestmentAllocation> {
        let future_value = to_amount(
            future_value_of_annuity(
                monthly_investment as f64,
                monthly_rate(spec.annual_return),
                total_months,
            ),
            "future value",
        )?;

        Ok(InvestmentAllocation {
            instrument_type: spec.instrument_type.clone(),
            allocation_percent,
            estimated_return_range: spec.estimated_return_range.clone(),
            monthly_investment,
            future_value,
        })
    }
}

impl Default for AllocationPlanner {
    fn default() -> Self {
        Self {
            table: InstrumentTable::default(),
        }
    }
}

/// Round into whole units, rejecting values an `Amount` cannot hold
fn to_amount(value: f64, what: &str) -> Result<Amount> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() >= Amount::MAX as f64 {
        return Err(PlanningError::AllocationInvariant(format!(
            "{} {} is out of range",
            what, value
        )));
    }
    Ok(rounded as Amount)
}

fn checked_total(values: impl IntoIterator<Item = Amount>, what: &str) -> Result<Amount> {
    values
        .into_iter()
        .try_fold(0 as Amount, |acc, v| acc.checked_add(v))
        .ok_or_else(|| PlanningError::AllocationInvariant(format!("{} overflow", what)))
}

/// Post-construction check: percentages sum to 100, future values to the target
pub fn verify_allocations(allocations: &[InvestmentAllocation], target_amount: Amount) -> Result<()> {
    let percent: u32 = allocations.iter().map(|a| a.allocation_percent).sum();
    if percent != 100 {
        return Err(PlanningError::AllocationInvariant(format!(
            "allocation percentages sum to {}",
            percent
        )));
    }

    let future_value = checked_total(allocations.iter().map(|a| a.future_value), "future values")?;
    if future_value != target_amount {
        return Err(PlanningError::AllocationInvariant(format!(
            "future values sum to {}, target is {}",
            future_value, target_amount
        )));
    }

    Ok(())
}
