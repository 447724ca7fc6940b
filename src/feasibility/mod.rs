//! Feasibility engine
//!
//! Decides whether a savings goal fits inside the affordability cap for the
//! requested timeframe and, when it does not, solves for the shortest
//! timeframe that does.

use crate::error::PlanningError;
use crate::finance::{
    format_currency, format_months, monthly_rate, periods_to_reach, required_payment,
};
use crate::models::{Amount, FeasibilityAnalysis, FeasibilityResult, PlanRequest};
use crate::Result;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityConfig {
    /// Blended annual return assumed for the feasibility check
    pub annual_return_rate: f64,
    /// Share of monthly income that may go to savings
    pub affordability_ratio: f64,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            annual_return_rate: 0.09,
            affordability_ratio: 0.5,
        }
    }
}

/// Caller-facing plausibility bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationLimits {
    pub min_target_amount: f64,
    pub max_target_amount: f64,
    pub min_monthly_income: f64,
    pub max_monthly_income: f64,
    pub min_years: f64,
    pub max_years: f64,
    /// Target may not exceed `income × 12 × years × multiplier`
    pub plausibility_multiplier: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_target_amount: 1000.0,
            max_target_amount: 1e12,
            min_monthly_income: 5000.0,
            max_monthly_income: 1e10,
            min_years: 0.25,
            max_years: 50.0,
            plausibility_multiplier: 10.0,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlanningError::invalid(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(PlanningError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

/// Validate a request before any computation
pub fn validate_request(request: &PlanRequest, limits: &ValidationLimits) -> Result<()> {
    if request.goal.trim().is_empty() {
        return Err(PlanningError::invalid("goal", "must not be empty"));
    }

    require_positive("target_amount", request.target_amount)?;
    require_positive("years", request.years)?;
    require_positive("monthly_income", request.monthly_income)?;

    if request.target_amount < limits.min_target_amount {
        return Err(PlanningError::invalid(
            "target_amount",
            format!("must be at least {}", limits.min_target_amount),
        ));
    }
    if request.target_amount > limits.max_target_amount {
        return Err(PlanningError::invalid(
            "target_amount",
            format!("must be at most {:.0}", limits.max_target_amount),
        ));
    }
    if request.monthly_income < limits.min_monthly_income {
        return Err(PlanningError::invalid(
            "monthly_income",
            format!("must be at least {}", limits.min_monthly_income),
        ));
    }
    if request.monthly_income > limits.max_monthly_income {
        return Err(PlanningError::invalid(
            "monthly_income",
            format!("must be at most {:.0}", limits.max_monthly_income),
        ));
    }
    if request.years < limits.min_years {
        return Err(PlanningError::invalid(
            "years",
            format!("must be at least {}", limits.min_years),
        ));
    }
    if request.years > limits.max_years {
        return Err(PlanningError::invalid(
            "years",
            format!("must be at most {}", limits.max_years),
        ));
    }

    let ceiling =
        request.monthly_income * 12.0 * request.years * limits.plausibility_multiplier;
    if request.target_amount > ceiling {
        return Err(PlanningError::invalid(
            "target_amount",
            format!(
                "exceeds {} times total income over the timeframe ({:.0})",
                limits.plausibility_multiplier, ceiling
            ),
        ));
    }

    Ok(())
}

pub struct FeasibilityEngine {
    config: FeasibilityConfig,
    limits: ValidationLimits,
}

impl FeasibilityEngine {
    pub fn new(config: FeasibilityConfig, limits: ValidationLimits) -> Self {
        Self { config, limits }
    }

    pub fn config(&self) -> &FeasibilityConfig {
        &self.config
    }

    pub fn evaluate(&self, request: &PlanRequest) -> Result<FeasibilityResult> {
        validate_request(request, &self.limits)?;

        let rate = monthly_rate(self.config.annual_return_rate);
        let total_months = request.total_months();

        let required_monthly_savings =
            required_payment(request.target_amount, rate, total_months).round() as Amount;
        let max_affordable_savings =
            (request.monthly_income * self.config.affordability_ratio).round() as Amount;

        debug!(
            goal = %request.goal,
            total_months,
            required_monthly_savings,
            max_affordable_savings,
            "Feasibility computed"
        );

        if required_monthly_savings <= max_affordable_savings {
            return Ok(FeasibilityResult {
                required_monthly_savings,
                max_affordable_savings,
                is_feasible: true,
                annual_return_rate: self.config.annual_return_rate,
                analysis: None,
            });
        }

        let analysis = self.analyse_shortfall(
            request,
            rate,
            required_monthly_savings,
            max_affordable_savings,
        )?;

        Ok(FeasibilityResult {
            required_monthly_savings,
            max_affordable_savings,
            is_feasible: false,
            annual_return_rate: self.config.annual_return_rate,
            analysis: Some(analysis),
        })
    }

    fn analyse_shortfall(
        &self,
        request: &PlanRequest,
        rate: f64,
        required: Amount,
        max_affordable: Amount,
    ) -> Result<FeasibilityAnalysis> {
        let months = periods_to_reach(request.target_amount, rate, max_affordable as f64)?;
        let new_total_months = months.ceil() as u32;
        let display = format_months(new_total_months);

        let shortfall = required - max_affordable;
        let target = request.target_amount.round() as Amount;

        let calculation_breakdown = vec![
            format!(
                "Required monthly savings of {} exceeds the affordable limit of {} ({:.0}% of {} monthly income) by {}.",
                format_currency(required),
                format_currency(max_affordable),
                self.config.affordability_ratio * 100.0,
                format_currency(request.monthly_income.round() as Amount),
                format_currency(shortfall),
            ),
            format!(
                "Adjusting monthly savings to the affordable maximum of {}.",
                format_currency(max_affordable),
            ),
            format!(
                "At {} per month with an assumed {:.1}% annual return, {} is reached in {} months ({}).",
                format_currency(max_affordable),
                self.config.annual_return_rate * 100.0,
                format_currency(target),
                new_total_months,
                display,
            ),
        ];

        debug!(
            goal = %request.goal,
            new_total_months,
            shortfall,
            "Goal infeasible in requested timeframe"
        );

        Ok(FeasibilityAnalysis {
            minimum_feasible_timeframe_months: new_total_months,
            minimum_feasible_timeframe_display: display,
            calculation_breakdown,
        })
    }
}

impl Default for FeasibilityEngine {
    fn default() -> Self {
        Self::new(FeasibilityConfig::default(), ValidationLimits::default())
    }
}
