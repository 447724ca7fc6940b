//! Narrative collaborator
//!
//! The engine computes every number itself and only asks a collaborator to
//! explain the result in prose. Implementations receive the full numeric
//! context plus the plan seed.

use crate::finance::{format_currency, format_months};
use crate::models::{FeasibilityResult, PlanOutcome, PlanRequest};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

pub mod gemini;
pub use gemini::GeminiNarrator;

/// Returned in place of generated prose when the collaborator is unavailable
pub const FALLBACK_NARRATIVE: &str = "Your plan has been calculated from your goal, timeframe and income. \
Detailed commentary is temporarily unavailable; the figures above are complete and accurate.";

/// Numeric result handed to the narrative collaborator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext<'a> {
    pub request: &'a PlanRequest,
    pub feasibility: &'a FeasibilityResult,
    pub outcome: &'a PlanOutcome,
}

/// Trait for narrative generation (LLM controlled)
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate_narrative(&self, context: &NarrativeContext<'_>, seed: &str) -> Result<String>;
}

/// Deterministic narrator for development & testing
/// Keeps the system functional without LLM dependency
pub struct TemplateNarrator;

#[async_trait]
impl NarrativeGenerator for TemplateNarrator {
    async fn generate_narrative(&self, context: &NarrativeContext<'_>, _seed: &str) -> Result<String> {
        Ok(render_template(context))
    }
}

fn render_template(context: &NarrativeContext<'_>) -> String {
    let goal = context.request.goal.trim();
    let target = format_currency(context.request.target_amount.round() as i64);

    match context.outcome {
        PlanOutcome::Feasible {
            monthly_savings,
            timeframe_months,
            bucket,
            allocations,
        } => {
            let mix = allocations
                .iter()
                .map(|a| format!("{}% {}", a.allocation_percent, a.instrument_type))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Saving {} a month puts your {} goal of {} within reach in {}. \
                 As a {} goal, the plan spreads contributions across {}.",
                format_currency(*monthly_savings),
                goal,
                target,
                format_months(*timeframe_months),
                bucket.to_string().to_lowercase(),
                mix
            )
        }
        PlanOutcome::Infeasible { analysis } => format!(
            "Reaching {} for your {} goal in the requested time would need {} a month, more than the {} you can comfortably set aside. \
             At that affordable amount the goal is reachable in {}.",
            target,
            goal,
            format_currency(context.feasibility.required_monthly_savings),
            format_currency(context.feasibility.max_affordable_savings),
            analysis.minimum_feasible_timeframe_display
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeasibilityAnalysis, InvestmentAllocation, TimeframeBucket};

    #[tokio::test]
    async fn test_template_narrates_feasible_plan() {
        let request = PlanRequest::new("Car", 500000.0, 3.0, 80000.0);
        let feasibility = FeasibilityResult {
            required_monthly_savings: 12150,
            max_affordable_savings: 40000,
            is_feasible: true,
            annual_return_rate: 0.09,
            analysis: None,
        };
        let outcome = PlanOutcome::Feasible {
            monthly_savings: 12150,
            timeframe_months: 36,
            bucket: TimeframeBucket::ShortTerm,
            allocations: vec![InvestmentAllocation {
                instrument_type: "Recurring Deposit".into(),
                allocation_percent: 100,
                estimated_return_range: "6-7%".into(),
                monthly_investment: 12150,
                future_value: 500000,
            }],
        };
        let context = NarrativeContext {
            request: &request,
            feasibility: &feasibility,
            outcome: &outcome,
        };

        let text = TemplateNarrator.generate_narrative(&context, "abc").await.unwrap();
        assert!(text.contains("₹12,150"));
        assert!(text.contains("3 years"));
        assert!(text.contains("short-term"));
        assert!(text.contains("100% Recurring Deposit"));
    }

    #[tokio::test]
    async fn test_template_narrates_infeasible_plan() {
        let request = PlanRequest::new("House", 5_000_000.0, 2.0, 50000.0);
        let feasibility = FeasibilityResult {
            required_monthly_savings: 190_000,
            max_affordable_savings: 25000,
            is_feasible: false,
            annual_return_rate: 0.09,
            analysis: None,
        };
        let outcome = PlanOutcome::Infeasible {
            analysis: FeasibilityAnalysis {
                minimum_feasible_timeframe_months: 123,
                minimum_feasible_timeframe_display: "10 years 3 months".into(),
                calculation_breakdown: vec![],
            },
        };
        let context = NarrativeContext {
            request: &request,
            feasibility: &feasibility,
            outcome: &outcome,
        };

        let text = TemplateNarrator.generate_narrative(&context, "abc").await.unwrap();
        assert!(text.contains("₹25,000"));
        assert!(text.contains("10 years 3 months"));
    }
}
