//! Core data models for the planning and scoring engine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Whole currency units. All monetary outputs are rounded to this at the boundary.
pub type Amount = i64;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeBucket {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBucket {
    Needs,
    Wants,
    SavingsAndDebt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

//
// ================= Planning =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub goal: String,
    pub target_amount: f64,
    pub years: f64,
    pub monthly_income: f64,
}

impl PlanRequest {
    pub fn new(goal: impl Into<String>, target_amount: f64, years: f64, monthly_income: f64) -> Self {
        Self {
            goal: goal.into(),
            target_amount,
            years,
            monthly_income,
        }
    }

    /// Requested timeframe in months (fractional years allowed, rounded to whole months)
    pub fn total_months(&self) -> u32 {
        (self.years * 12.0).round().max(1.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    pub required_monthly_savings: Amount,
    pub max_affordable_savings: Amount,
    pub is_feasible: bool,
    pub annual_return_rate: f64,
    /// Populated only when `is_feasible` is false
    pub analysis: Option<FeasibilityAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityAnalysis {
    pub minimum_feasible_timeframe_months: u32,
    pub minimum_feasible_timeframe_display: String,
    pub calculation_breakdown: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAllocation {
    pub instrument_type: String,
    pub allocation_percent: u32,
    pub estimated_return_range: String,
    pub monthly_investment: Amount,
    pub future_value: Amount,
}

/// Exactly one of the two variants exists per plan, mirroring `FeasibilityResult::is_feasible`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    #[serde(rename_all = "camelCase")]
    Feasible {
        monthly_savings: Amount,
        timeframe_months: u32,
        bucket: TimeframeBucket,
        allocations: Vec<InvestmentAllocation>,
    },
    #[serde(rename_all = "camelCase")]
    Infeasible { analysis: FeasibilityAnalysis },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEventPlan {
    pub plan_id: Uuid,
    pub request: PlanRequest,
    pub seed: String,
    pub feasibility: FeasibilityResult,
    pub outcome: PlanOutcome,
    pub narrative: String,
    pub narrative_source: NarrativeSource,
    pub generated_at: DateTime<Utc>,
}

impl LifeEventPlan {
    pub fn allocations(&self) -> &[InvestmentAllocation] {
        match &self.outcome {
            PlanOutcome::Feasible { allocations, .. } => allocations,
            PlanOutcome::Infeasible { .. } => &[],
        }
    }
}

//
// ================= Health Score =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
}

impl Transaction {
    pub fn income(date: NaiveDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            kind: TransactionType::Income,
            amount,
            category: category.into(),
        }
    }

    pub fn expense(date: NaiveDate, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date,
            kind: TransactionType::Expense,
            amount,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreInput {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub needs_points: f64,
    pub wants_points: f64,
    pub savings_points: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub score: u8,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_and_debt_percentage: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub needs_total: f64,
    pub wants_total: f64,
    /// Categorized savings/debt spending plus any uncommitted income
    pub savings_and_debt_total: f64,
    pub uncategorized_expense: f64,
    pub components: ScoreComponents,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl fmt::Display for TimeframeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeframeBucket::ShortTerm => "Short-Term",
            TimeframeBucket::MediumTerm => "Medium-Term",
            TimeframeBucket::LongTerm => "Long-Term",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for BudgetBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BudgetBucket::Needs => "Needs",
            BudgetBucket::Wants => "Wants",
            BudgetBucket::SavingsAndDebt => "Savings & Debt",
        };
        write!(f, "{}", s)
    }
}
