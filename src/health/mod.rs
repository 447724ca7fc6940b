//! Budget health score under the 50/30/20 rule
//!
//! Needs, Wants and Savings & Debt are measured as a share of total income.
//! Income that no expense consumed is counted as savings.

use crate::finance::format_currency;
use crate::models::{
    Amount, BudgetBucket, HealthScoreResult, ScoreComponents, Transaction, TransactionType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

const NEEDS_TARGET_PCT: f64 = 50.0;
const WANTS_TARGET_PCT: f64 = 30.0;
const SAVINGS_TARGET_PCT: f64 = 20.0;

const NEEDS_PENALTY: f64 = 2.0;
const WANTS_PENALTY: f64 = 1.5;
const SAVINGS_PENALTY: f64 = 1.0;

pub const NO_INCOME_MESSAGE: &str =
    "No income recorded. Add income transactions to calculate a health score.";

pub const OUT_OF_RANGE_MESSAGE: &str =
    "Transaction amounts are too large to score. Check the amounts for data entry errors.";

/// Category name → budget bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    buckets: HashMap<String, BudgetBucket>,
}

impl CategoryTaxonomy {
    pub fn new(entries: impl IntoIterator<Item = (String, BudgetBucket)>) -> Self {
        Self {
            buckets: entries.into_iter().collect(),
        }
    }

    pub fn bucket_of(&self, category: &str) -> Option<BudgetBucket> {
        self.buckets.get(category).copied()
    }

    pub fn categories(&self, bucket: BudgetBucket) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .buckets
            .iter()
            .filter(|(_, b)| **b == bucket)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        let needs = [
            "Groceries",
            "Utilities",
            "Transport",
            "Rent",
            "Health & Wellness",
            "Education",
        ];
        let wants = [
            "Food & Dining",
            "Shopping",
            "Entertainment",
            "Travel",
            "Other Expense",
        ];
        let savings = ["EMI", "Investment"];

        let entries = needs
            .iter()
            .map(|c| (c.to_string(), BudgetBucket::Needs))
            .chain(wants.iter().map(|c| (c.to_string(), BudgetBucket::Wants)))
            .chain(
                savings
                    .iter()
                    .map(|c| (c.to_string(), BudgetBucket::SavingsAndDebt)),
            );

        Self::new(entries)
    }
}

pub struct HealthScoreCalculator {
    taxonomy: CategoryTaxonomy,
}

#[derive(Debug, Default)]
struct Totals {
    income: f64,
    expenses: f64,
    needs: f64,
    wants: f64,
    savings_and_debt: f64,
    uncategorized: f64,
}

impl HealthScoreCalculator {
    pub fn new(taxonomy: CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// Score a transaction history (pure, total)
    pub fn score(&self, transactions: &[Transaction]) -> HealthScoreResult {
        let mut totals = self.accumulate(transactions);

        if totals.income <= 0.0 {
            debug!(transactions = transactions.len(), "No income recorded");
            return HealthScoreResult {
                improvements: vec![NO_INCOME_MESSAGE.to_string()],
                ..HealthScoreResult::default()
            };
        }

        let committed = totals.needs + totals.wants + totals.savings_and_debt;
        let remaining = totals.income - committed;
        if remaining > 0.0 {
            totals.savings_and_debt += remaining;
        }

        let needs_pct = totals.needs * 100.0 / totals.income;
        let wants_pct = totals.wants * 100.0 / totals.income;
        let savings_pct = totals.savings_and_debt * 100.0 / totals.income;

        let all_finite = [
            totals.income,
            totals.expenses,
            totals.uncategorized,
            needs_pct,
            wants_pct,
            savings_pct,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            warn!(transactions = transactions.len(), "Totals overflowed, health score unavailable");
            return HealthScoreResult {
                improvements: vec![OUT_OF_RANGE_MESSAGE.to_string()],
                ..HealthScoreResult::default()
            };
        }

        let components = ScoreComponents {
            needs_points: needs_points(needs_pct),
            wants_points: wants_points(wants_pct),
            savings_points: savings_points(savings_pct),
        };
        let raw = components.needs_points + components.wants_points + components.savings_points;
        let score = raw.clamp(0.0, 100.0).round() as u8;

        let (strengths, improvements) =
            describe(needs_pct, wants_pct, savings_pct, totals.uncategorized);

        debug!(
            score,
            needs_pct, wants_pct, savings_pct, "Health score computed"
        );

        HealthScoreResult {
            score,
            needs_percentage: round2(needs_pct),
            wants_percentage: round2(wants_pct),
            savings_and_debt_percentage: round2(savings_pct),
            total_income: totals.income,
            total_expenses: totals.expenses,
            needs_total: totals.needs,
            wants_total: totals.wants,
            savings_and_debt_total: totals.savings_and_debt,
            uncategorized_expense: totals.uncategorized,
            components,
            strengths,
            improvements,
        }
    }

    fn accumulate(&self, transactions: &[Transaction]) -> Totals {
        let mut totals = Totals::default();

        for tx in transactions {
            if !tx.amount.is_finite() || tx.amount <= 0.0 {
                warn!(
                    date = %tx.date,
                    category = %tx.category,
                    amount = tx.amount,
                    "Skipping transaction with non-positive amount"
                );
                continue;
            }

            match tx.kind {
                TransactionType::Income => totals.income += tx.amount,
                TransactionType::Expense => {
                    totals.expenses += tx.amount;
                    match self.taxonomy.bucket_of(&tx.category) {
                        Some(BudgetBucket::Needs) => totals.needs += tx.amount,
                        Some(BudgetBucket::Wants) => totals.wants += tx.amount,
                        Some(BudgetBucket::SavingsAndDebt) => totals.savings_and_debt += tx.amount,
                        None => totals.uncategorized += tx.amount,
                    }
                }
            }
        }

        totals
    }
}

impl Default for HealthScoreCalculator {
    fn default() -> Self {
        Self::new(CategoryTaxonomy::default())
    }
}

fn needs_points(pct: f64) -> f64 {
    if pct <= NEEDS_TARGET_PCT {
        NEEDS_TARGET_PCT
    } else {
        (NEEDS_TARGET_PCT - (pct - NEEDS_TARGET_PCT) * NEEDS_PENALTY).max(0.0)
    }
}

fn wants_points(pct: f64) -> f64 {
    if pct <= WANTS_TARGET_PCT {
        WANTS_TARGET_PCT
    } else {
        (WANTS_TARGET_PCT - (pct - WANTS_TARGET_PCT) * WANTS_PENALTY).max(0.0)
    }
}

fn savings_points(pct: f64) -> f64 {
    if pct >= SAVINGS_TARGET_PCT {
        SAVINGS_TARGET_PCT
    } else {
        (SAVINGS_TARGET_PCT - (SAVINGS_TARGET_PCT - pct) * SAVINGS_PENALTY).max(0.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn describe(
    needs_pct: f64,
    wants_pct: f64,
    savings_pct: f64,
    uncategorized: f64,
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    if needs_pct <= NEEDS_TARGET_PCT {
        strengths.push(format!(
            "Needs are {:.1}% of income, within the 50% guideline",
            needs_pct
        ));
    } else {
        improvements.push(format!(
            "Needs take {:.1}% of income; aim to bring essentials under 50%",
            needs_pct
        ));
    }

    if wants_pct <= WANTS_TARGET_PCT {
        strengths.push(format!(
            "Wants are {:.1}% of income, within the 30% guideline",
            wants_pct
        ));
    } else {
        improvements.push(format!(
            "Wants take {:.1}% of income; trim discretionary spending toward 30%",
            wants_pct
        ));
    }

    if savings_pct >= SAVINGS_TARGET_PCT {
        strengths.push(format!(
            "Savings & debt repayment is {:.1}% of income, meeting the 20% goal",
            savings_pct
        ));
    } else {
        improvements.push(format!(
            "Savings & debt repayment is only {:.1}% of income; aim for at least 20%",
            savings_pct
        ));
    }

    if uncategorized > 0.0 {
        improvements.push(format!(
            "{} of expenses match no budget category",
            format_currency(uncategorized.round() as Amount)
        ));
    }

    (strengths, improvements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn income(amount: f64) -> Transaction {
        Transaction::income(day(), amount, "Salary")
    }

    fn expense(amount: f64, category: &str) -> Transaction {
        Transaction::expense(day(), amount, category)
    }

    #[test]
    fn test_taxonomy_matches_fixed_mapping() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(taxonomy.categories(BudgetBucket::Needs).len(), 6);
        assert_eq!(taxonomy.categories(BudgetBucket::Wants).len(), 5);
        assert_eq!(
            taxonomy.categories(BudgetBucket::SavingsAndDebt),
            vec!["EMI", "Investment"]
        );
        assert_eq!(taxonomy.bucket_of("Health & Wellness"), Some(BudgetBucket::Needs));
        assert_eq!(taxonomy.bucket_of("Other Expense"), Some(BudgetBucket::Wants));
        assert_eq!(taxonomy.bucket_of("groceries"), None);
    }

    #[test]
    fn test_exact_guideline_scores_100() {
        let result = HealthScoreCalculator::default().score(&[
            income(100_000.0),
            expense(50_000.0, "Rent"),
            expense(30_000.0, "Shopping"),
            expense(20_000.0, "EMI"),
        ]);

        assert_eq!(result.score, 100);
        assert_eq!(result.needs_percentage, 50.0);
        assert_eq!(result.wants_percentage, 30.0);
        assert_eq!(result.savings_and_debt_percentage, 20.0);
        assert_eq!(result.strengths.len(), 3);
        assert!(result.improvements.is_empty());
    }

    #[test]
    fn test_all_needs_clamps_component_to_zero() {
        let result = HealthScoreCalculator::default()
            .score(&[income(100_000.0), expense(100_000.0, "Rent")]);

        assert_eq!(result.components.needs_points, 0.0);
        assert_eq!(result.components.wants_points, 30.0);
        assert_eq!(result.components.savings_points, 0.0);
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_overspend_never_goes_negative() {
        let result = HealthScoreCalculator::default().score(&[
            income(10_000.0),
            expense(40_000.0, "Rent"),
            expense(40_000.0, "Travel"),
        ]);
        assert_eq!(result.score, 0);
        assert_eq!(result.needs_percentage, 400.0);
    }

    #[test]
    fn test_remaining_income_counts_as_savings() {
        let result = HealthScoreCalculator::default().score(&[
            income(60_000.0),
            income(40_000.0),
            expense(40_000.0, "Groceries"),
            expense(10_000.0, "Entertainment"),
        ]);

        assert_eq!(result.savings_and_debt_total, 50_000.0);
        assert_eq!(result.savings_and_debt_percentage, 50.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_uncategorized_expense_tracked_not_bucketed() {
        let result = HealthScoreCalculator::default().score(&[
            income(100_000.0),
            expense(45_000.0, "Rent"),
            expense(25_000.0, "Gifts"),
        ]);

        assert_eq!(result.total_expenses, 70_000.0);
        assert_eq!(result.uncategorized_expense, 25_000.0);
        // Gifts is ignored for buckets, so 55% remains as savings
        assert_eq!(result.savings_and_debt_percentage, 55.0);
        assert!(result
            .improvements
            .iter()
            .any(|i| i.contains("₹25,000")));
    }

    #[test]
    fn test_partial_penalties() {
        // needs 60% → 30, wants 40% → 15, savings 0% → 0
        let result = HealthScoreCalculator::default().score(&[
            income(100_000.0),
            expense(60_000.0, "Rent"),
            expense(40_000.0, "Food & Dining"),
        ]);
        assert_eq!(result.components.needs_points, 30.0);
        assert_eq!(result.components.wants_points, 15.0);
        assert_eq!(result.components.savings_points, 0.0);
        assert_eq!(result.score, 45);
    }

    #[test]
    fn test_zero_income_short_circuits() {
        let calculator = HealthScoreCalculator::default();
        for history in [
            vec![],
            vec![expense(5_000.0, "Rent"), expense(900.0, "Travel")],
            vec![income(0.0), expense(1.0, "EMI")],
        ] {
            let result = calculator.score(&history);
            assert_eq!(result.score, 0);
            assert!(result.strengths.is_empty());
            assert_eq!(result.improvements, vec![NO_INCOME_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_invalid_amounts_are_skipped() {
        let result = HealthScoreCalculator::default().score(&[
            income(100_000.0),
            income(f64::NAN),
            expense(-500.0, "Rent"),
            expense(50_000.0, "Rent"),
        ]);
        assert_eq!(result.total_income, 100_000.0);
        assert_eq!(result.needs_total, 50_000.0);
    }

    #[test]
    fn test_overflowing_totals_never_yield_nan() {
        let calculator = HealthScoreCalculator::default();
        for history in [
            vec![income(f64::MAX), income(f64::MAX), expense(10_000.0, "Rent")],
            vec![income(1.0), expense(f64::MAX, "Rent")],
        ] {
            let result = calculator.score(&history);
            assert_eq!(result.score, 0);
            assert_eq!(result.improvements, vec![OUT_OF_RANGE_MESSAGE.to_string()]);

            let json = serde_json::to_value(&result).unwrap();
            assert!(json["needsPercentage"].is_number());
            assert!(json["savingsAndDebtPercentage"].is_number());
            assert!(json["totalIncome"].is_number());
        }
    }
}
