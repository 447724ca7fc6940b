use chrono::NaiveDate;
use life_event_planner::{
    finance::format_currency,
    models::{HealthScoreInput, PlanOutcome, PlanRequest, Transaction},
    narrative::TemplateNarrator,
    EngineConfig, PlanningOrchestrator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    dotenv::dotenv().ok();

    info!("Life Event Planner demo starting");

    let config = EngineConfig::from_env()?;
    let orchestrator = PlanningOrchestrator::new(config, Box::new(TemplateNarrator))?;

    let requests = [
        PlanRequest::new("Car", 500000.0, 3.0, 80000.0),
        PlanRequest::new("House", 5_000_000.0, 2.0, 50000.0),
    ];

    for request in requests {
        let plan = orchestrator.plan_life_event(request).await?;

        println!("\n=== PLAN: {} ===", plan.request.goal);
        println!("Seed: {}", plan.seed);
        println!(
            "Required monthly savings: {}",
            format_currency(plan.feasibility.required_monthly_savings)
        );
        println!(
            "Affordable monthly savings: {}",
            format_currency(plan.feasibility.max_affordable_savings)
        );

        match &plan.outcome {
            PlanOutcome::Feasible {
                bucket, allocations, ..
            } => {
                println!("Feasible ({} mix):", bucket);
                for a in allocations {
                    println!(
                        "  {:<28} {:>3}%  {:>10}/month  -> {:>12}  ({})",
                        a.instrument_type,
                        a.allocation_percent,
                        format_currency(a.monthly_investment),
                        format_currency(a.future_value),
                        a.estimated_return_range
                    );
                }
            }
            PlanOutcome::Infeasible { analysis } => {
                println!(
                    "Infeasible. Minimum timeframe: {}",
                    analysis.minimum_feasible_timeframe_display
                );
                for (i, step) in analysis.calculation_breakdown.iter().enumerate() {
                    println!("  {}: {}", i + 1, step);
                }
            }
        }
        println!("\n{}", plan.narrative);
    }

    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default();
    let score = orchestrator.score_financial_health(&HealthScoreInput {
        transactions: vec![
            Transaction::income(day(1), 90_000.0, "Salary"),
            Transaction::expense(day(2), 28_000.0, "Rent"),
            Transaction::expense(day(5), 9_500.0, "Groceries"),
            Transaction::expense(day(9), 14_000.0, "Food & Dining"),
            Transaction::expense(day(14), 16_000.0, "Shopping"),
            Transaction::expense(day(20), 12_000.0, "EMI"),
        ],
    });

    println!("\n=== FINANCIAL HEALTH ===");
    println!("Score: {}/100", score.score);
    println!(
        "Needs {:.1}% • Wants {:.1}% • Savings & Debt {:.1}%",
        score.needs_percentage, score.wants_percentage, score.savings_and_debt_percentage
    );
    for s in &score.strengths {
        println!("  + {}", s);
    }
    for i in &score.improvements {
        println!("  - {}", i);
    }

    Ok(())
}
