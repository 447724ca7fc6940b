//! Planning orchestrator
//!
//! VALIDATE → FEASIBILITY → ALLOCATE? → SEED → NARRATE (with retry) → MERGE
//!
//! The only component that talks to the narrative collaborator. Numbers are
//! never blocked on prose: if narration fails the plan ships with a fixed
//! fallback text.

use crate::allocation::AllocationPlanner;
use crate::config::EngineConfig;
use crate::feasibility::FeasibilityEngine;
use crate::health::HealthScoreCalculator;
use crate::models::{
    HealthScoreInput, HealthScoreResult, LifeEventPlan, NarrativeSource, PlanOutcome, PlanRequest,
};
use crate::narrative::{NarrativeContext, NarrativeGenerator, FALLBACK_NARRATIVE};
use crate::resilience::{classify_narrative_error, ResilientInvoker};
use crate::seed::seed_for_request;
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

pub struct PlanningOrchestrator {
    feasibility: FeasibilityEngine,
    allocation: AllocationPlanner,
    health: HealthScoreCalculator,
    narrator: Box<dyn NarrativeGenerator>,
    invoker: ResilientInvoker,
}

impl PlanningOrchestrator {
    pub fn new(config: EngineConfig, narrator: Box<dyn NarrativeGenerator>) -> Result<Self> {
        let EngineConfig {
            feasibility,
            validation,
            retry,
            instruments,
            taxonomy,
        } = config;

        Ok(Self {
            feasibility: FeasibilityEngine::new(feasibility, validation),
            allocation: AllocationPlanner::new(instruments)?,
            health: HealthScoreCalculator::new(taxonomy),
            narrator,
            invoker: ResilientInvoker::new(retry),
        })
    }

    /// Produce a complete plan for a savings goal
    #[instrument(skip(self, request), fields(goal = %request.goal, seed))]
    pub async fn plan_life_event(&self, request: PlanRequest) -> Result<LifeEventPlan> {
        let start_time = Instant::now();

        info!(
            goal = %request.goal,
            target_amount = request.target_amount,
            years = request.years,
            "Planning life event"
        );

        let feasibility = self.feasibility.evaluate(&request)?;

        let outcome = match &feasibility.analysis {
            None => {
                let total_months = request.total_months();
                let plan = self.allocation.allocate(
                    feasibility.required_monthly_savings,
                    request.years,
                    total_months,
                    request.target_amount.round() as i64,
                )?;
                PlanOutcome::Feasible {
                    monthly_savings: feasibility.required_monthly_savings,
                    timeframe_months: total_months,
                    bucket: plan.bucket,
                    allocations: plan.allocations,
                }
            }
            Some(analysis) => PlanOutcome::Infeasible {
                analysis: analysis.clone(),
            },
        };

        let seed = seed_for_request(&request);
        Span::current().record("seed", seed.as_str());
        debug!(%seed, feasible = feasibility.is_feasible, "Numeric plan complete");

        let context = NarrativeContext {
            request: &request,
            feasibility: &feasibility,
            outcome: &outcome,
        };

        let context = &context;
        let seed_ref = seed.as_str();
        let narrated = self
            .invoker
            .invoke(
                move || self.narrator.generate_narrative(context, seed_ref),
                classify_narrative_error,
            )
            .await;

        let (narrative, narrative_source) = match narrated {
            Ok(text) => (text, NarrativeSource::Generated),
            Err(e) => {
                warn!(%seed, error = %e, "Narrative unavailable, using fallback");
                (FALLBACK_NARRATIVE.to_string(), NarrativeSource::Fallback)
            }
        };

        info!(
            %seed,
            feasible = feasibility.is_feasible,
            ?narrative_source,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Plan ready"
        );

        Ok(LifeEventPlan {
            plan_id: Uuid::new_v4(),
            request,
            seed,
            feasibility,
            outcome,
            narrative,
            narrative_source,
            generated_at: Utc::now(),
        })
    }

    /// Score budget adherence for a transaction history
    #[instrument(skip(self, input), fields(transactions = input.transactions.len()))]
    pub fn score_financial_health(&self, input: &HealthScoreInput) -> HealthScoreResult {
        let result = self.health.score(&input.transactions);
        info!(
            score = result.score,
            "Financial health scored"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanningError;
    use crate::models::Transaction;
    use crate::narrative::TemplateNarrator;
    use crate::resilience::RetryPolicy;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Fails `failures` times with the given error, then echoes the seed
    struct FlakyNarrator {
        calls: Arc<AtomicU32>,
        failures: u32,
        make_err: fn() -> PlanningError,
    }

    #[async_trait]
    impl NarrativeGenerator for FlakyNarrator {
        async fn generate_narrative(
            &self,
            _context: &NarrativeContext<'_>,
            seed: &str,
        ) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err((self.make_err)())
            } else {
                Ok(format!("narrative for {}", seed))
            }
        }
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(4),
                max_jitter: Duration::ZERO,
            },
            ..EngineConfig::default()
        }
    }

    fn flaky(failures: u32, make_err: fn() -> PlanningError) -> (PlanningOrchestrator, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let narrator = FlakyNarrator {
            calls: calls.clone(),
            failures,
            make_err,
        };
        let orchestrator = PlanningOrchestrator::new(fast_config(), Box::new(narrator)).unwrap();
        (orchestrator, calls)
    }

    #[tokio::test]
    async fn test_car_plan_end_to_end() {
        let orchestrator =
            PlanningOrchestrator::new(EngineConfig::default(), Box::new(TemplateNarrator)).unwrap();

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("Car", 500000.0, 3.0, 80000.0))
            .await
            .unwrap();

        assert!(plan.feasibility.is_feasible);
        assert_eq!(plan.feasibility.max_affordable_savings, 40000);
        assert_eq!(plan.narrative_source, NarrativeSource::Generated);

        let allocations = plan.allocations();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations.iter().map(|a| a.allocation_percent).sum::<u32>(), 100);
        assert_eq!(allocations.iter().map(|a| a.future_value).sum::<i64>(), 500000);
    }

    #[tokio::test]
    async fn test_house_plan_is_infeasible_with_analysis() {
        let orchestrator =
            PlanningOrchestrator::new(EngineConfig::default(), Box::new(TemplateNarrator)).unwrap();

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("House", 5_000_000.0, 2.0, 50000.0))
            .await
            .unwrap();

        assert!(!plan.feasibility.is_feasible);
        assert!(plan.allocations().is_empty());
        match &plan.outcome {
            PlanOutcome::Infeasible { analysis } => {
                assert_eq!(analysis.minimum_feasible_timeframe_months, 123);
                assert_eq!(analysis.calculation_breakdown.len(), 3);
            }
            other => panic!("expected infeasible outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_input_surfaces_without_narration() {
        let (orchestrator, calls) = flaky(0, || PlanningError::LlmError("unused".into()));

        let err = orchestrator
            .plan_life_event(PlanRequest::new("Car", 500.0, 3.0, 80000.0))
            .await
            .unwrap_err();

        assert!(matches!(err, PlanningError::InvalidInput { field: "target_amount", .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected_not_overflowed() {
        let (orchestrator, calls) = flaky(0, || PlanningError::LlmError("unused".into()));

        let err = orchestrator
            .plan_life_event(PlanRequest::new("Big", 9.0e18, 50.0, 9.0e18))
            .await
            .unwrap_err();

        assert!(matches!(err, PlanningError::InvalidInput { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_largest_accepted_amounts_plan_cleanly() {
        let (orchestrator, _) = flaky(0, || PlanningError::LlmError("unused".into()));

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("Estate", 1e12, 50.0, 1e10))
            .await
            .unwrap();

        assert!(plan.feasibility.is_feasible);
        assert_eq!(
            plan.allocations().iter().map(|a| a.future_value).sum::<i64>(),
            1_000_000_000_000
        );
    }

    #[tokio::test]
    async fn test_transient_narrative_failure_recovers() {
        let (orchestrator, calls) = flaky(2, || PlanningError::Overloaded("busy".into()));

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("Car", 500000.0, 3.0, 80000.0))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(plan.narrative_source, NarrativeSource::Generated);
        assert_eq!(plan.narrative, format!("narrative for {}", plan.seed));
    }

    #[tokio::test]
    async fn test_exhausted_retries_fall_back() {
        let (orchestrator, calls) = flaky(u32::MAX, || PlanningError::RateLimited("429".into()));

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("Car", 500000.0, 3.0, 80000.0))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(plan.narrative_source, NarrativeSource::Fallback);
        assert_eq!(plan.narrative, FALLBACK_NARRATIVE);
        assert_eq!(plan.allocations().iter().map(|a| a.future_value).sum::<i64>(), 500000);
    }

    #[tokio::test]
    async fn test_fatal_narrative_error_is_not_retried() {
        let (orchestrator, calls) = flaky(u32::MAX, || PlanningError::LlmError("garbled".into()));

        let plan = orchestrator
            .plan_life_event(PlanRequest::new("Car", 500000.0, 3.0, 80000.0))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(plan.narrative_source, NarrativeSource::Fallback);
    }

    #[tokio::test]
    async fn test_identical_requests_share_seed() {
        let (orchestrator, _) = flaky(0, || PlanningError::LlmError("unused".into()));
        let request = PlanRequest::new("Wedding", 1_200_000.0, 4.0, 90000.0);

        let first = orchestrator.plan_life_event(request.clone()).await.unwrap();
        let second = orchestrator.plan_life_event(request).await.unwrap();

        assert_eq!(first.seed, second.seed);
        assert_eq!(first.narrative, second.narrative);
        assert_ne!(first.plan_id, second.plan_id);
    }

    #[test]
    fn test_score_financial_health_delegates() {
        let orchestrator =
            PlanningOrchestrator::new(EngineConfig::default(), Box::new(TemplateNarrator)).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let result = orchestrator.score_financial_health(&HealthScoreInput {
            transactions: vec![
                Transaction::income(day, 80_000.0, "Salary"),
                Transaction::expense(day, 30_000.0, "Rent"),
                Transaction::expense(day, 10_000.0, "Shopping"),
            ],
        });

        assert_eq!(result.score, 100);
        assert_eq!(result.savings_and_debt_percentage, 50.0);
    }
}
