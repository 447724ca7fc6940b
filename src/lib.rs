//! Life Event Planner
//!
//! A deterministic financial planning & scoring engine that:
//! - Turns a savings goal, timeframe and income into a feasibility verdict
//! - Solves for the shortest affordable timeframe when a goal is out of reach
//! - Splits feasible savings across an instrument mix that sums exactly to the target
//! - Scores budget adherence under the 50/30/20 rule
//! - Delegates only explanatory prose to an LLM, behind bounded retries
//!
//! PLAN LOOP:
//! VALIDATE → FEASIBILITY → ALLOCATE? → SEED → NARRATE → MERGE

pub mod allocation;
pub mod api;
pub mod config;
pub mod error;
pub mod feasibility;
pub mod finance;
pub mod gemini;
pub mod health;
pub mod models;
pub mod narrative;
pub mod orchestrator;
pub mod resilience;
pub mod seed;

pub use error::{PlanningError, Result};

// Re-export common types
pub use config::EngineConfig;
pub use models::*;
pub use orchestrator::PlanningOrchestrator;
