//! Error types for the planning and scoring engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, PlanningError>;

#[derive(Error, Debug)]
pub enum PlanningError {

    // =============================
    // Caller-Facing Errors
    // =============================

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("Goal is unreachable: {0}")]
    UnreachableGoal(String),

    #[error("Unrealistic timeframe: {0}")]
    UnrealisticTimeframe(String),

    // =============================
    // Narrative Collaborator Errors
    // =============================

    #[error("Narrative service rate limited: {0}")]
    RateLimited(String),

    #[error("Narrative service overloaded: {0}")]
    Overloaded(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Retries exhausted after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<PlanningError>,
    },

    // =============================
    // Internal Errors
    // =============================

    #[error("Allocation invariant violated: {0}")]
    AllocationInvariant(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PlanningError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Transient overload / rate-limit signals from the narrative collaborator
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Overloaded(_))
    }

    /// Errors that carry an explanation meant for the end user
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::UnreachableGoal(_) | Self::UnrealisticTimeframe(_)
        )
    }
}
