//! REST API Server for the planning engine
//!
//! Exposes the two caller-facing operations over HTTP

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::PlanningError;
use crate::models::{HealthScoreInput, PlanRequest};
use crate::orchestrator::PlanningOrchestrator;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<PlanningOrchestrator>,
}

fn status_for(err: &PlanningError) -> StatusCode {
    match err {
        PlanningError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        PlanningError::UnreachableGoal(_) | PlanningError::UnrealisticTimeframe(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Planning Endpoint
/// =============================

async fn plan_life_event(
    State(state): State<ApiState>,
    Json(req): Json<PlanRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received plan request: {}", req.goal);

    match state.orchestrator.plan_life_event(req).await {
        Ok(plan) => (StatusCode::OK, Json(ApiResponse::success(plan))),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!(error = %e, "Planning failed");
            }
            (status, Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// =============================
/// Health Score Endpoint
/// =============================

async fn score_financial_health(
    State(state): State<ApiState>,
    Json(input): Json<HealthScoreInput>,
) -> (StatusCode, Json<ApiResponse>) {
    let result = state.orchestrator.score_financial_health(&input);
    (StatusCode::OK, Json(ApiResponse::success(result)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<PlanningOrchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/health", axum::routing::get(health))
        .route("/api/v1/plan", post(plan_life_event))
        .route("/api/v1/health-score", post(score_financial_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<PlanningOrchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
