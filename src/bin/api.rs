use life_event_planner::{
    api::start_server,
    narrative::{GeminiNarrator, NarrativeGenerator, TemplateNarrator},
    EngineConfig, PlanningOrchestrator,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Life Event Planner - API Server");
    info!("Port: {}", api_port);

    let narrator: Box<dyn NarrativeGenerator> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Box::new(GeminiNarrator::new(key)?),
        _ => {
            warn!("GEMINI_API_KEY not set; using template narratives");
            Box::new(TemplateNarrator)
        }
    };

    let config = EngineConfig::from_env()?;
    let orchestrator = Arc::new(PlanningOrchestrator::new(config, narrator)?);

    info!("Orchestrator initialized");

    start_server(orchestrator, api_port).await?;

    Ok(())
}
