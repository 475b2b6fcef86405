use std::sync::Arc;

use tokio::net::TcpListener;

use nural_extractor::application::services::BatchOrchestrator;
use nural_extractor::infrastructure::observability::init_tracing;
use nural_extractor::infrastructure::text_processing::ExtractorFactory;
use nural_extractor::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&settings.logging, environment);

    let registry = Arc::new(ExtractorFactory::create(&settings.extraction, &settings.ocr)?);
    let orchestrator = Arc::new(
        BatchOrchestrator::new(registry).with_deadline(settings.extraction.batch_deadline()),
    );

    let state = AppState {
        orchestrator,
        max_file_bytes: settings.extraction.max_file_bytes(),
        max_request_bytes: settings.extraction.max_request_bytes(),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Listening");

    axum::serve(listener, router).await?;

    Ok(())
}
