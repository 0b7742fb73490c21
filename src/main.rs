use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursegen::catalog::InMemoryCatalog;
use coursegen::generation::{
    GenerationClient, GenerationConfig, NoopGenerationClient, OpenRouterClient,
};
use coursegen::routes::router;
use coursegen::services::CourseWorkflow;
use coursegen::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "coursegen=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let generator: Arc<dyn GenerationClient> = match GenerationConfig::new_from_env() {
        Ok(config) => Arc::new(OpenRouterClient::new(config)?),
        Err(e) => {
            warn!("generation disabled: {}", e);
            Arc::new(NoopGenerationClient)
        }
    };

    let store = Arc::new(InMemoryCatalog::with_sample_courses());
    let workflow = CourseWorkflow::new(store, generator).await?;
    let state = AppState {
        workflow: Arc::new(Mutex::new(workflow)),
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
