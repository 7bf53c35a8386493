use anyhow::Result;
use std::env;
use task_api::create_router;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in development; deployed environments provide real variables.
    dotenvy::dotenv().ok();

    // Tracing is initialized inside create_router.
    let app = create_router()?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("TASKAPI_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    info!("Starting Task API server v{} at {}", env!("CARGO_PKG_VERSION"), endpoint);

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
