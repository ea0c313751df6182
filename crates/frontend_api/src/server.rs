use std::net::SocketAddr;
use std::sync::Arc;

use crate::{provider::FinancialsProvider, router::create_router};

/// Run the frontend server
pub async fn run_server(
    provider: Arc<dyn FinancialsProvider>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frontend_api=debug,tower_http=debug,axum=trace".into()),
        )
        .init();

    let app = create_router(provider);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
