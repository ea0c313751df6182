use std::env;
use std::sync::Arc;

use backend_client::BackendClient;
use frontend_api::{run_server, HttpFinancialsProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local .env overrides are optional.
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let client = BackendClient::from_env()?;

    println!("Stonks UI Server");
    println!("================");
    println!("Backend API: {}", client.base_url());
    println!("Listening on: {}:{}", host, port);
    println!();

    let provider = Arc::new(HttpFinancialsProvider::new(client));

    run_server(provider, &host, port).await?;

    Ok(())
}
