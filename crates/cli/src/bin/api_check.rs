use anyhow::{Context, Result};
use backend_client::{BackendClient, BackendConfig};
use clap::Parser;
use models::Granularity;

/// Smoke check against the financials backend: fetches the metric list for
/// a ticker, then one metric's series, and prints the raw JSON responses.
#[derive(Parser, Debug)]
#[command(name = "api-check")]
struct Args {
    /// Ticker to query
    #[arg(default_value = "AAPL")]
    ticker: String,

    /// Reporting resolution: yearly or quarterly
    #[arg(long, default_value = "quarterly")]
    granularity: Granularity,

    /// Normalized label to fetch a series for
    #[arg(long, default_value = "Revenue")]
    metric: String,

    /// Backend base URL; falls back to FINANCIALS_API_BASE_URL
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match args.base_url {
        Some(base_url) => BackendConfig { base_url },
        None => BackendConfig::from_env(),
    };
    let client = BackendClient::new(config)?;

    println!("Checking {} ...", client.base_url());

    let metrics = client
        .normalized_labels(&args.ticker, args.granularity)
        .await
        .context("fetching normalized labels")?;
    println!(
        "{} metrics available for {} ({})",
        metrics.len(),
        args.ticker,
        args.granularity
    );
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    let data = client
        .financial_data(&args.ticker, &args.metric, args.granularity, None, None)
        .await
        .with_context(|| format!("fetching series for {}", args.metric))?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
