use anyhow::Result;
use dotenvy::dotenv;
use marquee::config::CatalogConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the subscriber so a RUST_LOG set there reaches the
    // filter, but hold the outcome until tracing can actually emit it.
    let env_file = dotenv();
    init_tracing();
    match env_file {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let config = CatalogConfig::from_env();
    if config.has_credential() {
        info!("Catalog credential present");
    } else {
        warn!("TMDB_API_KEY not set - catalog rows will render empty and the genre menu will be absent");
    }

    marquee::app::run_server(config).await
}
