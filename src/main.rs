use address_book::config::Config;
use address_book::server::Server;
use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("address_book={},tower_http=debug", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting address book service");
    tracing::info!(
        "Configuration: bind_addr={}, environment={:?}",
        config.bind_addr,
        config.environment
    );
    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set, all create and delete requests will be rejected");
    }

    Server::new(config)
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
