use clap::Parser;
use inspector_server::Config;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inspector_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    tracing::info!(
        bind_address = %config.bind_address(),
        max_body_bytes = config.max_body_bytes,
        display_errors = config.display_errors,
        "Configuration loaded"
    );
    if config.display_errors {
        tracing::warn!("display_errors is on; decoding errors are shown to clients");
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    inspector_server::run(listener, config).await?;
    Ok(())
}
