use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod models;
mod services;
mod utils;

use api::live_data::LiveDataClient;
use models::ChartStyle;
use services::chart_service::{Chart, PngRenderer};
use services::poll_service::{Poller, POLL_INTERVAL};
use utils::Config;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("live_chart=debug,reqwest=warn,hyper=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting live chart...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Requests never outlive one poll interval
    let client = match LiveDataClient::new(&config.base_url, POLL_INTERVAL) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Live data endpoint: {}", client.url());
    info!(
        "Rendering {}x{} chart to {}",
        config.width,
        config.height,
        config.output.display()
    );

    let mut chart = Chart::new(
        ChartStyle::with_size(config.width, config.height),
        PngRenderer::new(&config.output),
    );
    if let Err(e) = chart.redraw() {
        warn!("Initial redraw failed: {}", e);
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let mut poller = Poller::new(client, chart);
    poller.run(cancel).await;
}
