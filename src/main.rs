use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tourmap::{TourMapConfig, TourService, logging, web};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TourMapConfig::load_from_path(config_path).context("Failed to load configuration")?;

    logging::init(&config.logging);
    info!("TourMap {} starting", tourmap::VERSION);

    let service = match TourService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            return Err(e).context("Failed to build the catalog service");
        }
    };

    web::run(
        config.server.port,
        Arc::new(service),
        Duration::from_secs(config.server.request_timeout_seconds),
    )
    .await
}
