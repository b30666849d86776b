//! Storefront demo: the complete menu backend in one process
//!
//! Serves the REST API, the change stream and uploaded images, seeding an
//! empty database with the classic varieties when the config asks for it.
//! Pass a config path as the first argument.

mod seed;

use morel_server::{Config, ServerState};
use morel_store::ItemDb;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "storefront.ron".to_string());
    tracing::info!("loading configuration from {config_path}");
    let config = Config::load(&config_path)?;

    let db = ItemDb::open(&config.database_path)?;
    if config.seed && db.count()? == 0 {
        for draft in seed::classic_varieties() {
            let item = db.insert(draft)?;
            tracing::info!("seeded {}", item.name);
        }
    }

    let state = Arc::new(ServerState::new(db, config));
    tokio::select! {
        result = morel_server::run(state) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
