//! Papo Social Daemon - residents' association API
//!
//! Serves onboarding, XP and voice command endpoints over an in-memory store.

use anyhow::Result;
use papod::config::Config;
use papod::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("papod=info,tower_http=info")),
        )
        .init();

    info!("Papo Social Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let state = AppState::new(&config);

    server::run(state, &config.server.bind_addr).await
}
