use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tipboard::api::BackendClient;
use tipboard::config::Config;
use tipboard::engine::{DisplayEngine, ViewSelection};
use tipboard::models::LiveScoreSnapshot;
use tipboard::workers::{BoardWorker, LiveScoresPoller, MidnightWatcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tipboard=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tipboard");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded (backend: {}, timezone: {})",
        config.backend_api_url, config.display_timezone
    );

    let client = Arc::new(BackendClient::new(
        &config.backend_api_url,
        config.backend_api_token.clone(),
    ));
    let engine = DisplayEngine::new(config.display_timezone);

    // Shared state
    let view = Arc::new(RwLock::new(ViewSelection::new(config.board_view)));
    let snapshot: Arc<RwLock<LiveScoreSnapshot>> = Arc::new(RwLock::new(Default::default()));

    // Channel for board re-render events
    let (event_tx, event_rx) = mpsc::channel(100);

    // Create workers
    let board = BoardWorker::new(
        Arc::clone(&client),
        engine,
        Arc::clone(&view),
        Arc::clone(&snapshot),
        config.board_filter,
        config.match_page_size,
        event_rx,
    );

    let poller = LiveScoresPoller::new(
        Arc::clone(&client),
        Arc::clone(&snapshot),
        event_tx.clone(),
        config.live_scores_poll_interval,
    );

    let watcher = MidnightWatcher::new(
        Arc::clone(&view),
        event_tx,
        config.display_timezone,
        config.midnight_check_interval,
    );

    info!("Workers created, starting...");

    let board_handle = tokio::spawn(async move {
        board.run().await;
    });
    let poller_task = poller.start();
    let watcher_task = watcher.start();

    info!("All workers started");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = board_handle => {
            error!("Board worker exited unexpectedly: {:?}", result);
        }
    }

    poller_task.stop().await;
    watcher_task.stop().await;

    info!("Shutting down tipboard");
    Ok(())
}
