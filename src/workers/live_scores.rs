use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use super::board::BoardEvent;
use super::periodic::PeriodicTask;
use crate::api::BackendClient;
use crate::models::LiveScoreSnapshot;

/// Worker that polls the live-score feed and swaps the shared snapshot
pub struct LiveScoresPoller {
    client: Arc<BackendClient>,
    snapshot: Arc<RwLock<LiveScoreSnapshot>>,
    events: mpsc::Sender<BoardEvent>,
    poll_interval: Duration,
}

impl LiveScoresPoller {
    /// Create a new live-score poller
    pub fn new(
        client: Arc<BackendClient>,
        snapshot: Arc<RwLock<LiveScoreSnapshot>>,
        events: mpsc::Sender<BoardEvent>,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            client,
            snapshot,
            events,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }

    /// Start polling; stop (or drop) the returned task to end it
    pub fn start(self) -> PeriodicTask {
        info!("Live-score poller started (interval: {:?})", self.poll_interval);

        let period = self.poll_interval;
        let worker = Arc::new(self);

        PeriodicTask::spawn("live-scores", period, move || {
            let worker = Arc::clone(&worker);
            async move { worker.poll().await }
        })
    }

    /// Perform a single poll.
    ///
    /// The whole snapshot is replaced: the latest fetch wins regardless of
    /// how it relates to the last match-list fetch.
    async fn poll(&self) {
        let snapshot = match self.client.fetch_live_scores().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to fetch live scores: {}", e);
                warn!("Will retry on next interval");
                return;
            }
        };

        let entries = snapshot.len();
        *self.snapshot.write().await = snapshot;
        debug!("Live-score snapshot replaced ({} entries)", entries);

        if let Err(e) = self.events.send(BoardEvent::ScoresUpdated { entries }).await {
            warn!("Failed to notify board of score update: {}", e);
        }
    }
}
