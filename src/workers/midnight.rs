use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use super::board::BoardEvent;
use super::periodic::PeriodicTask;
use crate::engine::ViewSelection;

/// Worker that sends the board back to "today" when the display day rolls over
pub struct MidnightWatcher {
    view: Arc<RwLock<ViewSelection>>,
    events: mpsc::Sender<BoardEvent>,
    tz: Tz,
    check_interval: Duration,
}

impl MidnightWatcher {
    pub fn new(
        view: Arc<RwLock<ViewSelection>>,
        events: mpsc::Sender<BoardEvent>,
        tz: Tz,
        check_interval_secs: u64,
    ) -> Self {
        Self {
            view,
            events,
            tz,
            check_interval: Duration::from_secs(check_interval_secs),
        }
    }

    /// Start checking; stop (or drop) the returned task to end it
    pub fn start(self) -> PeriodicTask {
        info!(
            "Midnight watcher started (interval: {:?}, timezone: {})",
            self.check_interval, self.tz
        );

        let period = self.check_interval;
        let worker = Arc::new(self);

        PeriodicTask::spawn("midnight-watch", period, move || {
            let worker = Arc::clone(&worker);
            async move {
                worker.check_at(Utc::now()).await;
            }
        })
    }

    /// Run one rollover check against `now`; returns whether the view was reset
    pub async fn check_at(&self, now: DateTime<Utc>) -> bool {
        let reset = self.view.write().await.on_rollover_check(now, self.tz);
        if !reset {
            return false;
        }

        info!("Display day rolled over, switching board to today");
        if let Err(e) = self.events.send(BoardEvent::MidnightRollover).await {
            warn!("Failed to notify board of rollover: {}", e);
        }
        true
    }
}
