use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::api::{BackendClient, CuratedPanel};
use crate::engine::{filter_leagues, pick_summary, BoardView, DisplayEngine, PredictionFilter, ViewSelection};
use crate::models::{Fixture, LeagueFixtures, LiveScoreSnapshot};

/// Upper bound on pages pulled for one refresh of the live list
const MAX_PAGES: u32 = 50;

/// Notifications driving a board re-render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The live-score snapshot was replaced
    ScoresUpdated { entries: usize },
    /// The display day rolled over and the view was reset to today
    MidnightRollover,
}

/// Worker that owns the match board: fetches the list for the active view
/// and renders it against the latest live-score snapshot
pub struct BoardWorker {
    client: Arc<BackendClient>,
    engine: DisplayEngine,
    view: Arc<RwLock<ViewSelection>>,
    snapshot: Arc<RwLock<LiveScoreSnapshot>>,
    filter: PredictionFilter,
    page_size: u32,
    event_rx: mpsc::Receiver<BoardEvent>,
    leagues: Vec<LeagueFixtures>,
    loaded_view: Option<BoardView>,
}

impl BoardWorker {
    /// Create a new board worker
    pub fn new(
        client: Arc<BackendClient>,
        engine: DisplayEngine,
        view: Arc<RwLock<ViewSelection>>,
        snapshot: Arc<RwLock<LiveScoreSnapshot>>,
        filter: PredictionFilter,
        page_size: u32,
        event_rx: mpsc::Receiver<BoardEvent>,
    ) -> Self {
        Self {
            client,
            engine,
            view,
            snapshot,
            filter,
            page_size,
            event_rx,
            leagues: Vec::new(),
            loaded_view: None,
        }
    }

    /// Run the worker loop
    pub async fn run(mut self) {
        info!("Board worker started (filter: {})", self.filter.display_name());

        self.refresh_panels().await;
        self.refresh().await;

        while let Some(event) = self.event_rx.recv().await {
            match event {
                BoardEvent::ScoresUpdated { entries } => {
                    debug!("Scores updated ({} entries), re-rendering board", entries);
                    let active = self.view.read().await.active();
                    if self.loaded_view != Some(active) {
                        self.refresh().await;
                    } else {
                        self.render().await;
                    }
                }
                BoardEvent::MidnightRollover => {
                    self.refresh_panels().await;
                    self.refresh().await;
                }
            }
        }

        warn!("Board event channel closed");
    }

    /// Refetch the match list for the active view, then render it.
    ///
    /// On a failed fetch the previous list stays on the board.
    async fn refresh(&mut self) {
        let view = self.view.read().await.active();

        let fetched = match view {
            BoardView::Today => self.fetch_all_live_pages().await,
            BoardView::Tomorrow => self.client.fetch_tomorrow_matches(self.filter).await,
        };

        match fetched {
            Ok(leagues) => {
                self.leagues = leagues;
                self.loaded_view = Some(view);
            }
            Err(e) => {
                error!("Failed to fetch {} matches: {}", view, e);
                warn!("Keeping previous board");
            }
        }

        self.render().await;
    }

    /// Follow the live list's pagination, merging league groups split across pages
    async fn fetch_all_live_pages(&self) -> anyhow::Result<Vec<LeagueFixtures>> {
        let mut leagues = Vec::new();
        let mut page = 1;

        loop {
            let (groups, info) = self
                .client
                .fetch_live_matches(self.filter, page, self.page_size)
                .await?;
            let empty = groups.is_empty();
            merge_page(&mut leagues, groups);

            if empty || !info.has_more() || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(leagues)
    }

    async fn render(&self) {
        let Some(view) = self.loaded_view else {
            return;
        };

        let snapshot = self.snapshot.read().await;
        let lines = board_lines(
            &self.engine,
            &self.leagues,
            view,
            self.filter,
            &snapshot,
            Utc::now(),
        );

        info!("=== {} matches ({}) ===", view, self.filter.display_name());
        if lines.is_empty() {
            info!("No matches available");
        }
        for line in lines {
            info!("{}", line);
        }
    }

    /// Log the curated panels and the double-or-nothing selection
    async fn refresh_panels(&self) {
        for panel in CuratedPanel::ALL {
            match self.client.fetch_curated(panel).await {
                Ok(fixtures) => log_panel(panel.title(), &fixtures),
                Err(e) => warn!("Failed to fetch {}: {}", panel.title(), e),
            }
        }

        match self.client.fetch_double_or_nothing().await {
            Ok(fixtures) => log_panel("Double or Nothing", &fixtures),
            Err(e) => warn!("Failed to fetch double-or-nothing matches: {}", e),
        }
    }
}

/// Append a page of league groups; a group continuing the last league extends it
fn merge_page(leagues: &mut Vec<LeagueFixtures>, page: Vec<LeagueFixtures>) {
    for group in page {
        match leagues.last_mut() {
            Some(last)
                if last.league.name == group.league.name
                    && last.league.country == group.league.country =>
            {
                last.matches.extend(group.matches);
            }
            _ => leagues.push(group),
        }
    }
}

/// Text lines of the board: a heading per league followed by its match rows
fn board_lines(
    engine: &DisplayEngine,
    leagues: &[LeagueFixtures],
    view: BoardView,
    filter: PredictionFilter,
    snapshot: &LiveScoreSnapshot,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = Vec::new();

    for group in filter_leagues(leagues, view, filter, now, engine.timezone()) {
        lines.push(group.heading());
        for row in engine.render(&group.matches, snapshot, now) {
            lines.push(format!("  {}", row));
        }
    }

    lines
}

fn log_panel(title: &str, fixtures: &[Fixture]) {
    info!("--- {} ({}) ---", title, fixtures.len());

    for fixture in fixtures {
        let picks = fixture
            .prediction
            .as_ref()
            .map(pick_summary)
            .unwrap_or_default();

        if picks.is_empty() {
            info!("  {}", fixture.title());
        } else {
            info!("  {} [{}]", fixture.title(), picks.join(", "));
        }
    }
}
