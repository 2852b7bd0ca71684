use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::engine::PredictionFilter;
use crate::models::{
    index_scores, lenient, FeatureFlag, Fixture, Goals, LeagueFixtures, LiveScore,
    LiveScoreSnapshot, MatchStatus, PageInfo, Prediction,
};

/// The scores feed is paged; ask for everything in one go
const SCORES_FETCH_LIMIT: u32 = 1_000_000;

/// Client for the match/prediction REST backend
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

/// Curated homepage panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuratedPanel {
    /// "Now Trending" carousel (featured matches)
    Trending,
    AiPicked,
    PlayOfDay,
}

impl CuratedPanel {
    pub const ALL: [CuratedPanel; 3] = [
        CuratedPanel::Trending,
        CuratedPanel::AiPicked,
        CuratedPanel::PlayOfDay,
    ];

    fn path(&self) -> &'static str {
        match self {
            CuratedPanel::Trending => "/matches/featured",
            CuratedPanel::AiPicked => "/matches/ai-picked",
            CuratedPanel::PlayOfDay => "/matches/play-of-day",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CuratedPanel::Trending => "Now Trending",
            CuratedPanel::AiPicked => "AI Picked Winners",
            CuratedPanel::PlayOfDay => "Play of the day",
        }
    }
}

/// `{ "data": ... }` wrapper used by every endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Live/tomorrow lists grouped by league
#[derive(Debug, Default, Deserialize)]
struct LeaguePage {
    #[serde(default, deserialize_with = "lenient::vec_lossy")]
    leagues: Vec<LeagueFixtures>,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pagination: Option<PageInfo>,
}

/// `{ "items": { "matches": [...] } }` shape of curated lists and scores
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ItemsPage<T> {
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    items: Option<MatchItems<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct MatchItems<T> {
    #[serde(default = "Vec::new", deserialize_with = "lenient::vec_lossy")]
    matches: Vec<T>,
}

/// Double-or-nothing list is not wrapped in `items`
#[derive(Debug, Default, Deserialize)]
struct MatchList {
    #[serde(default, deserialize_with = "lenient::vec_lossy")]
    matches: Vec<Fixture>,
}

/// Entry of the homepage-scores feed before normalization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    #[serde(default, deserialize_with = "lenient::id")]
    match_id: String,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    status: Option<MatchStatus>,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    goals: Option<Goals>,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    score: Option<Goals>,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    corners: Option<CornersResponse>,
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    statistics: Option<StatisticsResponse>,
}

#[derive(Debug, Deserialize)]
struct CornersResponse {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsResponse {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    corners_total: Option<u32>,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Fetch one page of today's/live matches grouped by league
    pub async fn fetch_live_matches(
        &self,
        filter: PredictionFilter,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<LeagueFixtures>, PageInfo)> {
        let mut query = vec![("page", page.to_string()), ("pageSize", page_size.to_string())];
        if let Some(slug) = filter.query_value() {
            query.push(("filter", slug.to_string()));
        }
        let path = with_query("/matches/live", &query);

        let envelope: Envelope<LeaguePage> = self.get_json(&path, "live matches").await?;
        let data = envelope.data.unwrap_or_default();
        let pagination = data.pagination.unwrap_or_default();

        info!(
            "Fetched {} leagues of live matches (page {}/{})",
            data.leagues.len(),
            pagination.page,
            pagination.total_pages
        );

        Ok((data.leagues, pagination))
    }

    /// Fetch tomorrow's matches grouped by league
    pub async fn fetch_tomorrow_matches(
        &self,
        filter: PredictionFilter,
    ) -> Result<Vec<LeagueFixtures>> {
        let query: Vec<(&str, String)> = filter
            .query_value()
            .map(|slug| ("filter", slug.to_string()))
            .into_iter()
            .collect();
        let path = with_query("/matches/tomorrow", &query);

        let envelope: Envelope<LeaguePage> = self.get_json(&path, "tomorrow matches").await?;
        let leagues = envelope.data.unwrap_or_default().leagues;

        info!("Fetched {} leagues of tomorrow matches", leagues.len());
        Ok(leagues)
    }

    /// Fetch the live-score feed as a snapshot keyed by match id
    pub async fn fetch_live_scores(&self) -> Result<LiveScoreSnapshot> {
        let path = with_query(
            "/matches/homepage-scores",
            &[("limit", SCORES_FETCH_LIMIT.to_string()), ("page", "1".to_string())],
        );

        let envelope: Envelope<ItemsPage<ScoreResponse>> =
            self.get_json(&path, "live scores").await?;

        let snapshot = decode_scores(envelope);
        debug!("Live-score snapshot has {} entries", snapshot.len());
        Ok(snapshot)
    }

    /// Fetch one of the curated homepage panels
    pub async fn fetch_curated(&self, panel: CuratedPanel) -> Result<Vec<Fixture>> {
        let envelope: Envelope<ItemsPage<Fixture>> =
            self.get_json(panel.path(), panel.title()).await?;

        Ok(envelope
            .data
            .and_then(|d| d.items)
            .map(|items| items.matches)
            .unwrap_or_default())
    }

    /// Fetch the double-or-nothing selection
    pub async fn fetch_double_or_nothing(&self) -> Result<Vec<Fixture>> {
        let envelope: Envelope<MatchList> = self
            .get_json("/matches/double-or-nothing", "double-or-nothing matches")
            .await?;

        Ok(envelope.data.unwrap_or_default().matches)
    }

    /// Set an operator flag on a match.
    ///
    /// The homepage endpoint is a server-side toggle with no body, so for
    /// `FeatureFlag::Homepage` the caller must only call this when the
    /// current state differs from `enabled`.
    pub async fn set_flag(&self, match_id: &str, flag: FeatureFlag, enabled: bool) -> Result<()> {
        let path = format!("/matches/{}/{}", urlencoding::encode(match_id), flag.as_str());

        let request = match flag {
            FeatureFlag::Featured => self
                .request(Method::PATCH, &path)
                .json(&json!({ "featured": enabled })),
            FeatureFlag::DoubleOrNothing => self
                .request(Method::PATCH, &path)
                .json(&json!({ "doubleOrNothing": enabled })),
            FeatureFlag::Homepage => self.request(Method::PATCH, &path),
            FeatureFlag::AiPicked | FeatureFlag::PlayOfDay => {
                let method = if enabled { Method::PATCH } else { Method::DELETE };
                self.request(method, &path)
            }
        };

        self.send(request, &format!("update {} on match {}", flag, match_id))
            .await?;

        info!(
            "Match {}: {} {}",
            match_id,
            flag,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Replace a match's prediction: percentages, picks, show flags and
    /// the manual corner line
    pub async fn update_prediction(&self, match_id: &str, prediction: &Prediction) -> Result<()> {
        let request = self
            .request(Method::PUT, &prediction_path(match_id))
            .json(prediction);

        self.send(request, &format!("update prediction on match {}", match_id))
            .await?;

        info!("Match {}: prediction updated", match_id);
        Ok(())
    }

    /// Activate or deactivate a league; inactive leagues drop out of the lists
    pub async fn set_league_active(&self, league_id: &str, active: bool) -> Result<()> {
        let request = self.request(Method::PATCH, &league_status_path(league_id, active));

        self.send(request, &format!("update status of league {}", league_id))
            .await?;

        info!(
            "League {} {}",
            league_id,
            if active { "activated" } else { "deactivated" }
        );
        Ok(())
    }

    /// Send a write request; any non-success status is an error
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<()> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Backend API error for {}: {}", what, status);
            anyhow::bail!("Backend API error: {} - {}", status, text);
        }
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");

        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        debug!("Fetching {} from: {}{}", what, self.base_url, path);

        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Backend API error for {}: {}", what, status);
            anyhow::bail!("Backend API error: {} - {}", status, text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }
}

fn prediction_path(match_id: &str) -> String {
    format!("/matches/prediction/{}", urlencoding::encode(match_id))
}

fn league_status_path(league_id: &str, active: bool) -> String {
    let action = if active { "activate" } else { "deactivate" };
    format!("/leagues/{}/{}", urlencoding::encode(league_id), action)
}

/// Append an url-encoded query string
fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    format!("{}?{}", path, query.join("&"))
}

/// Normalize the scores feed: goals or score per side, one corner total
fn decode_scores(envelope: Envelope<ItemsPage<ScoreResponse>>) -> LiveScoreSnapshot {
    let entries = envelope
        .data
        .and_then(|d| d.items)
        .map(|items| items.matches)
        .unwrap_or_default();

    index_scores(entries.into_iter().map(convert_score))
}

fn convert_score(raw: ScoreResponse) -> LiveScore {
    let goals = raw.goals.unwrap_or_default();
    let score = raw.score.unwrap_or_default();

    let corners = raw
        .corners
        .and_then(|c| c.total)
        .or_else(|| raw.statistics.and_then(|s| s.corners_total));

    LiveScore {
        match_id: raw.match_id,
        status: raw.status,
        goals: Goals {
            home: goals.home.or(score.home),
            away: goals.away.or(score.away),
        },
        corners,
    }
}
