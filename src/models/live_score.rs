use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::fixture::{Goals, MatchStatus};

/// Live state of one match from the homepage-scores feed.
///
/// Polled independently of the match lists, so it may be older or newer
/// than the fixture it is joined to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveScore {
    /// Join key; equals `Fixture::id`
    pub match_id: String,

    pub status: Option<MatchStatus>,

    /// Goals as reported by the feed, either side may be missing
    pub goals: Goals,

    /// Total corners, resolved once when the feed is decoded
    pub corners: Option<u32>,
}

/// Map of match_id -> LiveScore, replaced wholesale on every poll
pub type LiveScoreSnapshot = HashMap<String, LiveScore>;

/// Index a list of scores by match id; the last entry for an id wins
pub fn index_scores(scores: impl IntoIterator<Item = LiveScore>) -> LiveScoreSnapshot {
    scores
        .into_iter()
        .filter(|score| !score.match_id.is_empty())
        .map(|score| (score.match_id.clone(), score))
        .collect()
}
