use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::bucket::{classify, BoardView};
use crate::models::{Fixture, LeagueFixtures};

/// "Sort results by" filter on the match lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PredictionFilter {
    #[default]
    All,
    WinDrawWin,
    BothTeamsToScore,
    OverUnderGoals,
    CornerPredictions,
}

impl PredictionFilter {
    /// Slug used in backend query strings
    pub fn as_slug(&self) -> &'static str {
        match self {
            PredictionFilter::All => "all",
            PredictionFilter::WinDrawWin => "win-draw-win",
            PredictionFilter::BothTeamsToScore => "both-teams-to-score",
            PredictionFilter::OverUnderGoals => "over-under-goals",
            PredictionFilter::CornerPredictions => "corner-predictions",
        }
    }

    /// The slug to send, or `None` when the backend should not filter
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            PredictionFilter::All => None,
            other => Some(other.as_slug()),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PredictionFilter::All => "All matches",
            PredictionFilter::WinDrawWin => "Win/Draw/Win",
            PredictionFilter::BothTeamsToScore => "Both Teams To Score",
            PredictionFilter::OverUnderGoals => "Over/Under Goals",
            PredictionFilter::CornerPredictions => "Corners",
        }
    }

    /// Whether a fixture's show flags put it in this filter
    pub fn matches(&self, fixture: &Fixture) -> bool {
        if *self == PredictionFilter::All {
            return true;
        }

        let Some(flags) = fixture.prediction.as_ref().map(|p| &p.show_flags) else {
            return false;
        };

        match self {
            PredictionFilter::All => true,
            PredictionFilter::WinDrawWin => {
                flags.home_win_show || flags.draw_show || flags.away_win_show
            }
            PredictionFilter::BothTeamsToScore => flags.btts_show,
            PredictionFilter::OverUnderGoals => flags.over25_show || flags.over15_show,
            PredictionFilter::CornerPredictions => flags.over_corners_show,
        }
    }
}

impl fmt::Display for PredictionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown prediction filter '{0}'")]
pub struct ParseFilterError(String);

impl FromStr for PredictionFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(PredictionFilter::All),
            "win-draw-win" => Ok(PredictionFilter::WinDrawWin),
            "both-teams-to-score" => Ok(PredictionFilter::BothTeamsToScore),
            "over-under-goals" => Ok(PredictionFilter::OverUnderGoals),
            "corner-predictions" => Ok(PredictionFilter::CornerPredictions),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Keep matches in the view's day bucket that pass the filter; drop empty leagues
pub fn filter_leagues(
    leagues: &[LeagueFixtures],
    view: BoardView,
    filter: PredictionFilter,
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<LeagueFixtures> {
    let wanted = view.bucket();

    leagues
        .iter()
        .filter_map(|group| {
            let matches: Vec<Fixture> = group
                .matches
                .iter()
                .filter(|m| classify(m.date, now, tz) == wanted && filter.matches(m))
                .cloned()
                .collect();

            if matches.is_empty() {
                None
            } else {
                Some(LeagueFixtures {
                    league: group.league.clone(),
                    matches,
                })
            }
        })
        .collect()
}
