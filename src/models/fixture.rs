use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lenient;

/// A football match as returned by the backend match lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawFixture")]
pub struct Fixture {
    /// Backend document id, also the join key for live scores
    #[serde(rename = "_id")]
    pub id: String,

    /// Kickoff instant (UTC); `None` when missing or malformed
    pub date: Option<DateTime<Utc>>,

    pub home_team: Team,
    pub away_team: Team,
    pub status: Option<MatchStatus>,

    /// Present once the match has kicked off
    pub goals: Option<Goals>,

    pub prediction: Option<Prediction>,

    /// Shown in the "Now Trending" carousel
    pub featured: bool,

    pub show_on_homepage: bool,
    pub double_or_nothing: bool,
    pub play_of_day: bool,
    pub ai_picked: bool,
}

/// Wire shape of a match. Documents may carry `_id`, `id` or both, and any
/// nested part may be malformed without losing the rest of the match.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFixture {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    document_id: String,

    #[serde(default, deserialize_with = "lenient::id")]
    id: String,

    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    home_team: Team,

    #[serde(default, deserialize_with = "lenient::or_default")]
    away_team: Team,

    #[serde(default, deserialize_with = "lenient::opt_struct")]
    status: Option<MatchStatus>,

    #[serde(default, deserialize_with = "lenient::opt_struct")]
    goals: Option<Goals>,

    #[serde(default, deserialize_with = "lenient::opt_struct")]
    prediction: Option<Prediction>,

    #[serde(default, deserialize_with = "lenient::flag")]
    featured: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    show_on_homepage: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    double_or_nothing: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    play_of_day: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    ai_picked: bool,
}

impl From<RawFixture> for Fixture {
    fn from(raw: RawFixture) -> Self {
        let id = if raw.document_id.is_empty() {
            raw.id
        } else {
            raw.document_id
        };

        Self {
            id,
            date: raw.date,
            home_team: raw.home_team,
            away_team: raw.away_team,
            status: raw.status,
            goals: raw.goals,
            prediction: raw.prediction,
            featured: raw.featured,
            show_on_homepage: raw.show_on_homepage,
            double_or_nothing: raw.double_or_nothing,
            play_of_day: raw.play_of_day,
            ai_picked: raw.ai_picked,
        }
    }
}

impl Fixture {
    /// "Home vs Away" with placeholders for unnamed sides
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team.display_name("Home"), self.away_team.display_name("Away"))
    }

    /// Read one of the operator-curated flags
    pub fn flag(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::Featured => self.featured,
            FeatureFlag::Homepage => self.show_on_homepage,
            FeatureFlag::DoubleOrNothing => self.double_or_nothing,
            FeatureFlag::AiPicked => self.ai_picked,
            FeatureFlag::PlayOfDay => self.play_of_day,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
}

impl Team {
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        let name = self.name.trim();
        if name.is_empty() {
            fallback
        } else {
            name
        }
    }
}

/// Match status as reported by the fixtures provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatus {
    /// Short code: NS, 1H, HT, FT, PST, ...
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub short: Option<String>,

    /// Long text, e.g. "Match Finished"
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub long: Option<String>,

    /// Minutes played while in progress
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub elapsed: Option<u32>,
}

impl MatchStatus {
    pub fn short_code(&self) -> Option<&str> {
        self.short.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Goal counts; either side may be unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub home: Option<u32>,

    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub away: Option<u32>,
}

impl Goals {
    pub fn new(home: u32, away: u32) -> Self {
        Self {
            home: Some(home),
            away: Some(away),
        }
    }
}

/// Model prediction attached to a match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub outcomes: Outcomes,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub show_flags: ShowFlags,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub manual_corners: ManualCorners,
}

/// Percentages (0-100) and the model's top picks.
///
/// The `*_boolean` picks and the percentages are independent fields; a pick
/// is never derived from the percentages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcomes {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub home_win: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub draw: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub away_win: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub over25: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub btts: Option<f64>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub home_win_boolean: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub draw_boolean: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub away_win_boolean: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub over25_boolean: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub under25_boolean: bool,
}

/// Which label categories the operator chose to display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowFlags {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub home_win_show: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub draw_show: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub away_win_show: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub btts_show: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub over25_show: bool,

    /// Only used by list filtering; no label of its own
    #[serde(default, deserialize_with = "lenient::flag")]
    pub over15_show: bool,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub over_corners_show: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualCorners {
    /// Operator-set corner line, e.g. 9.5
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub over_corners: Option<f64>,
}

/// Operator-curated tags that can be toggled through the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    /// "Trending" in the admin table
    Featured,
    Homepage,
    DoubleOrNothing,
    AiPicked,
    PlayOfDay,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 5] = [
        FeatureFlag::Featured,
        FeatureFlag::Homepage,
        FeatureFlag::DoubleOrNothing,
        FeatureFlag::AiPicked,
        FeatureFlag::PlayOfDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureFlag::Featured => "featured",
            FeatureFlag::Homepage => "homepage",
            FeatureFlag::DoubleOrNothing => "double-or-nothing",
            FeatureFlag::AiPicked => "ai-pick",
            FeatureFlag::PlayOfDay => "play-of-day",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown feature flag '{0}' (expected featured, homepage, double-or-nothing, ai-pick or play-of-day)")]
pub struct ParseFlagError(String);

impl FromStr for FeatureFlag {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "featured" | "trending" => Ok(FeatureFlag::Featured),
            "homepage" | "show-on-homepage" => Ok(FeatureFlag::Homepage),
            "double-or-nothing" => Ok(FeatureFlag::DoubleOrNothing),
            "ai-pick" | "ai-picked" => Ok(FeatureFlag::AiPicked),
            "play-of-day" => Ok(FeatureFlag::PlayOfDay),
            _ => Err(ParseFlagError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_match() {
        let raw = r#"{
            "_id": "66f1c2",
            "date": "2026-10-18T14:00:00.000Z",
            "homeTeam": {"name": "Arsenal", "logo": "https://media/42.png"},
            "awayTeam": {"name": "Chelsea", "logo": null},
            "status": {"short": "NS", "long": "Not Started", "elapsed": null},
            "goals": {"home": null, "away": null},
            "prediction": {
                "outcomes": {"homeWin": 55, "draw": "20", "awayWin": 25, "over25": 61.5,
                             "btts": 48, "homeWinBoolean": true, "over25Boolean": true},
                "showFlags": {"homeWinShow": true, "bttsShow": false, "over25Show": true},
                "manualCorners": {"overCorners": 9.5}
            },
            "featured": true,
            "showOnHomepage": null,
            "aiPicked": false
        }"#;

        let fixture: Fixture = serde_json::from_str(raw).unwrap();
        assert_eq!(fixture.id, "66f1c2");
        assert!(fixture.date.is_some());
        assert_eq!(fixture.away_team.logo, None);
        assert_eq!(fixture.status.as_ref().and_then(|s| s.short_code()), Some("NS"));
        assert_eq!(fixture.goals, Some(Goals::default()));

        let prediction = fixture.prediction.unwrap();
        assert_eq!(prediction.outcomes.draw, Some(20.0));
        assert!(prediction.outcomes.home_win_boolean);
        assert!(!prediction.outcomes.draw_boolean);
        assert!(prediction.show_flags.over25_show);
        assert_eq!(prediction.manual_corners.over_corners, Some(9.5));

        assert!(fixture.featured);
        assert!(!fixture.show_on_homepage);
    }

    #[test]
    fn test_null_prediction_parts() {
        let raw = r#"{"id": "m1", "date": "not a date",
                      "prediction": {"outcomes": null, "showFlags": null}}"#;
        let fixture: Fixture = serde_json::from_str(raw).unwrap();

        assert_eq!(fixture.id, "m1");
        assert_eq!(fixture.date, None);
        let prediction = fixture.prediction.unwrap();
        assert!(!prediction.show_flags.btts_show);
        assert_eq!(prediction.manual_corners.over_corners, None);
    }

    #[test]
    fn test_both_id_keys() {
        let fixture: Fixture = serde_json::from_str(r#"{"_id": "m1", "id": "m1"}"#).unwrap();
        assert_eq!(fixture.id, "m1");

        let fixture: Fixture = serde_json::from_str(r#"{"_id": "", "id": 77}"#).unwrap();
        assert_eq!(fixture.id, "77");

        let fixture: Fixture = serde_json::from_str(r#"{"_id": "doc", "id": "other"}"#).unwrap();
        assert_eq!(fixture.id, "doc");
    }

    #[test]
    fn test_malformed_nested_parts_keep_the_match() {
        let raw = r#"{
            "_id": "m2",
            "date": "2026-10-18T14:00:00Z",
            "homeTeam": {"name": "Arsenal", "logo": 42},
            "awayTeam": "Chelsea",
            "status": "FT",
            "goals": "1-0",
            "prediction": "pending",
            "featured": "yes"
        }"#;

        let fixture: Fixture = serde_json::from_str(raw).unwrap();
        assert_eq!(fixture.id, "m2");
        assert!(fixture.date.is_some());
        assert_eq!(fixture.home_team.name, "Arsenal");
        assert_eq!(fixture.home_team.logo.as_deref(), Some("42"));
        assert_eq!(fixture.away_team.name, "");
        assert!(fixture.status.is_none());
        assert!(fixture.goals.is_none());
        assert!(fixture.prediction.is_none());
        assert!(!fixture.featured);
    }

    #[test]
    fn test_numeric_status_code() {
        let fixture: Fixture =
            serde_json::from_str(r#"{"_id": "m3", "status": {"short": 1, "elapsed": "12"}}"#).unwrap();
        let status = fixture.status.unwrap();
        assert_eq!(status.short_code(), Some("1"));
        assert_eq!(status.elapsed, Some(12));
    }

    #[test]
    fn test_malformed_prediction_part() {
        let fixture: Fixture = serde_json::from_str(
            r#"{"_id": "m4", "prediction": {"outcomes": "tbd", "showFlags": {"bttsShow": true}}}"#,
        )
        .unwrap();
        let prediction = fixture.prediction.unwrap();
        assert_eq!(prediction.outcomes.home_win, None);
        assert!(prediction.show_flags.btts_show);
    }

    #[test]
    fn test_title_placeholders() {
        let mut fixture = Fixture::default();
        fixture.home_team.name = "Santos".to_string();
        assert_eq!(fixture.title(), "Santos vs Away");
    }

    #[test]
    fn test_feature_flag_parse() {
        assert_eq!("trending".parse::<FeatureFlag>().unwrap(), FeatureFlag::Featured);
        assert_eq!("Play-Of-Day".parse::<FeatureFlag>().unwrap(), FeatureFlag::PlayOfDay);
        assert!("pinned".parse::<FeatureFlag>().is_err());

        for flag in FeatureFlag::ALL {
            assert_eq!(flag.as_str().parse::<FeatureFlag>().unwrap(), flag);
        }
    }
}
