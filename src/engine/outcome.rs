use serde::Serialize;

use super::labels::{DoubleChance, LabelKind};
use crate::models::{Fixture, Goals, LiveScore, MatchStatus};

/// Lifecycle phase derived from a status short code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    NotStarted,
    Live,
    /// SUSP / INT; still part of the in-play family
    Suspended,
    Postponed,
    Finished,
}

impl MatchPhase {
    /// Classify a status code; unknown or absent codes are `NotStarted`
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("FT" | "AET" | "PEN") => MatchPhase::Finished,
            Some("SUSP" | "INT") => MatchPhase::Suspended,
            Some("PST") => MatchPhase::Postponed,
            Some("1H" | "2H" | "HT" | "ET" | "BT" | "P" | "LIVE") => MatchPhase::Live,
            _ => MatchPhase::NotStarted,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, MatchPhase::Finished)
    }

    pub fn is_in_play(&self) -> bool {
        matches!(self, MatchPhase::Live | MatchPhase::Suspended)
    }
}

/// Status for display: the live feed's if it has one, else the fixture's own
pub fn resolve_status<'a>(fixture: &'a Fixture, live: Option<&'a LiveScore>) -> Option<&'a MatchStatus> {
    live.and_then(|score| score.status.as_ref())
        .or(fixture.status.as_ref())
}

pub fn resolve_phase(fixture: &Fixture, live: Option<&LiveScore>) -> MatchPhase {
    MatchPhase::from_code(resolve_status(fixture, live).and_then(MatchStatus::short_code))
}

/// Per-side goals: live feed first, then the fixture's embedded goals
pub fn resolve_goals(fixture: &Fixture, live: Option<&LiveScore>) -> Goals {
    let embedded = fixture.goals.unwrap_or_default();
    let feed = live.map(|score| score.goals).unwrap_or_default();

    Goals {
        home: feed.home.or(embedded.home),
        away: feed.away.or(embedded.away),
    }
}

/// Match result implied by a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    HomeWin,
    Draw,
    AwayWin,
}

/// A score with both sides known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

impl FinalScore {
    /// Goals in the match; widened so feed values near `u32::MAX` cannot overflow
    pub fn total(&self) -> u64 {
        u64::from(self.home) + u64::from(self.away)
    }

    pub fn result(&self) -> MatchResult {
        use std::cmp::Ordering;

        match self.home.cmp(&self.away) {
            Ordering::Greater => MatchResult::HomeWin,
            Ordering::Equal => MatchResult::Draw,
            Ordering::Less => MatchResult::AwayWin,
        }
    }
}

/// Both sides resolved, or nothing
pub fn resolve_final_score(fixture: &Fixture, live: Option<&LiveScore>) -> Option<FinalScore> {
    let goals = resolve_goals(fixture, live);
    Some(FinalScore {
        home: goals.home?,
        away: goals.away?,
    })
}

impl DoubleChance {
    pub fn covers(&self, result: MatchResult) -> bool {
        match self {
            DoubleChance::HomeOrDraw => result != MatchResult::AwayWin,
            DoubleChance::DrawOrAway => result != MatchResult::HomeWin,
            DoubleChance::HomeOrAway => result != MatchResult::Draw,
        }
    }
}

/// Whether a label's prediction came true
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Not finished, or the data needed to judge is missing
    Undecided,
}

impl From<Option<bool>> for Verdict {
    fn from(decided: Option<bool>) -> Self {
        match decided {
            Some(true) => Verdict::Correct,
            Some(false) => Verdict::Incorrect,
            None => Verdict::Undecided,
        }
    }
}

/// Judge one label. Only a finished match can be decided.
pub fn evaluate(
    kind: &LabelKind,
    phase: MatchPhase,
    score: Option<FinalScore>,
    corners: Option<u32>,
) -> Verdict {
    if !phase.is_finished() {
        return Verdict::Undecided;
    }

    let decided = match *kind {
        LabelKind::DoubleChance(pick) => score.map(|s| pick.covers(s.result())),
        LabelKind::Btts => score.map(|s| s.home > 0 && s.away > 0),
        LabelKind::Over25 => score.map(|s| s.total() >= 3),
        LabelKind::Under25 => score.map(|s| s.total() < 3),
        LabelKind::OverCorners(threshold) if threshold.is_finite() => {
            corners.map(|total| f64::from(total) > threshold)
        }
        LabelKind::OverCorners(_) => None,
    };

    Verdict::from(decided)
}

/// Chip style; there are exactly three
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Success,
    Fail,
    Neutral,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Success => "success",
            ColorClass::Fail => "fail",
            ColorClass::Neutral => "neutral",
        }
    }
}

impl From<Verdict> for ColorClass {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Correct => ColorClass::Success,
            Verdict::Incorrect => ColorClass::Fail,
            Verdict::Undecided => ColorClass::Neutral,
        }
    }
}

/// Color a label against a fixture and its (optional) live-score entry
pub fn colorize(kind: &LabelKind, fixture: &Fixture, live: Option<&LiveScore>) -> ColorClass {
    let phase = resolve_phase(fixture, live);
    let score = resolve_final_score(fixture, live);
    let corners = live.and_then(|score| score.corners);

    evaluate(kind, phase, score, corners).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: &str) -> Option<MatchStatus> {
        Some(MatchStatus {
            short: Some(code.to_string()),
            ..Default::default()
        })
    }

    fn fixture(code: &str, goals: Option<Goals>) -> Fixture {
        Fixture {
            id: "m1".to_string(),
            status: status(code),
            goals,
            ..Default::default()
        }
    }

    const ONE_X: LabelKind = LabelKind::DoubleChance(DoubleChance::HomeOrDraw);

    #[test]
    fn test_phase_codes() {
        for code in ["FT", "AET", "PEN"] {
            assert_eq!(MatchPhase::from_code(Some(code)), MatchPhase::Finished);
        }
        for code in ["1H", "2H", "HT", "ET", "BT", "P", "LIVE"] {
            assert_eq!(MatchPhase::from_code(Some(code)), MatchPhase::Live);
        }
        assert_eq!(MatchPhase::from_code(Some("SUSP")), MatchPhase::Suspended);
        assert_eq!(MatchPhase::from_code(Some("INT")), MatchPhase::Suspended);
        assert_eq!(MatchPhase::from_code(Some("PST")), MatchPhase::Postponed);
        assert_eq!(MatchPhase::from_code(Some("NS")), MatchPhase::NotStarted);
        assert_eq!(MatchPhase::from_code(Some("ABD")), MatchPhase::NotStarted);
        assert_eq!(MatchPhase::from_code(None), MatchPhase::NotStarted);

        assert!(MatchPhase::Suspended.is_in_play());
        assert!(!MatchPhase::Postponed.is_in_play());
    }

    #[test]
    fn test_1x_home_win_is_success() {
        let f = fixture("FT", Some(Goals::new(2, 1)));
        assert_eq!(colorize(&ONE_X, &f, None), ColorClass::Success);
    }

    #[test]
    fn test_1x_away_win_is_fail() {
        let f = fixture("FT", Some(Goals::new(0, 2)));
        assert_eq!(colorize(&ONE_X, &f, None), ColorClass::Fail);
    }

    #[test]
    fn test_double_chance_coverage() {
        use MatchResult::*;

        assert!(DoubleChance::HomeOrDraw.covers(Draw));
        assert!(DoubleChance::DrawOrAway.covers(AwayWin));
        assert!(!DoubleChance::DrawOrAway.covers(HomeWin));
        assert!(DoubleChance::HomeOrAway.covers(HomeWin));
        assert!(!DoubleChance::HomeOrAway.covers(Draw));
    }

    #[test]
    fn test_live_match_is_neutral() {
        let f = fixture("1H", Some(Goals::new(3, 1)));
        for kind in [ONE_X, LabelKind::Over25, LabelKind::Btts, LabelKind::Under25] {
            assert_eq!(colorize(&kind, &f, None), ColorClass::Neutral);
        }
    }

    #[test]
    fn test_finished_without_any_goals_is_neutral() {
        let f = fixture("FT", None);
        for kind in [
            ONE_X,
            LabelKind::Over25,
            LabelKind::Under25,
            LabelKind::Btts,
            LabelKind::OverCorners(8.5),
        ] {
            assert_eq!(colorize(&kind, &f, None), ColorClass::Neutral);
        }
    }

    #[test]
    fn test_half_known_score_is_neutral() {
        let f = fixture(
            "FT",
            Some(Goals {
                home: Some(2),
                away: None,
            }),
        );
        assert_eq!(colorize(&LabelKind::Over25, &f, None), ColorClass::Neutral);
    }

    #[test]
    fn test_feed_goals_take_precedence() {
        let f = fixture("FT", Some(Goals::new(0, 0)));
        let live = LiveScore {
            match_id: "m1".to_string(),
            goals: Goals::new(2, 2),
            ..Default::default()
        };

        assert_eq!(colorize(&LabelKind::Btts, &f, Some(&live)), ColorClass::Success);
        assert_eq!(colorize(&LabelKind::Over25, &f, Some(&live)), ColorClass::Success);
        assert_eq!(colorize(&LabelKind::Under25, &f, Some(&live)), ColorClass::Fail);
    }

    #[test]
    fn test_feed_status_takes_precedence() {
        // The list still says 2H but the feed has the final whistle
        let f = fixture("2H", Some(Goals::new(1, 0)));
        let live = LiveScore {
            match_id: "m1".to_string(),
            status: status("FT"),
            ..Default::default()
        };

        assert_eq!(resolve_phase(&f, Some(&live)), MatchPhase::Finished);
        assert_eq!(colorize(&ONE_X, &f, Some(&live)), ColorClass::Success);
    }

    #[test]
    fn test_per_side_fallback() {
        let f = fixture("FT", Some(Goals::new(1, 1)));
        let live = LiveScore {
            goals: Goals {
                home: Some(3),
                away: None,
            },
            ..Default::default()
        };

        let score = resolve_final_score(&f, Some(&live)).unwrap();
        assert_eq!(score, FinalScore { home: 3, away: 1 });
    }

    #[test]
    fn test_goal_lines() {
        let phase = MatchPhase::Finished;
        let three = Some(FinalScore { home: 2, away: 1 });
        let two = Some(FinalScore { home: 2, away: 0 });

        assert_eq!(evaluate(&LabelKind::Over25, phase, three, None), Verdict::Correct);
        assert_eq!(evaluate(&LabelKind::Over25, phase, two, None), Verdict::Incorrect);
        assert_eq!(evaluate(&LabelKind::Under25, phase, two, None), Verdict::Correct);
        assert_eq!(evaluate(&LabelKind::Btts, phase, two, None), Verdict::Incorrect);
    }

    #[test]
    fn test_corners_strictly_over() {
        let phase = MatchPhase::Finished;
        let kind = LabelKind::OverCorners(10.0);

        assert_eq!(evaluate(&kind, phase, None, Some(11)), Verdict::Correct);
        assert_eq!(evaluate(&kind, phase, None, Some(10)), Verdict::Incorrect);
        assert_eq!(evaluate(&kind, phase, None, None), Verdict::Undecided);
        assert_eq!(
            evaluate(&LabelKind::OverCorners(f64::NAN), phase, None, Some(12)),
            Verdict::Undecided
        );
    }

    #[test]
    fn test_huge_feed_goals_do_not_overflow() {
        let f: Fixture = serde_json::from_str(
            r#"{"_id": "m1", "status": {"short": "FT"}, "goals": {"home": 4294967295, "away": 1}}"#,
        )
        .unwrap();

        assert_eq!(resolve_final_score(&f, None).unwrap().total(), 4_294_967_296);
        assert_eq!(colorize(&LabelKind::Over25, &f, None), ColorClass::Success);
        assert_eq!(colorize(&LabelKind::Under25, &f, None), ColorClass::Fail);
        assert_eq!(colorize(&LabelKind::Btts, &f, None), ColorClass::Success);
    }

    #[test]
    fn test_postponed_is_neutral() {
        let f = fixture("PST", Some(Goals::new(0, 0)));
        assert_eq!(colorize(&LabelKind::Under25, &f, None), ColorClass::Neutral);
    }
}
