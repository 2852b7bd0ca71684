use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::bucket::{classify, DateBucket, UK_TIMEZONE};
use super::labels::{derive_labels, pick_summary};
use super::outcome::{colorize, ColorClass};
use super::status::{scoreline, status_text};
use crate::models::{Fixture, LiveScoreSnapshot};

/// One rendered chip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayLabel {
    pub text: String,
    pub percentage: Option<String>,
    pub color: ColorClass,
}

/// Everything a list row needs for one match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDisplay {
    pub match_id: String,
    pub home: String,
    pub away: String,
    pub bucket: DateBucket,
    pub status_text: String,
    pub score: Option<(u32, u32)>,
    pub labels: Vec<DisplayLabel>,
    /// Condensed chips for compact lists
    pub picks: Vec<&'static str>,
}

impl fmt::Display for MatchDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status_text, self.home)?;
        match self.score {
            Some((home, away)) => write!(f, " {}-{} ", home, away)?,
            None => write!(f, " vs ")?,
        }
        write!(f, "{}", self.away)?;

        for label in &self.labels {
            match &label.percentage {
                Some(pct) => write!(f, " | {} {}% ({})", label.text, pct, label.color.as_str())?,
                None => write!(f, " | {} ({})", label.text, label.color.as_str())?,
            }
        }
        Ok(())
    }
}

/// Pure renderer from (matches, live scores, now) to display rows.
///
/// Holds only the display timezone; rendering the same inputs twice gives
/// the same output.
#[derive(Debug, Clone, Copy)]
pub struct DisplayEngine {
    tz: Tz,
}

impl Default for DisplayEngine {
    fn default() -> Self {
        Self::new(UK_TIMEZONE)
    }
}

impl DisplayEngine {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn render_match(
        &self,
        fixture: &Fixture,
        snapshot: &LiveScoreSnapshot,
        now: DateTime<Utc>,
    ) -> MatchDisplay {
        let live = snapshot.get(&fixture.id);

        let (labels, picks) = match &fixture.prediction {
            Some(prediction) => {
                let labels = derive_labels(prediction)
                    .into_iter()
                    .map(|label| DisplayLabel {
                        color: colorize(&label.kind, fixture, live),
                        percentage: label.percentage_text(),
                        text: label.text,
                    })
                    .collect();
                (labels, pick_summary(prediction))
            }
            None => (Vec::new(), Vec::new()),
        };

        MatchDisplay {
            match_id: fixture.id.clone(),
            home: fixture.home_team.display_name("Home").to_string(),
            away: fixture.away_team.display_name("Away").to_string(),
            bucket: classify(fixture.date, now, self.tz),
            status_text: status_text(fixture, live, self.tz),
            score: scoreline(fixture, live),
            labels,
            picks,
        }
    }

    pub fn render(
        &self,
        fixtures: &[Fixture],
        snapshot: &LiveScoreSnapshot,
        now: DateTime<Utc>,
    ) -> Vec<MatchDisplay> {
        fixtures
            .iter()
            .map(|fixture| self.render_match(fixture, snapshot, now))
            .collect()
    }
}
