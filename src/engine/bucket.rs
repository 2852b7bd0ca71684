use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

/// Day boundaries for the board are UK civil days
pub const UK_TIMEZONE: Tz = chrono_tz::Europe::London;

/// Which day a match belongs to, relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    Today,
    Tomorrow,
    Other,
}

impl DateBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateBucket::Today => "today",
            DateBucket::Tomorrow => "tomorrow",
            DateBucket::Other => "other",
        }
    }
}

/// Civil calendar day of an instant in `tz`
pub fn civil_day(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Bucket a kickoff by calendar day in `tz`.
///
/// Comparison is by date only, never by elapsed hours, so a 23 or 25 hour
/// day around a clock change still covers `[midnight, next midnight)`.
pub fn classify(kickoff: Option<DateTime<Utc>>, now: DateTime<Utc>, tz: Tz) -> DateBucket {
    let Some(kickoff) = kickoff else {
        return DateBucket::Other;
    };

    let today = civil_day(now, tz);
    let match_day = civil_day(kickoff, tz);

    if match_day == today {
        DateBucket::Today
    } else if today.succ_opt() == Some(match_day) {
        DateBucket::Tomorrow
    } else {
        DateBucket::Other
    }
}

/// True during the first two minutes after local midnight (00:00-00:01)
pub fn is_rollover_window(now: DateTime<Utc>, tz: Tz) -> bool {
    let local = now.with_timezone(&tz);
    local.hour() == 0 && local.minute() <= 1
}

/// The two day views a board can show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardView {
    #[default]
    Today,
    Tomorrow,
}

impl BoardView {
    pub fn bucket(&self) -> DateBucket {
        match self {
            BoardView::Today => DateBucket::Today,
            BoardView::Tomorrow => DateBucket::Tomorrow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.bucket().as_str()
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown board view '{0}' (expected today or tomorrow)")]
pub struct ParseViewError(String);

impl FromStr for BoardView {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(BoardView::Today),
            "tomorrow" => Ok(BoardView::Tomorrow),
            _ => Err(ParseViewError(s.to_string())),
        }
    }
}

/// Caller-owned view selection.
///
/// Only the midnight check may move the board off `Tomorrow`; the date
/// changing mid-session does not.
#[derive(Debug, Clone, Default)]
pub struct ViewSelection {
    active: BoardView,
    /// Civil day of the last rollover reset
    last_rollover: Option<NaiveDate>,
}

impl ViewSelection {
    pub fn new(initial: BoardView) -> Self {
        Self {
            active: initial,
            last_rollover: None,
        }
    }

    pub fn active(&self) -> BoardView {
        self.active
    }

    /// Switch view; returns whether anything changed
    pub fn select(&mut self, view: BoardView) -> bool {
        let changed = self.active != view;
        self.active = view;
        changed
    }

    /// Reset to `Today` inside the rollover window, at most once per civil day.
    ///
    /// Returns true when the reset was applied, even if the board was already
    /// on `Today`: yesterday's list is stale either way.
    pub fn on_rollover_check(&mut self, now: DateTime<Utc>, tz: Tz) -> bool {
        if !is_rollover_window(now, tz) {
            return false;
        }

        let day = civil_day(now, tz);
        if self.last_rollover == Some(day) {
            return false;
        }

        self.last_rollover = Some(day);
        self.active = BoardView::Today;
        true
    }
}
