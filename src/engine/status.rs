use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::outcome::{resolve_goals, resolve_status, MatchPhase};
use crate::models::{Fixture, LiveScore};

/// Kickoff as a 12-hour clock time in `tz`, e.g. "3:05 PM"
pub fn kickoff_time(kickoff: Option<DateTime<Utc>>, tz: Tz) -> String {
    kickoff
        .map(|instant| instant.with_timezone(&tz).format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Text shown in the status column.
///
/// Postponed and suspended win over the elapsed-minute display; anything
/// not started or unrecognised shows the scheduled kickoff instead.
pub fn status_text(fixture: &Fixture, live: Option<&LiveScore>, tz: Tz) -> String {
    let status = resolve_status(fixture, live);
    let code = status.and_then(|s| s.short_code());

    match MatchPhase::from_code(code) {
        MatchPhase::Finished => "Finished".to_string(),
        MatchPhase::Suspended => "Suspended".to_string(),
        MatchPhase::Postponed => "Postponed".to_string(),
        MatchPhase::Live => match status.and_then(|s| s.elapsed).filter(|m| *m > 0) {
            Some(minutes) => format!("{}' Live", minutes),
            None => code.unwrap_or_default().to_string(),
        },
        MatchPhase::NotStarted => kickoff_time(fixture.date, tz),
    }
}

/// Scoreline once a match has a status other than NS; unknown sides show 0
pub fn scoreline(fixture: &Fixture, live: Option<&LiveScore>) -> Option<(u32, u32)> {
    let started = resolve_status(fixture, live)
        .and_then(|s| s.short_code())
        .is_some_and(|code| code != "NS");
    if !started {
        return None;
    }

    let goals = resolve_goals(fixture, live);
    if goals.home.is_none() && goals.away.is_none() {
        return None;
    }

    Some((goals.home.unwrap_or(0), goals.away.unwrap_or(0)))
}
