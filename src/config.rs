use std::env;

use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;

use crate::engine::{BoardView, PredictionFilter};

/// The rollover window is two minutes wide; a slower check can miss it
pub const MAX_MIDNIGHT_CHECK_INTERVAL: u64 = 120;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the match/prediction REST backend
    pub backend_api_url: String,

    /// Bearer token for admin endpoints (flag toggles)
    pub backend_api_token: Option<String>,

    /// Interval in seconds for polling the live-score feed
    pub live_scores_poll_interval: u64,

    /// Interval in seconds for the UK-midnight rollover check
    pub midnight_check_interval: u64,

    /// Page size requested from the live match list
    pub match_page_size: u32,

    /// Timezone that defines "today" and "tomorrow"
    pub display_timezone: Tz,

    /// View the board starts on
    pub board_view: BoardView,

    /// Prediction filter applied to the board
    pub board_filter: PredictionFilter,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            backend_api_url: env::var("BACKEND_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string())
                .trim_end_matches('/')
                .to_string(),

            backend_api_token: env::var("BACKEND_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),

            live_scores_poll_interval: parse_positive(
                "LIVE_SCORES_POLL_INTERVAL",
                &env::var("LIVE_SCORES_POLL_INTERVAL").unwrap_or_else(|_| "30".to_string()),
                u64::MAX,
            )?,

            midnight_check_interval: parse_positive(
                "MIDNIGHT_CHECK_INTERVAL",
                &env::var("MIDNIGHT_CHECK_INTERVAL").unwrap_or_else(|_| "60".to_string()),
                MAX_MIDNIGHT_CHECK_INTERVAL,
            )?,

            match_page_size: parse_positive(
                "MATCH_PAGE_SIZE",
                &env::var("MATCH_PAGE_SIZE").unwrap_or_else(|_| "20".to_string()),
                u64::from(u32::MAX),
            )? as u32,

            display_timezone: env::var("DISPLAY_TIMEZONE")
                .unwrap_or_else(|_| "Europe/London".to_string())
                .parse::<Tz>()
                .map_err(|e| anyhow!("DISPLAY_TIMEZONE must be an IANA timezone: {}", e))?,

            board_view: env::var("BOARD_VIEW")
                .unwrap_or_else(|_| "today".to_string())
                .parse()
                .context("BOARD_VIEW must be today or tomorrow")?,

            board_filter: env::var("BOARD_FILTER")
                .unwrap_or_else(|_| "all".to_string())
                .parse()
                .context("BOARD_FILTER must be a known prediction filter")?,
        })
    }
}

/// Parse a count or interval that must be in `1..=max`
fn parse_positive(name: &str, raw: &str, max: u64) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a valid number", name))?;

    if value == 0 {
        bail!("{} must be greater than zero", name);
    }
    if value > max {
        bail!("{} must be at most {}", name, max);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_accepts_defaults() {
        assert_eq!(parse_positive("LIVE_SCORES_POLL_INTERVAL", "30", u64::MAX).unwrap(), 30);
        assert_eq!(
            parse_positive("MIDNIGHT_CHECK_INTERVAL", " 60 ", MAX_MIDNIGHT_CHECK_INTERVAL).unwrap(),
            60
        );
        assert_eq!(
            parse_positive("MIDNIGHT_CHECK_INTERVAL", "120", MAX_MIDNIGHT_CHECK_INTERVAL).unwrap(),
            120
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = parse_positive("LIVE_SCORES_POLL_INTERVAL", "0", u64::MAX).unwrap_err();
        assert_eq!(err.to_string(), "LIVE_SCORES_POLL_INTERVAL must be greater than zero");

        assert!(parse_positive("MIDNIGHT_CHECK_INTERVAL", "0", MAX_MIDNIGHT_CHECK_INTERVAL).is_err());
    }

    #[test]
    fn test_midnight_interval_capped() {
        let err = parse_positive("MIDNIGHT_CHECK_INTERVAL", "121", MAX_MIDNIGHT_CHECK_INTERVAL)
            .unwrap_err();
        assert_eq!(err.to_string(), "MIDNIGHT_CHECK_INTERVAL must be at most 120");
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = parse_positive("MATCH_PAGE_SIZE", "twenty", u64::from(u32::MAX)).unwrap_err();
        assert_eq!(err.to_string(), "MATCH_PAGE_SIZE must be a valid number");
    }
}
