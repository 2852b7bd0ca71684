use std::env;
use std::process;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tipboard::api::BackendClient;
use tipboard::config::Config;
use tipboard::engine::PredictionFilter;
use tipboard::models::{FeatureFlag, Fixture};

const USAGE: &str = "Usage: flag_toggle <match-id> <flag> <on|off>\n\
                     Flags: featured, homepage, double-or-nothing, ai-pick, play-of-day";

/// Page guard when searching the live list for a match
const MAX_PAGES: u32 = 50;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flag_toggle=info,tipboard=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let (match_id, flag, enabled) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            process::exit(2);
        }
    };

    let config = Config::from_env()?;
    if config.backend_api_token.is_none() {
        warn!("BACKEND_API_TOKEN is not set; the backend may reject the update");
    }
    let client = BackendClient::new(&config.backend_api_url, config.backend_api_token.clone());

    // The homepage endpoint flips server-side state, so it needs the current value
    let current = find_match(&client, &match_id, config.match_page_size)
        .await?
        .map(|fixture| fixture.flag(flag));

    match current {
        Some(state) if state == enabled => {
            info!(
                "Match {} already has {} {}, nothing to do",
                match_id,
                flag,
                on_off(enabled)
            );
            return Ok(());
        }
        None if flag == FeatureFlag::Homepage => {
            bail!("Match {} not found in today's or tomorrow's list", match_id);
        }
        None => warn!("Match {} not found, sending update anyway", match_id),
        Some(_) => {}
    }

    client.set_flag(&match_id, flag, enabled).await?;
    info!("Set {} {} on match {}", flag, on_off(enabled), match_id);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(String, FeatureFlag, bool)> {
    if args.len() != 4 {
        bail!("Expected 3 arguments, got {}", args.len().saturating_sub(1));
    }

    let match_id = args[1].trim().to_string();
    if match_id.is_empty() {
        bail!("Match id must not be empty");
    }

    let flag: FeatureFlag = args[2].parse().context("Invalid flag")?;

    let enabled = match args[3].to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        other => bail!("Expected on or off, got {}", other),
    };

    Ok((match_id, flag, enabled))
}

/// Look a match up in the live pages, then in tomorrow's list
async fn find_match(client: &BackendClient, match_id: &str, page_size: u32) -> Result<Option<Fixture>> {
    let mut page = 1;
    loop {
        let (leagues, info) = client
            .fetch_live_matches(PredictionFilter::All, page, page_size)
            .await?;
        if let Some(fixture) = take_match(leagues.into_iter().flat_map(|l| l.matches), match_id) {
            return Ok(Some(fixture));
        }
        if !info.has_more() || page >= MAX_PAGES {
            break;
        }
        page += 1;
    }

    let tomorrow = client.fetch_tomorrow_matches(PredictionFilter::All).await?;
    Ok(take_match(tomorrow.into_iter().flat_map(|l| l.matches), match_id))
}

fn take_match(mut fixtures: impl Iterator<Item = Fixture>, match_id: &str) -> Option<Fixture> {
    fixtures.find(|f| f.id == match_id)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
