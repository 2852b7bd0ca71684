use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tipboard::api::BackendClient;
use tipboard::config::Config;
use tipboard::models::Prediction;

const USAGE: &str = "Usage:\n  \
    match_admin prediction <match-id> <prediction.json>\n  \
    match_admin league <league-id> <on|off>";

/// Parsed command line
#[derive(Debug, PartialEq)]
enum Command {
    UpdatePrediction { match_id: String, file: String },
    SetLeague { league_id: String, active: bool },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "match_admin=info,tipboard=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
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

    match command {
        Command::UpdatePrediction { match_id, file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file))?;
            let prediction = parse_prediction(&raw)?;
            client.update_prediction(&match_id, &prediction).await
        }
        Command::SetLeague { league_id, active } => {
            client.set_league_active(&league_id, active).await
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command> {
    let Some(kind) = args.get(1) else {
        bail!("Missing command");
    };
    if args.len() != 4 {
        bail!("Expected 3 arguments, got {}", args.len().saturating_sub(1));
    }

    let id = args[2].trim().to_string();
    if id.is_empty() {
        bail!("Id must not be empty");
    }

    match kind.as_str() {
        "prediction" => Ok(Command::UpdatePrediction {
            match_id: id,
            file: args[3].clone(),
        }),
        "league" => {
            let active = match args[3].to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                other => bail!("Expected on or off, got {}", other),
            };
            Ok(Command::SetLeague {
                league_id: id,
                active,
            })
        }
        other => bail!("Unknown command {}", other),
    }
}

/// Decode a prediction document and reject percentages outside 0-100
fn parse_prediction(raw: &str) -> Result<Prediction> {
    let prediction: Prediction =
        serde_json::from_str(raw).context("Prediction file must be a JSON object")?;

    let outcomes = &prediction.outcomes;
    let percentages = [
        ("homeWin", outcomes.home_win),
        ("draw", outcomes.draw),
        ("awayWin", outcomes.away_win),
        ("over25", outcomes.over25),
        ("btts", outcomes.btts),
    ];
    for (name, value) in percentages {
        if let Some(pct) = value {
            if !(0.0..=100.0).contains(&pct) {
                bail!("{} must be between 0 and 100, got {}", name, pct);
            }
        }
    }

    if let Some(line) = prediction.manual_corners.over_corners {
        if line < 0.0 {
            bail!("overCorners must not be negative, got {}", line);
        }
    }

    Ok(prediction)
}
