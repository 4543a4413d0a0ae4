// Auction inflation CLI entry point.
//
// Pipeline:
// 1. Initialize tracing (log to stderr, keep stdout clean JSON)
// 2. Load league config
// 3. Parse the scraped auction snapshot
// 4. Load projections
// 5. Match scraped players to projections
// 6. Compute enhanced inflation stats
// 7. Emit the combined report as JSON on stdout

use std::path::Path;

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auction_inflation::config;
use auction_inflation::inflation::engine;
use auction_inflation::matching::matcher;
use auction_inflation::projections;
use auction_inflation::scrape::parse;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (league_path, snapshot_path, projections_path) =
        match (args.next(), args.next(), args.next()) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => {
                eprintln!("usage: auction-inflation <league.toml> <snapshot.json> <projections.csv>");
                std::process::exit(2);
            }
        };

    let league = config::load_league_config(Path::new(&league_path))
        .context("failed to load league configuration")?;
    info!(
        "League loaded: {} teams, ${} budget, {} roster spots",
        league.num_teams,
        league.budget,
        league.roster_size()
    );

    let raw = std::fs::read_to_string(&snapshot_path)
        .with_context(|| format!("failed to read snapshot {snapshot_path}"))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("snapshot is not valid JSON")?;
    let snapshot = parse::parse_snapshot(&payload).context("failed to parse auction snapshot")?;
    info!(
        "Snapshot parsed: {:?}, {} players, {} teams",
        snapshot.status,
        snapshot.players.len(),
        snapshot.teams.len()
    );

    let projection_players = projections::load_projections(Path::new(&projections_path))
        .context("failed to load projections")?;
    info!("Loaded {} projection players", projection_players.len());

    let outcome = matcher::match_all_players(&snapshot.players, &projection_players);
    info!(
        "Matched {} players, {} unmatched",
        outcome.matched.len(),
        outcome.unmatched.len()
    );

    let teams = if snapshot.teams.is_empty() {
        None
    } else {
        Some(snapshot.teams.as_slice())
    };
    let stats = engine::calculate_enhanced_inflation_stats(&outcome.matched, &league, teams)
        .context("failed to compute inflation stats")?;

    let report = json!({
        "scrapedAt": snapshot.scraped_at,
        "auctionStatus": snapshot.status,
        "matched": outcome.matched,
        "unmatched": outcome.unmatched,
        "inflation": stats,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
