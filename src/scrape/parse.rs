// Strict boundary parse for raw auction payloads.
//
// The auction site's payload is loosely typed: numeric ids arrive as numbers
// or strings, optional fields come and go, and the player array mixes shapes.
// This module is the single point where that mess is converted into the
// canonical `AuctionSnapshot` records. Rows missing an id or a name are
// skipped with a warning; everything downstream sees only typed data.

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::scrape::types::{
    AuctionSnapshot, AuctionStatus, DraftStatus, ScrapedPlayer, ScrapedTeam,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("payload field `{field}` has unexpected shape: {message}")]
    Malformed {
        field: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Loose-value helpers
// ---------------------------------------------------------------------------

/// Read a u64 that may arrive as a JSON number or a numeric string.
fn loose_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an f64 that may arrive as a JSON number or a numeric string.
fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

// ---------------------------------------------------------------------------
// Player parsing
// ---------------------------------------------------------------------------

fn parse_draft_status(raw: &Value) -> DraftStatus {
    // `onBlock` is a separate boolean signal on some payload shapes. It wins
    // over a "drafted" status string: a player being bid on is never final.
    let on_block_flag = raw
        .get("onBlock")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let status_str = raw
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("available")
        .to_lowercase();

    if on_block_flag {
        return DraftStatus::OnBlock;
    }
    match status_str.as_str() {
        "on_block" | "onblock" | "nominated" => DraftStatus::OnBlock,
        "drafted" | "sold" => DraftStatus::Drafted,
        "passed" => DraftStatus::Passed,
        _ => DraftStatus::Available,
    }
}

/// Parse one raw player object. Returns `None` (caller skips the row) when
/// the object is missing its site id or name.
fn parse_player(raw: &Value) -> Option<ScrapedPlayer> {
    let site_id = raw.get("id").and_then(loose_u64).or_else(|| {
        raw.get("playerId").and_then(loose_u64)
    })?;
    let name = raw.get("name").and_then(loose_string).filter(|n| !n.is_empty())?;

    let mlb_id = raw
        .get("mlbId")
        .or_else(|| raw.get("mlb_id"))
        .and_then(loose_u64);

    let team = raw
        .get("team")
        .and_then(loose_string)
        .unwrap_or_default();

    let positions: Vec<String> = match raw.get("positions") {
        Some(Value::Array(items)) => items.iter().filter_map(loose_string).collect(),
        // Some payload shapes flatten positions to "OF/1B".
        Some(Value::String(s)) => s.split('/').map(|p| p.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    let status = parse_draft_status(raw);

    // Bid data only means anything for a finalized pick.
    let (winning_bid, winning_team) = if status == DraftStatus::Drafted {
        (
            raw.get("winningBid").and_then(loose_f64),
            raw.get("winningTeam").and_then(loose_string),
        )
    } else {
        (None, None)
    };

    Some(ScrapedPlayer {
        site_id,
        mlb_id,
        name,
        team,
        positions,
        status,
        winning_bid,
        winning_team,
    })
}

// ---------------------------------------------------------------------------
// Team parsing
// ---------------------------------------------------------------------------

fn parse_team(raw: &Value) -> Option<ScrapedTeam> {
    let name = raw.get("name").and_then(loose_string).filter(|n| !n.is_empty())?;
    let budget = raw.get("budget").and_then(loose_f64).unwrap_or(0.0);
    let spent = raw.get("spent").and_then(loose_f64).unwrap_or(0.0);
    let remaining = raw
        .get("remaining")
        .and_then(loose_f64)
        .unwrap_or(budget - spent);
    let roster_spots_filled = raw
        .get("rosterSpotsFilled")
        .or_else(|| raw.get("spotsFilled"))
        .and_then(loose_u64)
        .unwrap_or(0) as usize;
    let online = raw.get("online").and_then(Value::as_bool).unwrap_or(false);

    Some(ScrapedTeam {
        name,
        budget,
        spent,
        remaining,
        roster_spots_filled,
        online,
    })
}

// ---------------------------------------------------------------------------
// Snapshot parsing
// ---------------------------------------------------------------------------

fn parse_auction_status(raw: &Value) -> AuctionStatus {
    match raw
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "active" | "live" => AuctionStatus::Active,
        "paused" => AuctionStatus::Paused,
        "completed" | "complete" | "finished" => AuctionStatus::Completed,
        "not_found" => AuctionStatus::NotFound,
        other => {
            if !other.is_empty() {
                warn!("unknown auction status '{}', treating room as active", other);
            }
            AuctionStatus::Active
        }
    }
}

/// Parse a full raw auction payload into a typed snapshot.
///
/// Accepts both the bare room object and the `{"data": {...}}` envelope the
/// site wraps around it. The players array is required; the teams array is
/// optional (older rooms omit it) and defaults to empty.
pub fn parse_snapshot(payload: &Value) -> Result<AuctionSnapshot, ParseError> {
    let room = payload.get("data").unwrap_or(payload);

    let raw_players = room
        .get("players")
        .ok_or(ParseError::MissingField("players"))?
        .as_array()
        .ok_or(ParseError::Malformed {
            field: "players",
            message: "expected an array".into(),
        })?;

    let mut players = Vec::with_capacity(raw_players.len());
    for raw in raw_players {
        match parse_player(raw) {
            Some(p) => players.push(p),
            None => warn!("skipping player row with no id or name: {}", raw),
        }
    }

    let teams = match room.get("teams") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|raw| {
                let team = parse_team(raw);
                if team.is_none() {
                    warn!("skipping team row with no name: {}", raw);
                }
                team
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(AuctionSnapshot {
        scraped_at: Utc::now(),
        status: parse_auction_status(room),
        players,
        teams,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
