// Canonical typed records for scraped auction data.
//
// The live-auction site exposes loosely-typed, multi-shape payloads. Nothing
// downstream of `scrape::parse` ever touches those: the matcher and the
// inflation engine consume only the records defined here. Field names are the
// wire contract the API layer serializes, hence the camelCase renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Draft state of one player as observed on the auction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Available,
    /// Actively being bid on. Takes precedence over `Drafted` when the site
    /// emits both signals: a player on the block is never simultaneously final.
    OnBlock,
    Drafted,
    Passed,
}

/// Overall state of the auction room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Active,
    Paused,
    Completed,
    NotFound,
}

// ---------------------------------------------------------------------------
// Players and teams
// ---------------------------------------------------------------------------

/// One player row from a scrape poll. Recreated on every poll; the only
/// identity that survives across polls is `site_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPlayer {
    /// The auction site's own numeric player id.
    pub site_id: u64,
    /// Cross-platform (MLB-wide) player id, stable across projection vendors.
    /// When present it is authoritative for matching.
    pub mlb_id: Option<u64>,
    /// Raw, unnormalized display name.
    pub name: String,
    /// Team abbreviation in the site's own spelling.
    pub team: String,
    /// Eligible position codes. May include the minor-league marker ("NA"),
    /// which is not a playing position.
    pub positions: Vec<String>,
    pub status: DraftStatus,
    /// Winning bid in dollars, set only once drafted.
    pub winning_bid: Option<f64>,
    /// Name of the team that won the bid, set only once drafted.
    pub winning_team: Option<String>,
}

impl ScrapedPlayer {
    /// Whether this row carries final draft results.
    pub fn is_drafted(&self) -> bool {
        self.status == DraftStatus::Drafted
    }
}

/// One drafting team's budget and roster state, supplied per poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedTeam {
    pub name: String,
    /// Starting auction budget in dollars.
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub roster_spots_filled: usize,
    pub online: bool,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything one scrape poll produced: a stateless point-in-time snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSnapshot {
    pub scraped_at: DateTime<Utc>,
    pub status: AuctionStatus,
    pub players: Vec<ScrapedPlayer>,
    pub teams: Vec<ScrapedTeam>,
}
