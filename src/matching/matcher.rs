// Scraped-player to projection matching.
//
// Reconciles two independently sourced identity streams: the auction site's
// player rows and a projection vendor's player list. Matching is a gated,
// weighted score over normalized name/team/position signals, with a direct
// cross-platform-id short-circuit when both sides carry one. "No match" is a
// first-class result, never an error; ambiguous cases resolve conservatively
// to unmatched and are logged for offline review.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::matching::normalize::{
    classify_player_type, is_minor_league_marker, normalize_name, normalize_team,
    playing_positions, strip_generational_suffix, PlayerType, FREE_AGENT,
};
use crate::projections::ProjectionPlayer;
use crate::scrape::types::{DraftStatus, ScrapedPlayer};

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

// Name equality is a gate, not a weighted factor: a candidate that fails both
// name comparisons scores zero outright.
const SCORE_NAME_EXACT: i32 = 100;
const SCORE_NAME_SUFFIX_STRIPPED: i32 = 80;

const SCORE_TEAM_MATCH: i32 = 50;
/// A projection listed as a free agent gets a small nod instead of a
/// rejection: recently traded players sit on "FA" until vendors catch up.
const SCORE_TEAM_FREE_AGENT: i32 = 10;

const SCORE_TYPE_MATCH: i32 = 40;
const SCORE_POSITION_OVERLAP: i32 = 20;
/// Same-name pitcher/hitter collisions are a known real-world failure mode;
/// a type mismatch is strong evidence of a different person.
const PENALTY_TYPE_MISMATCH: i32 = -100;

/// Discourages matching a star to a replacement-level namesake.
const PENALTY_REPLACEMENT_VALUE: i32 = -30;
const BONUS_DRAFT_BOARD_VALUE: i32 = 10;

const THRESHOLD_EXACT: i32 = 150;
const THRESHOLD_PARTIAL: i32 = 100;
const THRESHOLD_FLOOR: i32 = 50;
/// In the 50-99 band, a runner-up within this many points (inclusive) means
/// the pick is a coin flip.
const AMBIGUITY_WINDOW: i32 = 30;

// Diagnostic-only thresholds for the bargain-bin sanity warning.
const SANITY_BID_FLOOR: f64 = 10.0;
const SANITY_VALUE_CEILING: f64 = 2.0;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The matcher's self-reported certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Exact,
    Partial,
    Unmatched,
}

/// Join record produced per scraped player per matching run. Recomputed on
/// every run; it is an output, not a stored entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPlayer {
    pub player: ScrapedPlayer,
    pub projection_player_id: Option<String>,
    pub projected_value: Option<f64>,
    pub actual_bid: Option<f64>,
    /// `actual_bid - projected_value`, only for drafted players with a
    /// positive projected value.
    pub inflation_amount: Option<f64>,
    pub inflation_percent: Option<f64>,
    pub confidence: MatchConfidence,
}

/// Result of matching one scraped player against a projection list.
#[derive(Debug, Clone)]
pub struct MatchResolution<'a> {
    pub player: Option<&'a ProjectionPlayer>,
    pub confidence: MatchConfidence,
}

/// Matched/unmatched partition of one scraped batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub matched: Vec<MatchedPlayer>,
    pub unmatched: Vec<ScrapedPlayer>,
}

// ---------------------------------------------------------------------------
// Candidate scoring
// ---------------------------------------------------------------------------

/// Score one projection candidate against a scraped player. Zero means "not
/// a candidate".
pub fn score_candidate(scraped: &ScrapedPlayer, candidate: &ProjectionPlayer) -> i32 {
    // A minor-league row never satisfies an MLB projection, even under a
    // perfect name/team/position coincidence.
    if scraped.positions.iter().any(|p| is_minor_league_marker(p)) {
        return 0;
    }

    let scraped_name = normalize_name(&scraped.name);
    let candidate_name = normalize_name(&candidate.name);
    if scraped_name.is_empty() || candidate_name.is_empty() {
        return 0;
    }

    let mut score = if scraped_name == candidate_name {
        SCORE_NAME_EXACT
    } else if strip_generational_suffix(&scraped_name) == strip_generational_suffix(&candidate_name)
    {
        SCORE_NAME_SUFFIX_STRIPPED
    } else {
        return 0;
    };

    let scraped_team = normalize_team(&scraped.team);
    let candidate_team = normalize_team(&candidate.team);
    if !scraped_team.is_empty() && scraped_team == candidate_team {
        score += SCORE_TEAM_MATCH;
    } else if candidate_team == FREE_AGENT {
        score += SCORE_TEAM_FREE_AGENT;
    }

    let scraped_type = classify_player_type(&scraped.positions);
    let candidate_type = classify_player_type(&candidate.positions);
    match (scraped_type, candidate_type) {
        (PlayerType::Unknown, _) | (_, PlayerType::Unknown) => {}
        (a, b) if a == b => {
            score += SCORE_TYPE_MATCH;
            let scraped_positions = playing_positions(&scraped.positions);
            let candidate_positions: HashSet<String> =
                playing_positions(&candidate.positions).into_iter().collect();
            if scraped_positions
                .iter()
                .any(|p| candidate_positions.contains(p))
            {
                score += SCORE_POSITION_OVERLAP;
            }
        }
        _ => score += PENALTY_TYPE_MISMATCH,
    }

    if candidate.projected_value <= 1.0 {
        score += PENALTY_REPLACEMENT_VALUE;
    } else if candidate.projected_value >= 20.0 {
        score += BONUS_DRAFT_BOARD_VALUE;
    }

    score
}

// ---------------------------------------------------------------------------
// Single-player resolution
// ---------------------------------------------------------------------------

/// Match one scraped player against the projection list.
///
/// Projections whose ids appear in `consumed` are out of the running; the
/// batch matcher uses that to prevent double-matching.
fn resolve<'a>(
    scraped: &ScrapedPlayer,
    projections: &'a [ProjectionPlayer],
    consumed: &HashSet<String>,
) -> MatchResolution<'a> {
    // Direct-id short-circuit: a shared cross-platform id is authoritative.
    if let Some(mlb_id) = scraped.mlb_id {
        if let Some(hit) = projections
            .iter()
            .find(|p| p.mlb_id == Some(mlb_id) && !consumed.contains(&p.id))
        {
            return MatchResolution {
                player: Some(hit),
                confidence: MatchConfidence::Exact,
            };
        }
    }

    let mut best: Option<(&ProjectionPlayer, i32)> = None;
    let mut second_score = 0;
    for candidate in projections.iter().filter(|p| !consumed.contains(&p.id)) {
        let score = score_candidate(scraped, candidate);
        if score <= 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {
                second_score = second_score.max(score);
            }
            Some((_, best_score)) => {
                second_score = second_score.max(best_score);
                best = Some((candidate, score));
            }
            None => best = Some((candidate, score)),
        }
    }

    let (candidate, score) = match best {
        Some(found) => found,
        None => {
            return MatchResolution {
                player: None,
                confidence: MatchConfidence::Unmatched,
            }
        }
    };

    if score >= THRESHOLD_EXACT {
        return MatchResolution {
            player: Some(candidate),
            confidence: MatchConfidence::Exact,
        };
    }
    if score >= THRESHOLD_PARTIAL {
        return MatchResolution {
            player: Some(candidate),
            confidence: MatchConfidence::Partial,
        };
    }
    if score >= THRESHOLD_FLOOR {
        if second_score > 0 && score - second_score <= AMBIGUITY_WINDOW {
            warn!(
                "ambiguous match for '{}' ({}): best {} vs runner-up {}, rejecting",
                scraped.name, scraped.team, score, second_score
            );
            return MatchResolution {
                player: None,
                confidence: MatchConfidence::Unmatched,
            };
        }
        return MatchResolution {
            player: Some(candidate),
            confidence: MatchConfidence::Partial,
        };
    }

    MatchResolution {
        player: None,
        confidence: MatchConfidence::Unmatched,
    }
}

/// Public single-player contract: match against a fresh (unconsumed) list.
pub fn match_player<'a>(
    scraped: &ScrapedPlayer,
    projections: &'a [ProjectionPlayer],
) -> MatchResolution<'a> {
    resolve(scraped, projections, &HashSet::new())
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// How complete a row's draft-state fields are: bid + winning team beats one
/// of the two beats neither.
fn draft_completeness(player: &ScrapedPlayer) -> u8 {
    player.winning_bid.is_some() as u8 + player.winning_team.is_some() as u8
}

/// Whether `candidate` should replace `incumbent` within a duplicate group.
fn prefer_over(candidate: &ScrapedPlayer, incumbent: &ScrapedPlayer) -> bool {
    let by_completeness = draft_completeness(candidate).cmp(&draft_completeness(incumbent));
    if by_completeness != std::cmp::Ordering::Equal {
        return by_completeness == std::cmp::Ordering::Greater;
    }
    let by_drafted = (candidate.status == DraftStatus::Drafted)
        .cmp(&(incumbent.status == DraftStatus::Drafted));
    if by_drafted != std::cmp::Ordering::Equal {
        return by_drafted == std::cmp::Ordering::Greater;
    }
    candidate.site_id < incumbent.site_id
}

/// Collapse duplicate scraped rows.
///
/// The site sometimes lists the same player twice in one poll, commonly with
/// one copy missing draft data. Rows are grouped by (normalized name,
/// normalized team, pitcher/hitter type) and the most complete row wins, so
/// the incomplete duplicate cannot steal the match and drop real bid data.
/// Output order is the first-occurrence order of each group.
pub fn dedup_scraped(players: &[ScrapedPlayer]) -> Vec<ScrapedPlayer> {
    let mut winners: Vec<ScrapedPlayer> = Vec::with_capacity(players.len());
    let mut index_by_key: HashMap<(String, String, PlayerType), usize> = HashMap::new();

    for player in players {
        let key = (
            normalize_name(&player.name),
            normalize_team(&player.team),
            classify_player_type(&player.positions),
        );
        match index_by_key.get(&key) {
            Some(&idx) => {
                if prefer_over(player, &winners[idx]) {
                    winners[idx] = player.clone();
                }
            }
            None => {
                index_by_key.insert(key, winners.len());
                winners.push(player.clone());
            }
        }
    }
    winners
}

// ---------------------------------------------------------------------------
// Batch matching
// ---------------------------------------------------------------------------

/// Build the join record for one resolved match.
fn build_matched(
    player: ScrapedPlayer,
    projection: &ProjectionPlayer,
    confidence: MatchConfidence,
) -> MatchedPlayer {
    let actual_bid = if player.is_drafted() {
        player.winning_bid
    } else {
        None
    };

    // Realized inflation is only defined for a finalized bid against a
    // positive projected value.
    let (inflation_amount, inflation_percent) = match actual_bid {
        Some(bid) if projection.projected_value > 0.0 => {
            let amount = bid - projection.projected_value;
            (
                Some(amount),
                Some(amount / projection.projected_value * 100.0),
            )
        }
        _ => (None, None),
    };

    if let Some(bid) = actual_bid {
        if bid >= SANITY_BID_FLOOR && projection.projected_value <= SANITY_VALUE_CEILING {
            // Diagnostic only: a real bid landing on a near-zero projection
            // usually means the vendor row is stale, not that the match is
            // wrong. Keep the match.
            warn!(
                "'{}' drafted for ${} but projected at ${}",
                player.name, bid, projection.projected_value
            );
        }
    }

    MatchedPlayer {
        player,
        projection_player_id: Some(projection.id.clone()),
        projected_value: Some(projection.projected_value),
        actual_bid,
        inflation_amount,
        inflation_percent,
        confidence,
    }
}

/// Match a full scraped batch against a projection list.
///
/// Dedupes the scraped input first, then matches greedily in input order:
/// once a projection id is consumed it cannot be reused, and later scraped
/// players that would have matched it fall through to unmatched. The greedy
/// first-come ordering is part of the contract.
///
/// Empty inputs are valid and yield empty outputs.
pub fn match_all_players(
    scraped: &[ScrapedPlayer],
    projections: &[ProjectionPlayer],
) -> MatchOutcome {
    let deduped = dedup_scraped(scraped);

    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    let mut consumed: HashSet<String> = HashSet::new();

    for player in deduped {
        let resolution = resolve(&player, projections, &consumed);
        match resolution.player {
            Some(projection) => {
                consumed.insert(projection.id.clone());
                matched.push(build_matched(player, projection, resolution.confidence));
            }
            None => unmatched.push(player),
        }
    }

    MatchOutcome { matched, unmatched }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
