// Positional scarcity calculation.
//
// For every roster position the league defines, compares remaining quality
// supply against unfilled league-wide need and classifies the imbalance. The
// resulting adjustment multiplier feeds price expectations for undrafted
// players at that position.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LeagueConfig;
use crate::matching::matcher::MatchedPlayer;
use crate::matching::normalize::{classify_player_type, normalize_position, playing_positions, PlayerType};

// ---------------------------------------------------------------------------
// Scarcity levels
// ---------------------------------------------------------------------------

/// Supply/demand imbalance classification by ratio of league need to quality
/// supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityLevel {
    /// ratio < 0.75: more quality players than open slots.
    Surplus,
    /// 0.75 <= ratio < 1.25: supply roughly meets demand.
    Normal,
    /// 1.25 <= ratio < 2.0: demand outpacing supply.
    Moderate,
    /// ratio >= 2.0: at least two open slots chasing every quality player.
    Severe,
}

impl ScarcityLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.75 {
            ScarcityLevel::Surplus
        } else if ratio < 1.25 {
            ScarcityLevel::Normal
        } else if ratio < 2.0 {
            ScarcityLevel::Moderate
        } else {
            ScarcityLevel::Severe
        }
    }

    /// Inflation-adjustment multiplier for prices at this scarcity level.
    pub fn multiplier(&self) -> f64 {
        match self {
            ScarcityLevel::Surplus => 0.90,
            ScarcityLevel::Normal => 1.00,
            ScarcityLevel::Moderate => 1.10,
            ScarcityLevel::Severe => 1.30,
        }
    }
}

// ---------------------------------------------------------------------------
// Historical position premiums
// ---------------------------------------------------------------------------

/// Fixed empirical priors from past auction data, applied on top of the
/// live scarcity multiplier. Catchers and relievers trend inflated; first
/// base trends flat-to-surplus. Positions not listed carry no premium.
const POSITION_PREMIUMS: &[(&str, f64)] = &[
    ("C", 1.10),
    ("RP", 1.08),
    ("SS", 1.03),
    ("2B", 1.02),
    ("SP", 1.02),
    ("3B", 1.00),
    ("OF", 1.00),
    ("DH", 0.97),
    ("1B", 0.95),
];

fn position_premium(code: &str) -> f64 {
    POSITION_PREMIUMS
        .iter()
        .find(|(pos, _)| *pos == code)
        .map(|(_, premium)| *premium)
        .unwrap_or(1.0)
}

// ---------------------------------------------------------------------------
// Scarcity entry
// ---------------------------------------------------------------------------

/// Scarcity analysis for one roster position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionScarcity {
    pub position: String,
    /// Undrafted matched players eligible at this position.
    pub available_count: usize,
    /// Top half of the available pool by projected value.
    pub quality_count: usize,
    /// Unfilled league-wide slots: `teams * slots - drafted here`, floored at 0.
    pub league_need: usize,
    pub scarcity_ratio: f64,
    pub level: ScarcityLevel,
    /// `level.multiplier() * historical position premium`.
    pub adjustment: f64,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Whether a matched player is eligible at a (normalized) roster position.
///
/// Eligibility is by normalized position code; the DH/UTIL slot accepts any
/// hitter. Multi-position players count toward every position they qualify
/// for, not just one.
fn eligible_at(player: &MatchedPlayer, position: &str) -> bool {
    let positions = playing_positions(&player.player.positions);
    if positions.iter().any(|p| p == position) {
        return true;
    }
    position == "DH" && classify_player_type(&player.player.positions) == PlayerType::Hitter
}

/// Compute scarcity for every playing position in the league's roster map.
/// Bench and injured-list slots are skipped.
pub fn calculate_positional_scarcity(
    matched: &[MatchedPlayer],
    league: &LeagueConfig,
) -> Vec<PositionScarcity> {
    let mut entries = Vec::new();

    // Fold roster keys onto canonical codes first, summing slot counts: a
    // league written with split outfield slots (LF/CF/RF) is one OF market
    // with the combined need, not three duplicate entries.
    let mut slots_by_position: BTreeMap<String, usize> = BTreeMap::new();
    for (key, &slots) in &league.roster {
        let upper = key.to_uppercase();
        if matches!(upper.as_str(), "BE" | "BN" | "IL" | "DL") {
            continue;
        }
        *slots_by_position.entry(normalize_position(key)).or_insert(0) += slots;
    }

    for (position, slots) in slots_by_position {
        // Available supply: undrafted matched players eligible here, with
        // their projected values ranked descending.
        let mut available_values: Vec<f64> = matched
            .iter()
            .filter(|m| !m.player.is_drafted())
            .filter(|m| eligible_at(m, &position))
            .filter_map(|m| m.projected_value)
            .collect();
        available_values
            .sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let available_count = available_values.len();
        // Quality = top half of the remaining pool, rounding up.
        let quality_count = available_count.div_ceil(2);

        let drafted_here = matched
            .iter()
            .filter(|m| m.player.is_drafted())
            .filter(|m| eligible_at(m, &position))
            .count();
        let league_need = (league.num_teams * slots).saturating_sub(drafted_here);

        let scarcity_ratio = if quality_count > 0 {
            league_need as f64 / quality_count as f64
        } else {
            // Empty supply: any open need is maximal scarcity.
            league_need as f64
        };

        let level = ScarcityLevel::from_ratio(scarcity_ratio);
        let adjustment = level.multiplier() * position_premium(&position);

        entries.push(PositionScarcity {
            position,
            available_count,
            quality_count,
            league_need,
            scarcity_ratio,
            level,
            adjustment,
        });
    }

    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
