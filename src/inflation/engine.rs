// Inflation statistics engine.
//
// Turns matched auction data into realized and forward-looking market
// statistics: how far actual bids run from projected values, overall and per
// value tier, and how the remaining money supply should adjust expectations
// for players still on the board. Pure functions of their inputs; the only
// side effects are diagnostic log lines.

use serde::Serialize;
use thiserror::Error;

use crate::config::LeagueConfig;
use crate::inflation::budget::{
    calculate_team_constraints, remaining_budget_adjustment, TeamBudgetConstraint,
};
use crate::inflation::scarcity::{calculate_positional_scarcity, PositionScarcity};
use crate::matching::matcher::MatchedPlayer;
use crate::scrape::types::ScrapedTeam;

/// Number of rank-ordered value tiers.
pub const TIER_COUNT: usize = 10;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Analysis failures, split so the HTTP layer can map them: a validation
/// fault is the caller's bad input (4xx), an internal fault is ours (5xx).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid league configuration: {0}")]
    InvalidConfig(String),

    #[error("internal analytics fault: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Inflation statistics for one value tier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStats {
    /// 1 (highest projected values) through 10.
    pub tier: usize,
    pub min_value: f64,
    pub max_value: f64,
    pub drafted_count: usize,
    /// Value-weighted inflation percent within this tier; 0 with no drafts.
    pub inflation_rate: f64,
}

/// The core computed market statistics. Recomputed per request, never
/// mutated in place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationStats {
    /// Unweighted arithmetic mean of per-player inflation percentages.
    pub overall_inflation_rate: f64,
    /// Value-weighted rate: dollars at stake, not percentage noise. A $1
    /// projection selling for $3 is +200% but economically trivial.
    pub weighted_inflation_rate: f64,
    pub total_actual_spent: f64,
    pub total_projected_value_drafted: f64,
    pub drafted_count: usize,
    pub tiers: Vec<TierStats>,
}

/// `InflationStats` extended with scarcity and budget-constraint context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedInflationStats {
    #[serde(flatten)]
    pub stats: InflationStats,
    pub position_scarcity: Vec<PositionScarcity>,
    pub team_constraints: Vec<TeamBudgetConstraint>,
    /// Effective league money remaining / projected value remaining.
    pub remaining_budget_adjustment: f64,
}

// ---------------------------------------------------------------------------
// Tier boundaries
// ---------------------------------------------------------------------------

/// Value range of one tier, derived from the candidate pool.
#[derive(Debug, Clone, Copy)]
pub struct TierBound {
    pub min_value: f64,
    pub max_value: f64,
    /// False for tiers that got no players (pool smaller than ten).
    pub populated: bool,
}

/// Compute equal-count decile boundaries over the full candidate pool.
///
/// Boundaries come from every matched player's projected value, not just the
/// drafted ones, so a player's tier membership is stable no matter how far
/// the draft has progressed. Standalone so tests can target the partition
/// rule directly.
pub fn decile_bounds(pool_values: &[f64]) -> Vec<TierBound> {
    let mut sorted: Vec<f64> = pool_values.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mut bounds = Vec::with_capacity(TIER_COUNT);
    for tier in 0..TIER_COUNT {
        let start = tier * n / TIER_COUNT;
        let end = (tier + 1) * n / TIER_COUNT;
        if start >= end {
            bounds.push(TierBound {
                min_value: 0.0,
                max_value: 0.0,
                populated: false,
            });
        } else {
            bounds.push(TierBound {
                min_value: sorted[end - 1],
                max_value: sorted[start],
                populated: true,
            });
        }
    }
    bounds
}

/// Find the tier (0-based) a projected value falls into: the first populated
/// tier whose lower bound it clears, else the last populated tier.
fn tier_for_value(bounds: &[TierBound], value: f64) -> Option<usize> {
    let mut last_populated = None;
    for (idx, bound) in bounds.iter().enumerate() {
        if !bound.populated {
            continue;
        }
        if value >= bound.min_value {
            return Some(idx);
        }
        last_populated = Some(idx);
    }
    last_populated
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// A drafted player's realized numbers, extracted once.
struct DraftedEntry {
    projected_value: f64,
    actual_bid: f64,
    inflation_percent: Option<f64>,
}

fn drafted_entries(matched: &[MatchedPlayer]) -> Vec<DraftedEntry> {
    matched
        .iter()
        .filter(|m| m.player.is_drafted())
        .filter_map(|m| {
            let actual_bid = m.actual_bid?;
            let projected_value = m.projected_value?;
            Some(DraftedEntry {
                projected_value,
                actual_bid,
                inflation_percent: m.inflation_percent,
            })
        })
        .collect()
}

/// Compute the core inflation statistics for a matched batch.
///
/// Zero drafted players is a valid state: every rate reads 0, never NaN.
pub fn calculate_inflation_stats(
    matched: &[MatchedPlayer],
    league: &LeagueConfig,
) -> Result<InflationStats, AnalysisError> {
    league
        .validate()
        .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;

    let drafted = drafted_entries(matched);
    let drafted_count = drafted.len();
    let total_actual_spent: f64 = drafted.iter().map(|d| d.actual_bid).sum();
    let total_projected_value_drafted: f64 = drafted.iter().map(|d| d.projected_value).sum();

    // Unweighted mean over the players where per-player inflation is defined.
    let percents: Vec<f64> = drafted.iter().filter_map(|d| d.inflation_percent).collect();
    let overall_inflation_rate = if percents.is_empty() {
        0.0
    } else {
        percents.iter().sum::<f64>() / percents.len() as f64
    };

    // Value-weighted rate: each player's percentage weighted by its projected
    // dollars, which algebraically reduces to total surplus over total value.
    let weighted_base: f64 = drafted
        .iter()
        .filter(|d| d.projected_value > 0.0)
        .map(|d| d.projected_value)
        .sum();
    let weighted_surplus: f64 = drafted
        .iter()
        .filter(|d| d.projected_value > 0.0)
        .map(|d| d.actual_bid - d.projected_value)
        .sum();
    let weighted_inflation_rate = if weighted_base > 0.0 {
        weighted_surplus / weighted_base * 100.0
    } else {
        0.0
    };

    let tiers = calculate_tier_stats(matched, &drafted)?;

    Ok(InflationStats {
        overall_inflation_rate,
        weighted_inflation_rate,
        total_actual_spent,
        total_projected_value_drafted,
        drafted_count,
        tiers,
    })
}

fn calculate_tier_stats(
    matched: &[MatchedPlayer],
    drafted: &[DraftedEntry],
) -> Result<Vec<TierStats>, AnalysisError> {
    // Boundaries come from the full candidate pool (every matched player
    // with a positive projected value), not the drafted subset.
    let pool_values: Vec<f64> = matched
        .iter()
        .filter_map(|m| m.projected_value)
        .filter(|v| *v > 0.0)
        .collect();
    let bounds = decile_bounds(&pool_values);

    let mut spent_by_tier = vec![0.0_f64; TIER_COUNT];
    let mut value_by_tier = vec![0.0_f64; TIER_COUNT];
    let mut count_by_tier = vec![0_usize; TIER_COUNT];

    for entry in drafted.iter().filter(|d| d.projected_value > 0.0) {
        let tier = tier_for_value(&bounds, entry.projected_value).ok_or_else(|| {
            AnalysisError::Internal(format!(
                "drafted value {} fell outside all tier bounds",
                entry.projected_value
            ))
        })?;
        spent_by_tier[tier] += entry.actual_bid;
        value_by_tier[tier] += entry.projected_value;
        count_by_tier[tier] += 1;
    }

    Ok(bounds
        .iter()
        .enumerate()
        .map(|(idx, bound)| TierStats {
            tier: idx + 1,
            min_value: bound.min_value,
            max_value: bound.max_value,
            drafted_count: count_by_tier[idx],
            inflation_rate: if value_by_tier[idx] > 0.0 {
                (spent_by_tier[idx] - value_by_tier[idx]) / value_by_tier[idx] * 100.0
            } else {
                0.0
            },
        })
        .collect())
}

/// Compute the enhanced statistics: core stats plus positional scarcity and
/// team budget context.
///
/// `teams` is optional; without it the team-dependent outputs degrade to an
/// empty constraint list and a zero budget adjustment rather than failing.
pub fn calculate_enhanced_inflation_stats(
    matched: &[MatchedPlayer],
    league: &LeagueConfig,
    teams: Option<&[ScrapedTeam]>,
) -> Result<EnhancedInflationStats, AnalysisError> {
    let stats = calculate_inflation_stats(matched, league)?;
    let position_scarcity = calculate_positional_scarcity(matched, league);
    let team_constraints = match teams {
        Some(teams) => calculate_team_constraints(teams, league),
        None => Vec::new(),
    };
    let adjustment = remaining_budget_adjustment(matched, &team_constraints);

    Ok(EnhancedInflationStats {
        stats,
        position_scarcity,
        team_constraints,
        remaining_budget_adjustment: adjustment,
    })
}

// ---------------------------------------------------------------------------
// Helper functions with fixed contracts
// ---------------------------------------------------------------------------

/// Scale a base dollar value by an inflation percentage.
pub fn adjust_value_for_inflation(base: f64, percent: f64) -> f64 {
    base * (1.0 + percent / 100.0)
}

/// Qualitative bucket for an inflation percentage (by magnitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Bucket an inflation percentage: low < 5, moderate < 15, high < 30,
/// very_high beyond.
pub fn get_inflation_level(percent: f64) -> InflationLevel {
    let magnitude = percent.abs();
    if magnitude < 5.0 {
        InflationLevel::Low
    } else if magnitude < 15.0 {
        InflationLevel::Moderate
    } else if magnitude < 30.0 {
        InflationLevel::High
    } else {
        InflationLevel::VeryHigh
    }
}

/// Format the signed dollar delta between an actual bid and a projected
/// value, or a placeholder when either side is missing.
pub fn get_value_difference_display(actual: Option<f64>, projected: Option<f64>) -> String {
    match (actual, projected) {
        (Some(actual), Some(projected)) => {
            let diff = actual - projected;
            if diff >= 0.0 {
                format!("+${:.0}", diff)
            } else {
                format!("-${:.0}", diff.abs())
            }
        }
        _ => "N/A".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::matcher::MatchConfidence;
    use crate::scrape::types::{DraftStatus, ScrapedPlayer};
    use std::collections::HashMap;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn test_league() -> LeagueConfig {
        let mut roster = HashMap::new();
        roster.insert("C".into(), 1);
        roster.insert("OF".into(), 3);
        roster.insert("SP".into(), 5);
        LeagueConfig {
            num_teams: 12,
            budget: 260,
            roster,
        }
    }

    fn available(name: &str, value: f64) -> MatchedPlayer {
        MatchedPlayer {
            player: ScrapedPlayer {
                site_id: 1,
                mlb_id: None,
                name: name.into(),
                team: "NYY".into(),
                positions: vec!["OF".into()],
                status: DraftStatus::Available,
                winning_bid: None,
                winning_team: None,
            },
            projection_player_id: Some(format!("p-{name}")),
            projected_value: Some(value),
            actual_bid: None,
            inflation_amount: None,
            inflation_percent: None,
            confidence: MatchConfidence::Exact,
        }
    }

    fn sold(name: &str, value: f64, bid: f64) -> MatchedPlayer {
        let mut m = available(name, value);
        m.player.status = DraftStatus::Drafted;
        m.player.winning_bid = Some(bid);
        m.player.winning_team = Some("Duke".into());
        m.actual_bid = Some(bid);
        if value > 0.0 {
            m.inflation_amount = Some(bid - value);
            m.inflation_percent = Some((bid - value) / value * 100.0);
        }
        m
    }

    fn team(name: &str, remaining: f64, filled: usize) -> ScrapedTeam {
        ScrapedTeam {
            name: name.into(),
            budget: 260.0,
            spent: 260.0 - remaining,
            remaining,
            roster_spots_filled: filled,
            online: true,
        }
    }

    // ---- Core stats ----

    #[test]
    fn zero_drafted_players_all_rates_zero() {
        let league = test_league();
        let pool = vec![available("A", 40.0), available("B", 10.0)];
        let stats = calculate_inflation_stats(&pool, &league).unwrap();

        assert!(approx_eq(stats.overall_inflation_rate, 0.0, 1e-9));
        assert!(approx_eq(stats.weighted_inflation_rate, 0.0, 1e-9));
        assert!(approx_eq(stats.total_actual_spent, 0.0, 1e-9));
        assert_eq!(stats.drafted_count, 0);
        for tier in &stats.tiers {
            assert!(tier.inflation_rate.is_finite());
            assert!(approx_eq(tier.inflation_rate, 0.0, 1e-9));
        }
    }

    #[test]
    fn empty_batch_is_valid() {
        let league = test_league();
        let stats = calculate_inflation_stats(&[], &league).unwrap();
        assert_eq!(stats.drafted_count, 0);
        assert!(approx_eq(stats.overall_inflation_rate, 0.0, 1e-9));
    }

    #[test]
    fn single_drafted_player() {
        let league = test_league();
        let pool = vec![sold("Mike Trout", 50.0, 45.0)];
        let stats = calculate_inflation_stats(&pool, &league).unwrap();

        assert_eq!(stats.drafted_count, 1);
        assert!(approx_eq(stats.total_actual_spent, 45.0, 1e-9));
        assert!(approx_eq(stats.total_projected_value_drafted, 50.0, 1e-9));
        assert!(approx_eq(stats.overall_inflation_rate, -10.0, 1e-9));
        assert!(approx_eq(stats.weighted_inflation_rate, -10.0, 1e-9));
    }

    #[test]
    fn weighted_rate_dampens_low_value_outliers() {
        let league = test_league();
        // A $1 lottery ticket sold for $4 (+300%) next to a $40 star sold
        // for $42 (+5%).
        let pool = vec![sold("Lottery", 1.0, 4.0), sold("Star", 40.0, 42.0)];
        let stats = calculate_inflation_stats(&pool, &league).unwrap();

        // Unweighted mean: (300 + 5) / 2 = 152.5
        assert!(approx_eq(stats.overall_inflation_rate, 152.5, 1e-9));
        // Weighted: (46 - 41) / 41 * 100 = ~12.2
        assert!(approx_eq(stats.weighted_inflation_rate, 5.0 / 41.0 * 100.0, 1e-9));
        assert!(
            stats.weighted_inflation_rate < stats.overall_inflation_rate,
            "weighted rate must dampen percentage noise"
        );
    }

    #[test]
    fn invalid_league_config_is_a_validation_error() {
        let mut league = test_league();
        league.num_teams = 0;
        let err = calculate_inflation_stats(&[], &league).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    // ---- Tier boundaries ----

    #[test]
    fn decile_bounds_partition_equal_counts() {
        // 20 values, 50 down to 31: two per tier.
        let values: Vec<f64> = (0..20).map(|i| 50.0 - i as f64).collect();
        let bounds = decile_bounds(&values);
        assert_eq!(bounds.len(), TIER_COUNT);

        assert!(approx_eq(bounds[0].max_value, 50.0, 1e-9));
        assert!(approx_eq(bounds[0].min_value, 49.0, 1e-9));
        assert!(approx_eq(bounds[9].max_value, 32.0, 1e-9));
        assert!(approx_eq(bounds[9].min_value, 31.0, 1e-9));
        assert!(bounds.iter().all(|b| b.populated));
    }

    #[test]
    fn decile_bounds_with_small_pool() {
        let values = vec![30.0, 20.0, 10.0];
        let bounds = decile_bounds(&values);
        assert_eq!(bounds.len(), TIER_COUNT);
        assert_eq!(bounds.iter().filter(|b| b.populated).count(), 3);
    }

    #[test]
    fn decile_bounds_empty_pool() {
        let bounds = decile_bounds(&[]);
        assert_eq!(bounds.len(), TIER_COUNT);
        assert!(bounds.iter().all(|b| !b.populated));
    }

    #[test]
    fn tier_membership_stable_regardless_of_draft_progress() {
        let league = test_league();

        // 20-player pool; the same star is drafted in both scenarios.
        let mut early: Vec<MatchedPlayer> = (0..20)
            .map(|i| available(&format!("P{i}"), 50.0 - i as f64))
            .collect();
        early[0] = sold("P0", 50.0, 60.0);

        let mut late: Vec<MatchedPlayer> = (0..20)
            .map(|i| {
                if i < 15 {
                    sold(&format!("P{i}"), 50.0 - i as f64, 50.0 - i as f64)
                } else {
                    available(&format!("P{i}"), 50.0 - i as f64)
                }
            })
            .collect();
        late[0] = sold("P0", 50.0, 60.0);

        let early_stats = calculate_inflation_stats(&early, &league).unwrap();
        let late_stats = calculate_inflation_stats(&late, &league).unwrap();

        // P0 sits in tier 1 in both runs because boundaries derive from the
        // full pool, not the drafted subset.
        assert_eq!(early_stats.tiers[0].drafted_count, 1);
        assert!(late_stats.tiers[0].drafted_count >= 1);
        assert!(approx_eq(
            early_stats.tiers[0].max_value,
            late_stats.tiers[0].max_value,
            1e-9
        ));
    }

    #[test]
    fn tier_inflation_localized() {
        let league = test_league();
        let mut pool: Vec<MatchedPlayer> = (0..20)
            .map(|i| available(&format!("P{i}"), 50.0 - i as f64))
            .collect();
        // Overpay in tier 1, underpay in tier 10.
        pool[0] = sold("P0", 50.0, 60.0); // +20%
        pool[19] = sold("P19", 31.0, 25.0); // ~-19.4%

        let stats = calculate_inflation_stats(&pool, &league).unwrap();
        assert!(stats.tiers[0].inflation_rate > 0.0);
        assert!(stats.tiers[9].inflation_rate < 0.0);
        assert_eq!(stats.tiers[0].drafted_count, 1);
        assert_eq!(stats.tiers[9].drafted_count, 1);
    }

    // ---- Enhanced stats ----

    #[test]
    fn enhanced_stats_with_teams() {
        let league = test_league();
        let pool = vec![sold("Star", 40.0, 48.0), available("Next", 30.0)];
        let teams = vec![team("A", 100.0, 5), team("B", 60.0, 7)];

        let enhanced =
            calculate_enhanced_inflation_stats(&pool, &league, Some(&teams)).unwrap();
        assert_eq!(enhanced.team_constraints.len(), 2);
        assert!(!enhanced.position_scarcity.is_empty());
        assert!(enhanced.remaining_budget_adjustment > 0.0);
    }

    #[test]
    fn enhanced_stats_degrade_without_teams() {
        let league = test_league();
        let pool = vec![sold("Star", 40.0, 48.0), available("Next", 30.0)];

        let enhanced = calculate_enhanced_inflation_stats(&pool, &league, None).unwrap();
        assert!(enhanced.team_constraints.is_empty());
        assert!(approx_eq(enhanced.remaining_budget_adjustment, 0.0, 1e-9));
        // Core stats still computed.
        assert_eq!(enhanced.stats.drafted_count, 1);
    }

    #[test]
    fn enhanced_stats_wire_shape() {
        let league = test_league();
        let pool = vec![sold("Star", 40.0, 48.0)];
        let enhanced = calculate_enhanced_inflation_stats(&pool, &league, None).unwrap();

        let json = serde_json::to_value(&enhanced).unwrap();
        // Flattened core fields sit next to the enhanced ones.
        assert!(json["overallInflationRate"].is_number());
        assert!(json["weightedInflationRate"].is_number());
        assert!(json["positionScarcity"].is_array());
        assert!(json["teamConstraints"].is_array());
        assert!(json["remainingBudgetAdjustment"].is_number());
    }

    // ---- Helpers ----

    #[test]
    fn adjust_value_contract() {
        assert!(approx_eq(adjust_value_for_inflation(20.0, 10.0), 22.0, 1e-9));
        assert!(approx_eq(adjust_value_for_inflation(20.0, -10.0), 18.0, 1e-9));
        assert!(approx_eq(adjust_value_for_inflation(20.0, 0.0), 20.0, 1e-9));
    }

    #[test]
    fn inflation_level_breakpoints() {
        assert_eq!(get_inflation_level(0.0), InflationLevel::Low);
        assert_eq!(get_inflation_level(4.9), InflationLevel::Low);
        assert_eq!(get_inflation_level(5.0), InflationLevel::Moderate);
        assert_eq!(get_inflation_level(14.9), InflationLevel::Moderate);
        assert_eq!(get_inflation_level(15.0), InflationLevel::High);
        assert_eq!(get_inflation_level(29.9), InflationLevel::High);
        assert_eq!(get_inflation_level(30.0), InflationLevel::VeryHigh);
        assert_eq!(get_inflation_level(-40.0), InflationLevel::VeryHigh);
    }

    #[test]
    fn value_difference_display_formats() {
        assert_eq!(get_value_difference_display(Some(45.0), Some(50.0)), "-$5");
        assert_eq!(get_value_difference_display(Some(55.0), Some(50.0)), "+$5");
        assert_eq!(get_value_difference_display(Some(50.0), Some(50.0)), "+$0");
        assert_eq!(get_value_difference_display(None, Some(50.0)), "N/A");
        assert_eq!(get_value_difference_display(Some(45.0), None), "N/A");
    }
}
