// Per-team budget constraints.
//
// A team's usable money is not its raw remaining balance: every unfilled
// roster spot beyond the current one reserves the $1 minimum legal bid. The
// effective budget drives the competition factor (how many teams can clear a
// price) and the forward-looking remaining-budget adjustment.

use serde::Serialize;

use crate::config::LeagueConfig;
use crate::matching::matcher::MatchedPlayer;
use crate::scrape::types::ScrapedTeam;

/// Residual competitive pressure assumed even when no team can afford a
/// price (desperation bids happen).
pub const MIN_COMPETITION_FACTOR: f64 = 0.25;

/// A team will not reasonably sink more than this share of its effective
/// budget into a single player.
const CAN_AFFORD_FRACTION: f64 = 0.5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Budget constraint snapshot for one drafting team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBudgetConstraint {
    pub team_name: String,
    pub raw_remaining: f64,
    pub roster_spots_remaining: usize,
    /// `raw_remaining - max(0, roster_spots_remaining - 1)`, floored at 0.
    pub effective_budget: f64,
    /// Half the effective budget: the practical single-player ceiling.
    pub can_afford_threshold: f64,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute one team's effective budget from its scraped state.
///
/// Roster spots remaining come from the league's active roster size minus the
/// spots the team has already filled.
pub fn calculate_effective_budget(
    team: &ScrapedTeam,
    league: &LeagueConfig,
) -> TeamBudgetConstraint {
    let roster_spots_remaining = league
        .roster_size()
        .saturating_sub(team.roster_spots_filled);
    let reserved = roster_spots_remaining.saturating_sub(1) as f64;
    let effective_budget = (team.remaining - reserved).max(0.0);

    TeamBudgetConstraint {
        team_name: team.name.clone(),
        raw_remaining: team.remaining,
        roster_spots_remaining,
        effective_budget,
        can_afford_threshold: effective_budget * CAN_AFFORD_FRACTION,
    }
}

/// Constraints for every team in a snapshot.
pub fn calculate_team_constraints(
    teams: &[ScrapedTeam],
    league: &LeagueConfig,
) -> Vec<TeamBudgetConstraint> {
    teams
        .iter()
        .map(|team| calculate_effective_budget(team, league))
        .collect()
}

/// Estimate bidding pressure at a hypothetical price: the fraction of teams
/// whose effective budget clears it, floored at `MIN_COMPETITION_FACTOR`.
///
/// With no team data at all the floor is returned directly.
pub fn calculate_competition_factor(price: f64, constraints: &[TeamBudgetConstraint]) -> f64 {
    if constraints.is_empty() {
        return MIN_COMPETITION_FACTOR;
    }
    let can_pay = constraints
        .iter()
        .filter(|c| c.effective_budget >= price)
        .count();
    let fraction = can_pay as f64 / constraints.len() as f64;
    fraction.max(MIN_COMPETITION_FACTOR)
}

/// Forward-looking remaining-budget adjustment: the ratio of effective money
/// still in the league to the projected value of all undrafted matched
/// players. Above 1.0, future prices should run hot; below, bargains loom.
///
/// Degrades to 0.0 with no team data (the ratio is meaningless without
/// effective budgets) and to a neutral 1.0 when everything projectable has
/// already been drafted.
pub fn remaining_budget_adjustment(
    matched: &[MatchedPlayer],
    constraints: &[TeamBudgetConstraint],
) -> f64 {
    if constraints.is_empty() {
        return 0.0;
    }
    let total_effective: f64 = constraints.iter().map(|c| c.effective_budget).sum();
    let remaining_value: f64 = matched
        .iter()
        .filter(|m| !m.player.is_drafted())
        .filter_map(|m| m.projected_value)
        .sum();

    if remaining_value > 0.0 {
        total_effective / remaining_value
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
