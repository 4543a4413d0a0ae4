// League configuration loading and parsing (league.toml).
//
// The core treats the league settings as externally supplied and immutable:
// team count, auction budget per team, and the roster slot map. Validation
// here is the caller's single checkpoint before the analytics run; the
// inflation engine only re-checks the handful of fields it divides by.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

/// League settings for one auction.
///
/// `roster` maps a position code ("C", "OF", "SP", ...) to the number of
/// roster slots each team fills at that position. Bench and injured-list
/// slots may appear in the map but are excluded from auction math.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub num_teams: usize,
    /// Auction budget per team, in dollars.
    pub budget: u32,
    pub roster: HashMap<String, usize>,
}

impl LeagueConfig {
    /// Active roster size: sum of all slot counts, excluding IL/DL slots.
    /// Injured-list players do not consume auction budget.
    pub fn roster_size(&self) -> usize {
        self.roster
            .iter()
            .filter(|(key, _)| {
                let upper = key.to_uppercase();
                upper != "IL" && upper != "DL"
            })
            .map(|(_, &count)| count)
            .sum()
    }

    /// Total dollars in the league: `num_teams * budget`.
    pub fn total_budget(&self) -> f64 {
        self.num_teams as f64 * self.budget as f64
    }

    /// Check the fields the analytics divide by or iterate over.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_teams == 0 {
            return Err(ConfigError::ValidationError {
                field: "num_teams".into(),
                message: "league must have at least one team".into(),
            });
        }
        if self.budget == 0 {
            return Err(ConfigError::ValidationError {
                field: "budget".into(),
                message: "auction budget must be positive".into(),
            });
        }
        if self.roster_size() == 0 {
            return Err(ConfigError::ValidationError {
                field: "roster".into(),
                message: "roster must define at least one non-IL slot".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a league config from a TOML file.
pub fn load_league_config(path: &Path) -> Result<LeagueConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.league.validate()?;
    Ok(file.league)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_league() -> LeagueConfig {
        let mut roster = HashMap::new();
        roster.insert("C".into(), 1);
        roster.insert("1B".into(), 1);
        roster.insert("2B".into(), 1);
        roster.insert("3B".into(), 1);
        roster.insert("SS".into(), 1);
        roster.insert("OF".into(), 3);
        roster.insert("DH".into(), 1);
        roster.insert("SP".into(), 5);
        roster.insert("RP".into(), 3);
        roster.insert("BE".into(), 4);
        roster.insert("IL".into(), 2);
        LeagueConfig {
            num_teams: 12,
            budget: 260,
            roster,
        }
    }

    #[test]
    fn roster_size_excludes_il() {
        let league = test_league();
        // 1+1+1+1+1+3+1+5+3+4 = 21, IL(2) excluded
        assert_eq!(league.roster_size(), 21);
    }

    #[test]
    fn total_budget() {
        let league = test_league();
        assert!((league.total_budget() - 3120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_accepts_sane_config() {
        assert!(test_league().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_teams() {
        let mut league = test_league();
        league.num_teams = 0;
        let err = league.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "num_teams"));
    }

    #[test]
    fn validate_rejects_zero_budget() {
        let mut league = test_league();
        league.budget = 0;
        assert!(league.validate().is_err());
    }

    #[test]
    fn validate_rejects_il_only_roster() {
        let mut league = test_league();
        league.roster.clear();
        league.roster.insert("IL".into(), 5);
        assert!(league.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let text = r#"
            [league]
            num_teams = 10
            budget = 260

            [league.roster]
            C = 1
            OF = 3
            SP = 5
        "#;
        let file: LeagueFile = toml::from_str(text).unwrap();
        assert_eq!(file.league.num_teams, 10);
        assert_eq!(file.league.budget, 260);
        assert_eq!(file.league.roster_size(), 9);
    }
}
