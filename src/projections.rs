// Projection data loading.
//
// Reads projection-vendor CSV exports (Steamer, ZiPS, ATC and friends all use
// slightly different column spellings) into `ProjectionPlayer` records. Names
// are kept raw here: normalization happens in the matcher, never in storage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player row in a statistical projection system.
///
/// Two rows may legitimately share a name (a star and an unrelated minor
/// leaguer); nothing in this crate ever merges rows by name alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPlayer {
    /// The projection system's internal id, unique within one vendor file.
    pub id: String,
    /// Cross-platform (MLB-wide) player id, shared with `ScrapedPlayer`.
    pub mlb_id: Option<u64>,
    pub name: String,
    pub team: String,
    pub positions: Vec<String>,
    /// Pre-computed auction dollar value. $1 marks replacement-level and
    /// minor-league entries.
    pub projected_value: f64,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One vendor CSV row. Aliases absorb the common column spellings; extra
/// vendor columns are ignored via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawProjectionRow {
    #[serde(alias = "Id", alias = "PlayerId")]
    ID: String,
    #[serde(default, alias = "MLBID", alias = "MlbId")]
    MLBAMID: Option<u64>,
    Name: String,
    #[serde(default, alias = "Tm")]
    Team: String,
    #[serde(default, alias = "Pos", alias = "Positions")]
    POS: String,
    #[serde(alias = "Value", alias = "Dollars", alias = "$")]
    VAL: f64,
    /// Absorb whatever other columns the vendor includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<ProjectionPlayer>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawProjectionRow>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim().to_string();
                if name.is_empty() {
                    warn!("skipping projection row with empty name (id {})", raw.ID);
                    continue;
                }
                if !raw.VAL.is_finite() {
                    warn!("skipping projection '{}': non-finite dollar value", name);
                    continue;
                }
                players.push(ProjectionPlayer {
                    id: raw.ID.trim().to_string(),
                    mlb_id: raw.MLBAMID,
                    name,
                    team: raw.Team.trim().to_string(),
                    positions: raw
                        .POS
                        .split('/')
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty())
                        .collect(),
                    projected_value: raw.VAL,
                });
            }
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
            }
        }
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load one projection system's players from a CSV file.
pub fn load_projections(path: &Path) -> Result<Vec<ProjectionPlayer>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if players.is_empty() {
        return Err(ProjectionError::Validation(
            "projection CSV produced zero valid rows".into(),
        ));
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_csv_round_trip() {
        let csv_data = "\
ID,MLBAMID,Name,Team,POS,VAL
s-1001,545361,Mike Trout,LAA,OF,50.0
s-1002,,Juan Soto,NYM,OF/DH,42.5";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);

        assert_eq!(players[0].id, "s-1001");
        assert_eq!(players[0].mlb_id, Some(545361));
        assert_eq!(players[0].name, "Mike Trout");
        assert_eq!(players[0].positions, vec!["OF"]);
        assert!((players[0].projected_value - 50.0).abs() < f64::EPSILON);

        assert_eq!(players[1].mlb_id, None);
        assert_eq!(players[1].positions, vec!["OF", "DH"]);
    }

    #[test]
    fn value_column_aliases() {
        for header in ["Value", "Dollars", "$"] {
            let csv_data = format!(
                "ID,Name,Team,POS,{header}\ns-1,Mike Trout,LAA,OF,50.0"
            );
            let players = load_from_reader(csv_data.as_bytes()).unwrap();
            assert!(
                (players[0].projected_value - 50.0).abs() < f64::EPSILON,
                "alias {header} not honored"
            );
        }
    }

    #[test]
    fn extra_vendor_columns_ignored() {
        let csv_data = "\
ID,Name,Team,POS,VAL,wOBA,WAR,ADP
s-1,Mike Trout,LAA,OF,50.0,0.410,8.2,3.5";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Mike Trout");
    }

    #[test]
    fn duplicate_names_are_both_kept() {
        // A star and an unrelated minor leaguer may share a name.
        let csv_data = "\
ID,Name,Team,POS,VAL
s-1,Juan Soto,NYM,OF,42.0
s-2,Juan Soto,FA,RP,1.0";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_ne!(players[0].id, players[1].id);
    }

    #[test]
    fn malformed_rows_skipped() {
        let csv_data = "\
ID,Name,Team,POS,VAL
s-1,Valid Player,NYY,1B,12.0
s-2,Bad Value,NYY,1B,not_a_number
s-3,Another Valid,BOS,2B,8.0";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Valid Player");
        assert_eq!(players[1].name, "Another Valid");
    }

    #[test]
    fn non_finite_value_skipped() {
        let csv_data = "\
ID,Name,Team,POS,VAL
s-1,Valid Player,NYY,1B,12.0
s-2,NaN Player,NYY,1B,NaN";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
    }

    #[test]
    fn empty_name_skipped() {
        let csv_data = "\
ID,Name,Team,POS,VAL
s-1,  ,NYY,1B,12.0";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn names_and_teams_trimmed() {
        let csv_data = "\
ID,Name,Team,POS,VAL
s-1,  Mike Trout  , LAA ,OF,50.0";

        let players = load_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players[0].name, "Mike Trout");
        assert_eq!(players[0].team, "LAA");
    }
}
