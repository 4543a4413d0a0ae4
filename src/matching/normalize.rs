// Identity field normalization.
//
// The auction site and the projection vendors spell names, teams, and
// positions differently ("J.T. Realmuto" vs "JT Realmuto", "CWS" vs "CHA",
// "LF" vs "OF"). Every comparison in the matcher runs on the canonical forms
// produced here, so all the spelling knowledge lives in one place.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The auction site's minor-league marker tag. It is not a playing position:
/// it is filtered out of position-type checks, but its presence on a scraped
/// player hard-disqualifies any match against an MLB projection.
pub const MINOR_LEAGUE_MARKER: &str = "NA";

/// Canonical code for an unsigned/free-agent player. Gets lenient treatment
/// in team scoring since rosters move under recently traded players.
pub const FREE_AGENT: &str = "FA";

/// Generational suffixes stripped for the softer name comparison.
const GENERATIONAL_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Canonicalize a free-text player name.
///
/// NFD-decomposes and drops combining marks (so "Félix" -> "Felix"),
/// lowercases, strips everything that is not a letter or a space (periods in
/// initials vanish without leaving a gap: "J.T." -> "jt"), collapses
/// whitespace, and trims. Idempotent: normalizing a normalized name is a
/// no-op.
pub fn normalize_name(raw: &str) -> String {
    let stripped: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a trailing generational suffix ("jr", "iii", ...) from an already
/// normalized name. Returns the input unchanged when no suffix is present.
pub fn strip_generational_suffix(normalized: &str) -> String {
    if let Some((head, last)) = normalized.rsplit_once(' ') {
        if GENERATIONAL_SUFFIXES.contains(&last) {
            return head.to_string();
        }
    }
    normalized.to_string()
}

// ---------------------------------------------------------------------------
// Team normalization
// ---------------------------------------------------------------------------

/// Canonicalize a team abbreviation.
///
/// Uppercases, then folds known alternate spellings onto one canonical code.
/// Unknown codes pass through uppercased so a new expansion team does not
/// silently break matching.
pub fn normalize_team(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "CWS" | "CHA" => "CHW".to_string(),
        "ARZ" | "AZ" => "ARI".to_string(),
        "WAS" | "WSN" => "WSH".to_string(),
        "KCR" => "KC".to_string(),
        "SDP" => "SD".to_string(),
        "SFG" => "SF".to_string(),
        "TBR" | "TAM" => "TB".to_string(),
        "ANA" => "LAA".to_string(),
        "NYN" => "NYM".to_string(),
        "NYA" => "NYY".to_string(),
        _ => upper,
    }
}

// ---------------------------------------------------------------------------
// Position normalization
// ---------------------------------------------------------------------------

/// Canonicalize a position code: outfield sub-positions collapse to "OF",
/// DH/UTIL synonyms collapse to "DH", everything else passes through
/// uppercased (infield and pitcher codes are already canonical).
pub fn normalize_position(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "LF" | "CF" | "RF" => "OF".to_string(),
        "UTIL" | "UT" | "U" => "DH".to_string(),
        _ => upper,
    }
}

/// Whether a (normalized) position code is a pitching position.
pub fn is_pitcher_position(code: &str) -> bool {
    matches!(code, "SP" | "RP" | "P" | "CL")
}

/// Whether a raw position tag is the minor-league marker.
pub fn is_minor_league_marker(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(MINOR_LEAGUE_MARKER)
}

// ---------------------------------------------------------------------------
// Player type classification
// ---------------------------------------------------------------------------

/// Pitcher/hitter classification derived from playing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerType {
    Pitcher,
    Hitter,
    /// No playing positions listed (marker-only or empty).
    Unknown,
}

/// Classify a raw position list as pitcher or hitter.
///
/// The minor-league marker is excluded first; any pitching code among the
/// remaining playing positions makes the player a pitcher, any remaining
/// offensive code makes them a hitter.
pub fn classify_player_type(raw_positions: &[String]) -> PlayerType {
    let mut saw_playing_position = false;
    for raw in raw_positions {
        if is_minor_league_marker(raw) {
            continue;
        }
        let code = normalize_position(raw);
        if code.is_empty() {
            continue;
        }
        if is_pitcher_position(&code) {
            return PlayerType::Pitcher;
        }
        saw_playing_position = true;
    }
    if saw_playing_position {
        PlayerType::Hitter
    } else {
        PlayerType::Unknown
    }
}

/// Normalized playing positions, marker and empties removed.
pub fn playing_positions(raw_positions: &[String]) -> Vec<String> {
    raw_positions
        .iter()
        .filter(|p| !is_minor_league_marker(p))
        .map(|p| normalize_position(p))
        .filter(|p| !p.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
