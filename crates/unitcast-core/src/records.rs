// Typed input records and the helpers that canonicalize their noisy fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::position::Position;

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// Regular-season scoring rate for one (team, position) unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub team: String,
    pub position: Position,
    /// Regular-season fantasy points per game.
    pub reg_ppg: f64,
}

impl UnitRecord {
    pub fn new(team: impl Into<String>, position: Position, reg_ppg: f64) -> Self {
        UnitRecord {
            team: team.into().trim().to_string(),
            position,
            reg_ppg,
        }
    }
}

/// Playoff round-win probabilities for one team from one odds source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRecord {
    pub team: String,
    pub odds_source: String,
    /// Playoff seed, if one could be parsed. Seed 1 means a first-round bye.
    pub seed: Option<u32>,
    pub win_wc: f64,
    pub win_div: f64,
    pub win_conf: f64,
}

impl OddsRecord {
    /// Whether the team skips the Wild Card round.
    pub fn is_bye(&self) -> bool {
        self.seed == Some(1)
    }

    /// The round probabilities plus bye flag, as consumed by the calculators.
    pub fn round_odds(&self) -> RoundOdds {
        RoundOdds {
            win_wc: self.win_wc,
            win_div: self.win_div,
            win_conf: self.win_conf,
            is_bye: self.is_bye(),
        }
    }
}

/// Marginal round-win probabilities and the bye flag for a single team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOdds {
    pub win_wc: f64,
    pub win_div: f64,
    pub win_conf: f64,
    pub is_bye: bool,
}

impl RoundOdds {
    /// Whether the survival probabilities are non-increasing round over round.
    ///
    /// For bye teams the Wild Card probability is not part of the path and is
    /// not checked.
    pub fn is_monotonic(&self) -> bool {
        if self.is_bye {
            self.win_div >= self.win_conf
        } else {
            self.win_wc >= self.win_div && self.win_div >= self.win_conf
        }
    }
}

/// A unit row joined with its team's odds for the selected source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub unit: UnitRecord,
    pub odds: OddsRecord,
}

impl JoinedRow {
    pub fn team(&self) -> &str {
        &self.unit.team
    }

    pub fn position(&self) -> Position {
        self.unit.position
    }
}

// ---------------------------------------------------------------------------
// Display metadata
// ---------------------------------------------------------------------------

/// Display name and colours for a team, keyed by abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMeta {
    pub abbr: String,
    pub name: String,
    /// Primary colour as a hex string, e.g. `#E31837`.
    pub color: String,
    pub color2: String,
}

/// Lookup of team display metadata by abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMetadata {
    by_abbr: BTreeMap<String, TeamMeta>,
}

impl TeamMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `meta.abbr`.
    pub fn insert(&mut self, meta: TeamMeta) {
        self.by_abbr.insert(meta.abbr.clone(), meta);
    }

    pub fn get(&self, abbr: &str) -> Option<&TeamMeta> {
        self.by_abbr.get(abbr.trim())
    }

    pub fn len(&self) -> usize {
        self.by_abbr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_abbr.is_empty()
    }
}

impl FromIterator<TeamMeta> for TeamMetadata {
    fn from_iter<I: IntoIterator<Item = TeamMeta>>(iter: I) -> Self {
        let mut metadata = TeamMetadata::new();
        for meta in iter {
            metadata.insert(meta);
        }
        metadata
    }
}

// ---------------------------------------------------------------------------
// Field canonicalization
// ---------------------------------------------------------------------------

/// Extract the first run of ASCII digits from a noisy seed field.
///
/// `"1"`, `"1.0"` and `" #1 seed"` all yield `Some(1)`. Fields without any
/// digits (or with a digit run too large for `u32`) yield `None`, which the
/// model treats as "no bye".
pub fn parse_seed(raw: &str) -> Option<u32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Coerce a probability field to `f64`. Empty, non-numeric and non-finite
/// values become 0.0.
pub fn coerce_probability(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(seed: Option<u32>, wc: f64, div: f64, conf: f64) -> OddsRecord {
        OddsRecord {
            team: "KC".into(),
            odds_source: "Fanduel".into(),
            seed,
            win_wc: wc,
            win_div: div,
            win_conf: conf,
        }
    }

    #[test]
    fn seed_plain_integer() {
        assert_eq!(parse_seed("1"), Some(1));
        assert_eq!(parse_seed("7"), Some(7));
    }

    #[test]
    fn seed_float_text_takes_integer_part() {
        assert_eq!(parse_seed("1.0"), Some(1));
        assert_eq!(parse_seed("12.0"), Some(12));
    }

    #[test]
    fn seed_noisy_text() {
        assert_eq!(parse_seed(" #1 seed"), Some(1));
        assert_eq!(parse_seed("Seed 3 (WC)"), Some(3));
    }

    #[test]
    fn seed_without_digits_is_none() {
        assert_eq!(parse_seed(""), None);
        assert_eq!(parse_seed("n/a"), None);
        assert_eq!(parse_seed("   "), None);
    }

    #[test]
    fn seed_overflow_is_none() {
        assert_eq!(parse_seed("99999999999999999999"), None);
    }

    #[test]
    fn probability_coercion() {
        assert!((coerce_probability(" 0.45 ") - 0.45).abs() < f64::EPSILON);
        assert_eq!(coerce_probability(""), 0.0);
        assert_eq!(coerce_probability("45%"), 0.0);
        assert_eq!(coerce_probability("NaN"), 0.0);
        assert_eq!(coerce_probability("inf"), 0.0);
    }

    #[test]
    fn bye_only_for_first_seed() {
        assert!(odds(Some(1), 0.0, 0.6, 0.3).is_bye());
        assert!(!odds(Some(2), 0.5, 0.2, 0.1).is_bye());
        assert!(!odds(None, 0.5, 0.2, 0.1).is_bye());
    }

    #[test]
    fn monotonic_check_ignores_wc_for_bye() {
        // win_wc below win_div would be a violation for a non-bye team.
        assert!(odds(Some(1), 0.0, 0.6, 0.3).round_odds().is_monotonic());
        assert!(!odds(Some(4), 0.0, 0.6, 0.3).round_odds().is_monotonic());
        assert!(!odds(Some(1), 1.0, 0.3, 0.6).round_odds().is_monotonic());
    }

    #[test]
    fn metadata_lookup_trims_key() {
        let meta: TeamMetadata = vec![TeamMeta {
            abbr: "KC".into(),
            name: "Kansas City Chiefs".into(),
            color: "#E31837".into(),
            color2: "#FFB612".into(),
        }]
        .into_iter()
        .collect();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get(" KC ").map(|m| m.name.as_str()), Some("Kansas City Chiefs"));
        assert!(meta.get("BUF").is_none());
    }
}
