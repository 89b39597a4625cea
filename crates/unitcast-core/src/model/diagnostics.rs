// Non-fatal data-quality findings reported alongside a build.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

use super::distribution::PlayoffDistribution;
use crate::position::Position;
use crate::records::{OddsRecord, UnitRecord};

/// A data-quality issue that does not stop the build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// A playoff-games probability mass came out below zero.
    NegativeMass {
        team: String,
        outcome: String,
        value: f64,
    },
    /// Round-win probabilities increase from one round to the next.
    NonMonotonicOdds {
        team: String,
        win_wc: f64,
        win_div: f64,
        win_conf: f64,
        is_bye: bool,
    },
    /// Team has odds for the selected source but no unit rows.
    TeamMissingUnits { team: String },
    /// Team has unit rows but no odds for the selected source.
    TeamMissingOdds { team: String },
    /// Joined team covers fewer positions than the unit table does.
    IncompletePositions {
        team: String,
        present: usize,
        expected: usize,
    },
    /// The requested odds source does not exist; another one was used.
    UnknownSource { requested: String, resolved: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::NegativeMass {
                team,
                outcome,
                value,
            } => write!(f, "{team}: negative probability for {outcome} ({value:.4})"),
            DataQualityWarning::NonMonotonicOdds {
                team,
                win_wc,
                win_div,
                win_conf,
                is_bye,
            } => {
                if *is_bye {
                    write!(f, "{team}: win_div {win_div} < win_conf {win_conf} (bye)")
                } else {
                    write!(
                        f,
                        "{team}: round odds not non-increasing (wc {win_wc}, div {win_div}, conf {win_conf})"
                    )
                }
            }
            DataQualityWarning::TeamMissingUnits { team } => {
                write!(f, "{team}: in odds but has no unit rows")
            }
            DataQualityWarning::TeamMissingOdds { team } => {
                write!(f, "{team}: has unit rows but no odds for the selected source")
            }
            DataQualityWarning::IncompletePositions {
                team,
                present,
                expected,
            } => write!(f, "{team}: {present} of {expected} positions present"),
            DataQualityWarning::UnknownSource {
                requested,
                resolved,
            } => write!(f, "odds source '{requested}' not found; using '{resolved}'"),
        }
    }
}

/// Row and team counts around the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinDiagnostics {
    /// Distinct teams in the selected odds slice.
    pub teams_in_odds: usize,
    /// Distinct teams left after the inner join.
    pub teams_after_join: usize,
    pub joined_rows: usize,
    /// `teams_in_odds × positions in the unit table`.
    pub expected_rows: usize,
}

impl JoinDiagnostics {
    /// Whether the joined row count is the expected exact multiple.
    pub fn is_complete(&self) -> bool {
        self.joined_rows == self.expected_rows && self.teams_in_odds == self.teams_after_join
    }
}

/// Everything a build reports besides its tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub join: JoinDiagnostics,
    pub warnings: Vec<DataQualityWarning>,
}

impl Diagnostics {
    /// Record a warning and emit it as a log event.
    pub fn push(&mut self, warning: DataQualityWarning) {
        warn!("data quality: {}", warning);
        self.warnings.push(warning);
    }

    pub fn extend<I: IntoIterator<Item = DataQualityWarning>>(&mut self, warnings: I) {
        for warning in warnings {
            self.push(warning);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Flag teams whose round-win probabilities are not non-increasing.
pub fn check_monotonic(odds_for_source: &[OddsRecord]) -> Vec<DataQualityWarning> {
    odds_for_source
        .iter()
        .filter(|o| !o.round_odds().is_monotonic())
        .map(|o| DataQualityWarning::NonMonotonicOdds {
            team: o.team.clone(),
            win_wc: o.win_wc,
            win_div: o.win_div,
            win_conf: o.win_conf,
            is_bye: o.is_bye(),
        })
        .collect()
}

/// Flag teams present on one side of the join only, and joined teams with
/// partial position coverage.
pub fn check_coverage(
    units: &[UnitRecord],
    odds_for_source: &[OddsRecord],
) -> Vec<DataQualityWarning> {
    let mut positions_by_team: BTreeMap<&str, BTreeSet<Position>> = BTreeMap::new();
    for unit in units {
        positions_by_team
            .entry(unit.team.as_str())
            .or_default()
            .insert(unit.position);
    }
    let all_positions: BTreeSet<Position> = units.iter().map(|u| u.position).collect();
    let odds_teams: BTreeSet<&str> = odds_for_source.iter().map(|o| o.team.as_str()).collect();

    let mut warnings = Vec::new();
    for team in &odds_teams {
        match positions_by_team.get(team) {
            None => warnings.push(DataQualityWarning::TeamMissingUnits {
                team: team.to_string(),
            }),
            Some(present) if present.len() < all_positions.len() => {
                warnings.push(DataQualityWarning::IncompletePositions {
                    team: team.to_string(),
                    present: present.len(),
                    expected: all_positions.len(),
                })
            }
            Some(_) => {}
        }
    }
    for team in positions_by_team.keys() {
        if !odds_teams.contains(team) {
            warnings.push(DataQualityWarning::TeamMissingOdds {
                team: team.to_string(),
            });
        }
    }
    warnings
}

/// Flag negative probability masses in a team's distribution.
pub fn check_masses(team: &str, dist: &PlayoffDistribution) -> Vec<DataQualityWarning> {
    dist.masses()
        .into_iter()
        .filter(|(_, value)| *value < 0.0)
        .map(|(outcome, value)| DataQualityWarning::NegativeMass {
            team: team.to_string(),
            outcome: outcome.to_string(),
            value,
        })
        .collect()
}
