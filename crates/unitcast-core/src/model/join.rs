// Restrict unit rows to the teams of one odds source.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::diagnostics::JoinDiagnostics;
use crate::error::ModelError;
use crate::position::Position;
use crate::records::{JoinedRow, OddsRecord, UnitRecord};

/// Result of the unit/odds join.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub rows: Vec<JoinedRow>,
    pub diagnostics: JoinDiagnostics,
}

/// Sorted distinct, non-empty odds source labels.
pub fn odds_sources(odds: &[OddsRecord]) -> Vec<String> {
    odds.iter()
        .map(|o| o.odds_source.trim())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The odds rows belonging to `source`.
pub fn select_source(odds: &[OddsRecord], source: &str) -> Vec<OddsRecord> {
    odds.iter()
        .filter(|o| o.odds_source.trim() == source)
        .cloned()
        .collect()
}

/// Inner-join units with the single-source odds slice on `team`.
///
/// Unit order is preserved. Teams without odds lose all their units; odds
/// rows without units contribute nothing. The odds slice must hold at most
/// one row per team.
pub fn join(units: &[UnitRecord], odds_for_source: &[OddsRecord]) -> Result<Joined, ModelError> {
    let mut by_team: BTreeMap<&str, Vec<&OddsRecord>> = BTreeMap::new();
    for record in odds_for_source {
        by_team.entry(record.team.as_str()).or_default().push(record);
    }
    if let Some((team, records)) = by_team.iter().find(|(_, records)| records.len() > 1) {
        return Err(ModelError::Cardinality {
            team: team.to_string(),
            odds_source: records[0].odds_source.clone(),
            count: records.len(),
        });
    }

    let rows: Vec<JoinedRow> = units
        .iter()
        .filter_map(|unit| {
            by_team.get(unit.team.as_str()).map(|records| JoinedRow {
                unit: unit.clone(),
                odds: records[0].clone(),
            })
        })
        .collect();

    let positions: BTreeSet<Position> = units.iter().map(|u| u.position).collect();
    let joined_teams: BTreeSet<&str> = rows.iter().map(|r| r.team()).collect();
    let diagnostics = JoinDiagnostics {
        teams_in_odds: by_team.len(),
        teams_after_join: joined_teams.len(),
        joined_rows: rows.len(),
        expected_rows: by_team.len() * positions.len(),
    };

    debug!(
        "joined {} unit rows to {} odds teams: {} rows for {} teams (expected {})",
        units.len(),
        diagnostics.teams_in_odds,
        diagnostics.joined_rows,
        diagnostics.teams_after_join,
        diagnostics.expected_rows
    );

    Ok(Joined { rows, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::odds;

    fn full_team(team: &str) -> Vec<UnitRecord> {
        Position::ALL
            .iter()
            .enumerate()
            .map(|(i, &p)| UnitRecord::new(team, p, 5.0 + i as f64))
            .collect()
    }

    fn sourced(team: &str, source: &str) -> OddsRecord {
        OddsRecord {
            odds_source: source.into(),
            ..odds(team, Some(3), 0.6, 0.3, 0.1)
        }
    }

    #[test]
    fn restricts_to_odds_teams() {
        let mut units = full_team("KC");
        units.extend(full_team("NYJ"));
        let joined = join(&units, &[odds("KC", Some(1), 0.0, 0.6, 0.3)]).unwrap();

        assert_eq!(joined.rows.len(), 6);
        assert!(joined.rows.iter().all(|r| r.team() == "KC"));
        assert_eq!(
            joined.diagnostics,
            JoinDiagnostics {
                teams_in_odds: 1,
                teams_after_join: 1,
                joined_rows: 6,
                expected_rows: 6,
            }
        );
    }

    #[test]
    fn preserves_unit_order() {
        let mut units = full_team("BUF");
        units.extend(full_team("KC"));
        let joined = join(
            &units,
            &[odds("KC", Some(1), 0.0, 0.6, 0.3), odds("BUF", Some(2), 0.7, 0.4, 0.2)],
        )
        .unwrap();
        let order: Vec<(&str, Position)> = joined.rows.iter().map(|r| (r.team(), r.position())).collect();
        let expected: Vec<(&str, Position)> = units.iter().map(|u| (u.team.as_str(), u.position)).collect();
        assert_eq!(order, expected);
        assert_eq!(joined.rows[0].odds.team, "BUF");
        assert_eq!(joined.rows[6].odds.team, "KC");
    }

    #[test]
    fn odds_team_without_units_counted() {
        let units = full_team("KC");
        let joined = join(
            &units,
            &[odds("KC", Some(1), 0.0, 0.6, 0.3), odds("DET", Some(1), 0.0, 0.7, 0.4)],
        )
        .unwrap();
        assert_eq!(joined.rows.len(), 6);
        assert_eq!(joined.diagnostics.teams_in_odds, 2);
        assert_eq!(joined.diagnostics.teams_after_join, 1);
        assert_eq!(joined.diagnostics.expected_rows, 12);
        assert!(!joined.diagnostics.is_complete());
    }

    #[test]
    fn duplicate_team_in_slice_is_cardinality_error() {
        let units = full_team("KC");
        let err = join(
            &units,
            &[sourced("KC", "Fanduel"), sourced("KC", "Fanduel")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::Cardinality {
                team: "KC".into(),
                odds_source: "Fanduel".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn sources_sorted_and_distinct() {
        let rows = vec![
            sourced("KC", "Fanduel"),
            sourced("KC", "DraftKings"),
            sourced("BUF", "Fanduel"),
            sourced("BUF", "  "),
        ];
        assert_eq!(odds_sources(&rows), vec!["DraftKings", "Fanduel"]);
    }

    #[test]
    fn select_source_filters() {
        let rows = vec![
            sourced("KC", "Fanduel"),
            sourced("KC", "DraftKings"),
            sourced("BUF", "Fanduel"),
        ];
        let slice = select_source(&rows, "Fanduel");
        assert_eq!(slice.len(), 2);
        assert!(slice.iter().all(|o| o.odds_source == "Fanduel"));
        assert!(select_source(&rows, "Caesars").is_empty());
    }

    #[test]
    fn empty_inputs_join_to_nothing() {
        let joined = join(&[], &[]).unwrap();
        assert!(joined.rows.is_empty());
        assert_eq!(joined.diagnostics, JoinDiagnostics::default());
    }
}
