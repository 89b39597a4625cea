// Read-only views over a built unit table: the globally ranked table with
// row filters, and per-position chart series.
//
// Views never recompute ranks. Filtering hides rows of the full table and
// leaves the surviving rows' ranks untouched.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::baseline::Baseline;
use super::build::UnitMetrics;
use super::Metric;
use crate::position::Position;

/// Row filter over the unit table. An empty set means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    pub teams: BTreeSet<String>,
    pub positions: BTreeSet<Position>,
}

impl UnitFilter {
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.teams.insert(team.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.insert(position);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.positions.is_empty()
    }

    pub fn matches(&self, unit: &UnitMetrics) -> bool {
        (self.teams.is_empty() || self.teams.contains(&unit.team))
            && (self.positions.is_empty() || self.positions.contains(&unit.position))
    }
}

/// The unit table ordered by overall rank for `baseline` (then position,
/// then team), with `filter` applied afterwards.
pub fn rank_view<'a>(
    units: &'a [UnitMetrics],
    baseline: Baseline,
    filter: &UnitFilter,
) -> Vec<&'a UnitMetrics> {
    let mut ordered: Vec<&UnitMetrics> = units.iter().collect();
    ordered.sort_by(|a, b| {
        a.overall_rank(baseline)
            .cmp(&b.overall_rank(baseline))
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.team.cmp(&b.team))
    });
    ordered.retain(|u| filter.matches(u));
    ordered
}

/// Units of one position for a bar chart, plus the reference mean.
#[derive(Debug, Clone)]
pub struct PositionSeries<'a> {
    pub position: Position,
    pub metric: Metric,
    /// Sorted descending by `metric`.
    pub rows: Vec<&'a UnitMetrics>,
    /// Mean of `metric` over `rows`; `None` when the position has no rows.
    pub mean: Option<f64>,
}

pub fn position_series(units: &[UnitMetrics], position: Position, metric: Metric) -> PositionSeries<'_> {
    let mut rows: Vec<&UnitMetrics> = units.iter().filter(|u| u.position == position).collect();
    rows.sort_by(|a, b| {
        b.metric(metric)
            .partial_cmp(&a.metric(metric))
            .unwrap_or(Ordering::Equal)
    });
    let mean = if rows.is_empty() {
        None
    } else {
        Some(rows.iter().map(|u| u.metric(metric)).sum::<f64>() / rows.len() as f64)
    };
    PositionSeries {
        position,
        metric,
        rows,
        mean,
    }
}

/// Positions present in the table, in display order.
pub fn present_positions(units: &[UnitMetrics]) -> Vec<Position> {
    let present: BTreeSet<Position> = units.iter().map(|u| u.position).collect();
    present.into_iter().collect()
}

/// Distinct teams in the table, sorted.
pub fn teams(units: &[UnitMetrics]) -> Vec<String> {
    let distinct: BTreeSet<&str> = units.iter().map(|u| u.team.as_str()).collect();
    distinct.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::ModelBuilder;
    use crate::records::{OddsRecord, UnitRecord};

    fn model_units() -> Vec<UnitMetrics> {
        let mut units = Vec::new();
        for (team, qb, k) in [("BUF", 25.0, 9.0), ("DET", 20.0, 10.0), ("GB", 24.0, 10.0)] {
            units.push(UnitRecord::new(team, Position::Quarterback, qb));
            units.push(UnitRecord::new(team, Position::Kicker, k));
        }
        let odds = vec![
            OddsRecord {
                team: "BUF".into(),
                odds_source: "Fanduel".into(),
                seed: Some(2),
                win_wc: 0.7,
                win_div: 0.4,
                win_conf: 0.2,
            },
            OddsRecord {
                team: "DET".into(),
                odds_source: "Fanduel".into(),
                seed: Some(1),
                win_wc: 0.0,
                win_div: 0.6,
                win_conf: 0.3,
            },
            OddsRecord {
                team: "GB".into(),
                odds_source: "Fanduel".into(),
                seed: Some(7),
                win_wc: 0.5,
                win_div: 0.2,
                win_conf: 0.05,
            },
        ];
        ModelBuilder::new(&units, &odds).build("Fanduel").unwrap().units
    }

    #[test]
    fn view_is_ordered_by_overall_rank() {
        let units = model_units();
        for baseline in Baseline::ALL {
            let view = rank_view(&units, baseline, &UnitFilter::default());
            assert_eq!(view.len(), units.len());
            let ranks: Vec<u32> = view.iter().map(|u| u.overall_rank(baseline)).collect();
            let mut sorted = ranks.clone();
            sorted.sort();
            assert_eq!(ranks, sorted);
        }
    }

    #[test]
    fn filtering_keeps_global_ranks() {
        let units = model_units();
        let full = rank_view(&units, Baseline::Average, &UnitFilter::default());
        let filter = UnitFilter::default().with_position(Position::Kicker);
        let filtered = rank_view(&units, Baseline::Average, &filter);

        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|u| u.position == Position::Kicker));
        for unit in &filtered {
            let original = full
                .iter()
                .find(|f| f.team == unit.team && f.position == unit.position)
                .unwrap();
            assert_eq!(unit.overall_rank_avg, original.overall_rank_avg);
        }
        // Ranks of a filtered view need not start at 1.
        assert!(filtered.iter().all(|u| u.overall_rank_avg >= 1));
    }

    #[test]
    fn team_and_position_filters_combine() {
        let units = model_units();
        let filter = UnitFilter::default()
            .with_team("GB")
            .with_team("DET")
            .with_position(Position::Quarterback);
        let view = rank_view(&units, Baseline::Minimum, &filter);
        let labels: BTreeSet<String> = view.iter().map(|u| u.unit_label()).collect();
        assert_eq!(
            labels,
            BTreeSet::from(["DET QB".to_string(), "GB QB".to_string()])
        );
    }

    #[test]
    fn filter_emptiness() {
        assert!(UnitFilter::default().is_empty());
        assert!(!UnitFilter::default().with_team("KC").is_empty());
    }

    #[test]
    fn series_sorted_with_mean() {
        let units = model_units();
        let series = position_series(&units, Position::Quarterback, Metric::RegPpg);
        let teams: Vec<&str> = series.rows.iter().map(|u| u.team.as_str()).collect();
        assert_eq!(teams, vec!["BUF", "GB", "DET"]);
        assert!((series.mean.unwrap() - 23.0).abs() < 1e-9);

        let empty = position_series(&units, Position::TightEnd, Metric::RegPpg);
        assert!(empty.rows.is_empty());
        assert!(empty.mean.is_none());
    }

    #[test]
    fn present_positions_and_teams() {
        let units = model_units();
        assert_eq!(
            present_positions(&units),
            vec![Position::Quarterback, Position::Kicker]
        );
        assert_eq!(teams(&units), vec!["BUF", "DET", "GB"]);
    }
}
