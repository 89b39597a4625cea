// Competition ranking within position groups and across all units.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::baseline::Baseline;
use super::{DerivedRow, Metric};
use crate::error::ModelError;
use crate::position::Position;

/// Direction in which values are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Rank columns attached to each unit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankColumn {
    /// Expected points within the position group.
    Position,
    /// Regular-season PPG within the position group.
    Ppg,
    /// Expected games within the position group.
    ExpectedGames,
    /// Deviation from the position baseline, across every unit.
    Overall(Baseline),
}

impl RankColumn {
    pub fn column_name(&self) -> String {
        match self {
            RankColumn::Position => "position_rank".to_string(),
            RankColumn::Ppg => "ppg_rank".to_string(),
            RankColumn::ExpectedGames => "exp_games_rank".to_string(),
            RankColumn::Overall(baseline) => format!("overall_rank_{}", baseline.key()),
        }
    }
}

/// NaN sorts after every number whichever the direction.
fn compare(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        }
    }
}

/// Competition ("1224") ranking.
///
/// Equal values share the best rank of their run; the next distinct value is
/// ranked `1 + number of strictly better values`, leaving a gap after ties.
pub fn competition_rank(values: &[f64], order: SortOrder) -> Vec<u32> {
    let mut sorted: Vec<usize> = (0..values.len()).collect();
    sorted.sort_by(|&a, &b| compare(values[a], values[b], order));

    let mut ranks = vec![0u32; values.len()];
    let mut previous: Option<f64> = None;
    let mut current = 0u32;
    for (place, &idx) in sorted.iter().enumerate() {
        let value = values[idx];
        if previous.map_or(true, |p| p != value) {
            current = place as u32 + 1;
        }
        ranks[idx] = current;
        previous = Some(value);
    }
    ranks
}

/// Rank `metric` descending within each position group and store it under
/// `column`.
pub fn add_position_rank(
    rows: &mut [DerivedRow],
    metric: Metric,
    column: RankColumn,
) -> Result<(), ModelError> {
    let mut groups: BTreeMap<Position, (Vec<usize>, Vec<f64>)> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let value = row.require(metric)?;
        let (indices, values) = groups.entry(row.position()).or_default();
        indices.push(idx);
        values.push(value);
    }

    for (indices, values) in groups.values() {
        let ranks = competition_rank(values, SortOrder::Descending);
        for (&idx, rank) in indices.iter().zip(ranks) {
            rows[idx].ranks.insert(column, rank);
        }
    }

    debug!(
        "{} computed from {} across {} position groups",
        column.column_name(),
        metric.column_name(),
        groups.len()
    );
    Ok(())
}

/// Rank every row by its deviation from the `baseline` of `metric`,
/// descending, across the whole row set.
///
/// Call this on the full table only; filtered views reuse these ranks.
pub fn add_overall_rank(
    rows: &mut [DerivedRow],
    metric: Metric,
    baseline: Baseline,
) -> Result<(), ModelError> {
    let deltas = rows
        .iter()
        .map(|row| {
            row.baseline(metric, baseline)
                .map(|cols| cols.delta)
                .ok_or_else(|| {
                    ModelError::missing(
                        baseline.delta_column(metric),
                        "call add_position_baseline() first",
                    )
                })
        })
        .collect::<Result<Vec<f64>, ModelError>>()?;

    let column = RankColumn::Overall(baseline);
    for (row, rank) in rows.iter_mut().zip(competition_rank(&deltas, SortOrder::Descending)) {
        row.ranks.insert(column, rank);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::baseline::add_position_baseline;
    use crate::model::fixtures::with_points;

    #[test]
    fn ties_leave_gaps() {
        assert_eq!(
            competition_rank(&[10.0, 10.0, 8.0], SortOrder::Descending),
            vec![1, 1, 3]
        );
    }

    #[test]
    fn ties_in_the_middle() {
        assert_eq!(
            competition_rank(&[5.0, 9.0, 7.0, 7.0, 1.0], SortOrder::Descending),
            vec![4, 1, 2, 2, 5]
        );
    }

    #[test]
    fn ascending_order() {
        assert_eq!(
            competition_rank(&[3.0, 1.0, 2.0, 1.0], SortOrder::Ascending),
            vec![4, 1, 3, 1]
        );
    }

    #[test]
    fn nan_ranks_last() {
        let ranks = competition_rank(&[f64::NAN, 2.0, 4.0], SortOrder::Descending);
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[test]
    fn empty_input() {
        assert!(competition_rank(&[], SortOrder::Descending).is_empty());
    }

    #[test]
    fn negative_and_zero_values() {
        assert_eq!(
            competition_rank(&[-1.5, 0.0, -0.0, 2.0], SortOrder::Descending),
            vec![4, 2, 2, 1]
        );
    }

    #[test]
    fn position_rank_is_per_group() {
        let mut rows = vec![
            with_points("KC", Position::Quarterback, 30.0),
            with_points("BUF", Position::Quarterback, 40.0),
            with_points("KC", Position::Kicker, 12.0),
            with_points("BUF", Position::Kicker, 12.0),
            with_points("DET", Position::Kicker, 10.0),
        ];
        add_position_rank(&mut rows, Metric::ExpectedPoints, RankColumn::Position).unwrap();
        let ranks: Vec<u32> = rows
            .iter()
            .map(|r| r.rank(RankColumn::Position).unwrap())
            .collect();
        assert_eq!(ranks, vec![2, 1, 1, 1, 3]);
    }

    #[test]
    fn overall_rank_requires_baseline() {
        let mut rows = vec![with_points("KC", Position::Quarterback, 30.0)];
        let err = add_overall_rank(&mut rows, Metric::ExpectedPoints, Baseline::Minimum).unwrap_err();
        match err {
            ModelError::MissingColumn { column, .. } => {
                assert_eq!(column, "value_vs_position_min_expected_points")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overall_rank_spans_positions() {
        let mut rows = vec![
            with_points("KC", Position::Quarterback, 30.0),
            with_points("BUF", Position::Quarterback, 40.0),
            with_points("KC", Position::Kicker, 12.0),
            with_points("BUF", Position::Kicker, 10.0),
        ];
        add_position_baseline(&mut rows, Metric::ExpectedPoints, Baseline::Minimum).unwrap();
        add_overall_rank(&mut rows, Metric::ExpectedPoints, Baseline::Minimum).unwrap();
        let ranks: Vec<u32> = rows
            .iter()
            .map(|r| r.rank(RankColumn::Overall(Baseline::Minimum)).unwrap())
            .collect();
        // Deltas: 0, 10, 2, 0.
        assert_eq!(ranks, vec![3, 1, 2, 3]);
    }

    #[test]
    fn rank_column_names() {
        assert_eq!(RankColumn::Position.column_name(), "position_rank");
        assert_eq!(RankColumn::Ppg.column_name(), "ppg_rank");
        assert_eq!(
            RankColumn::Overall(Baseline::Average).column_name(),
            "overall_rank_avg"
        );
    }
}
