// Position baselines: group average and minimum of a metric, broadcast to
// each unit, and the unit's deviation from it.
//
// Average and minimum are two settings of the same aggregation. Deviation
// from the minimum is never negative; deviation from the average is signed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{DerivedRow, Metric};
use crate::error::ModelError;
use crate::position::Position;

/// Reference level a unit is compared against within its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Baseline {
    #[serde(rename = "avg")]
    Average,
    #[serde(rename = "min")]
    Minimum,
}

impl Baseline {
    pub const ALL: [Baseline; 2] = [Baseline::Average, Baseline::Minimum];

    /// Short key used in column names and config (`avg` / `min`).
    pub fn key(&self) -> &'static str {
        match self {
            Baseline::Average => "avg",
            Baseline::Minimum => "min",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Baseline::Average => "Average",
            Baseline::Minimum => "Minimum",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "avg" | "average" => Some(Baseline::Average),
            "min" | "minimum" => Some(Baseline::Minimum),
            _ => None,
        }
    }

    /// The other baseline.
    pub fn toggle(&self) -> Self {
        match self {
            Baseline::Average => Baseline::Minimum,
            Baseline::Minimum => Baseline::Average,
        }
    }

    /// e.g. `position_avg_expected_points`
    pub fn level_column(&self, metric: Metric) -> String {
        format!("position_{}_{}", self.key(), metric.column_name())
    }

    /// e.g. `value_vs_position_avg_expected_points`
    pub fn delta_column(&self, metric: Metric) -> String {
        format!("value_vs_position_{}_{}", self.key(), metric.column_name())
    }
}

/// The baseline level broadcast to a row and the row's deviation from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineColumns {
    /// Group average or minimum of the metric.
    pub level: f64,
    /// `metric - level`.
    pub delta: f64,
}

#[derive(Debug, Clone, Copy)]
struct GroupStats {
    sum: f64,
    count: usize,
    min: f64,
}

impl GroupStats {
    fn level(&self, baseline: Baseline) -> f64 {
        match baseline {
            Baseline::Average => self.sum / self.count as f64,
            Baseline::Minimum => self.min,
        }
    }
}

/// Compute the baseline level of each position group.
pub fn position_levels<I>(values: I, baseline: Baseline) -> BTreeMap<Position, f64>
where
    I: IntoIterator<Item = (Position, f64)>,
{
    let mut stats: BTreeMap<Position, GroupStats> = BTreeMap::new();
    for (position, value) in values {
        stats
            .entry(position)
            .and_modify(|s| {
                s.sum += value;
                s.count += 1;
                s.min = s.min.min(value);
            })
            .or_insert(GroupStats {
                sum: value,
                count: 1,
                min: value,
            });
    }
    stats
        .into_iter()
        .map(|(position, s)| (position, s.level(baseline)))
        .collect()
}

/// Attach `position_<baseline>_<metric>` and `value_vs_position_<baseline>_<metric>`
/// to every row.
pub fn add_position_baseline(
    rows: &mut [DerivedRow],
    metric: Metric,
    baseline: Baseline,
) -> Result<(), ModelError> {
    let values = rows
        .iter()
        .map(|row| Ok((row.position(), row.require(metric)?)))
        .collect::<Result<Vec<(Position, f64)>, ModelError>>()?;

    let levels = position_levels(values.iter().copied(), baseline);

    for (row, (position, value)) in rows.iter_mut().zip(values) {
        // Every row's position contributed to `levels`.
        let level = levels[&position];
        row.baselines.insert(
            (metric, baseline),
            BaselineColumns {
                level,
                delta: value - level,
            },
        );
    }

    debug!(
        "{} computed for {} position groups",
        baseline.level_column(metric),
        levels.len()
    );
    Ok(())
}
