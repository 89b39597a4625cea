// Metric pipeline: join, expected games/points, position baselines, ranks,
// playoff distribution, and the builder that runs them in order.
//
// Derived values live on `DerivedRow` as optional columns so every stage can
// check that the columns it reads exist before it writes its own.

pub mod baseline;
pub mod build;
pub mod diagnostics;
pub mod distribution;
pub mod games;
pub mod join;
pub mod rank;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::position::Position;
use crate::records::JoinedRow;
use baseline::{Baseline, BaselineColumns};
use rank::RankColumn;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A numeric per-unit column that can be aggregated or ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RegPpg,
    ExpectedGames,
    ExpectedPoints,
}

impl Metric {
    /// Column name used in error messages and derived column names.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::RegPpg => "reg_ppg",
            Metric::ExpectedGames => "expected_games",
            Metric::ExpectedPoints => "expected_points",
        }
    }

    /// Human-readable label for tables and charts.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::RegPpg => "Regular Season PPG",
            Metric::ExpectedGames => "Expected Playoff Games",
            Metric::ExpectedPoints => "Expected Playoff Points",
        }
    }

    /// Parse a column name back into a metric.
    pub fn from_column(s: &str) -> Option<Self> {
        match s.trim() {
            "reg_ppg" => Some(Metric::RegPpg),
            "expected_games" => Some(Metric::ExpectedGames),
            "expected_points" => Some(Metric::ExpectedPoints),
            _ => None,
        }
    }

    /// The derivation step that produces this column, for error hints.
    fn producer(&self) -> &'static str {
        match self {
            Metric::RegPpg => "unit input",
            Metric::ExpectedGames => "add_expected_games",
            Metric::ExpectedPoints => "add_expected_points",
        }
    }
}

// ---------------------------------------------------------------------------
// Working rows
// ---------------------------------------------------------------------------

/// A joined row plus every column derived from the joined row set so far.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub joined: JoinedRow,
    pub expected_games: Option<f64>,
    pub expected_points: Option<f64>,
    pub baselines: BTreeMap<(Metric, Baseline), BaselineColumns>,
    pub ranks: BTreeMap<RankColumn, u32>,
}

impl DerivedRow {
    pub fn new(joined: JoinedRow) -> Self {
        DerivedRow {
            joined,
            expected_games: None,
            expected_points: None,
            baselines: BTreeMap::new(),
            ranks: BTreeMap::new(),
        }
    }

    pub fn team(&self) -> &str {
        self.joined.team()
    }

    pub fn position(&self) -> Position {
        self.joined.position()
    }

    /// Value of `metric`, or `None` when it has not been derived yet.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::RegPpg => Some(self.joined.unit.reg_ppg),
            Metric::ExpectedGames => self.expected_games,
            Metric::ExpectedPoints => self.expected_points,
        }
    }

    /// Value of `metric`, failing with `MissingColumn` when it is absent.
    pub fn require(&self, metric: Metric) -> Result<f64, ModelError> {
        self.metric(metric).ok_or_else(|| {
            ModelError::missing(
                metric.column_name(),
                format!("call {}() first", metric.producer()),
            )
        })
    }

    pub fn baseline(&self, metric: Metric, baseline: Baseline) -> Option<&BaselineColumns> {
        self.baselines.get(&(metric, baseline))
    }

    pub fn rank(&self, column: RankColumn) -> Option<u32> {
        self.ranks.get(&column).copied()
    }
}

/// Wrap joined rows for derivation.
pub fn derive_rows(joined: Vec<JoinedRow>) -> Vec<DerivedRow> {
    joined.into_iter().map(DerivedRow::new).collect()
}

// ---------------------------------------------------------------------------
// Test fixtures shared by the stage modules
// ---------------------------------------------------------------------------
