// Model builder: runs the whole pipeline for one odds source and returns the
// unit table, the team distribution table and the build diagnostics.
//
// Every call recomputes everything from the raw tables; there is no
// incremental path. Output depends only on the inputs, so callers may
// memoize on (units, odds, selected source).

use serde::Serialize;
use tracing::info;

use super::baseline::{add_position_baseline, Baseline};
use super::diagnostics::{check_coverage, check_masses, check_monotonic, DataQualityWarning, Diagnostics};
use super::distribution::{build_team_table, TeamDistributionRow};
use super::games::{add_expected_games, add_expected_points};
use super::join::{join, odds_sources, select_source};
use super::rank::{add_overall_rank, add_position_rank, RankColumn};
use super::{derive_rows, DerivedRow, Metric};
use crate::error::ModelError;
use crate::position::Position;
use crate::records::{OddsRecord, TeamMeta, TeamMetadata, UnitRecord};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One fully derived (team, position) unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitMetrics {
    pub team: String,
    pub position: Position,
    pub odds_source: String,
    pub seed: Option<u32>,
    pub is_bye: bool,
    pub win_wc: f64,
    pub win_div: f64,
    pub win_conf: f64,
    pub reg_ppg: f64,
    pub expected_games: f64,
    pub expected_points: f64,
    pub position_avg_expected_points: f64,
    pub position_min_expected_points: f64,
    pub value_vs_position_avg_expected_points: f64,
    pub value_vs_position_min_expected_points: f64,
    pub position_rank: u32,
    pub ppg_rank: u32,
    pub exp_games_rank: u32,
    pub overall_rank_avg: u32,
    pub overall_rank_min: u32,
    pub team_meta: Option<TeamMeta>,
}

impl UnitMetrics {
    /// `"<team> <position>"`, e.g. `"KC QB"`.
    pub fn unit_label(&self) -> String {
        format!("{} {}", self.team, self.position)
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::RegPpg => self.reg_ppg,
            Metric::ExpectedGames => self.expected_games,
            Metric::ExpectedPoints => self.expected_points,
        }
    }

    /// Position average or minimum of expected points.
    pub fn position_level(&self, baseline: Baseline) -> f64 {
        match baseline {
            Baseline::Average => self.position_avg_expected_points,
            Baseline::Minimum => self.position_min_expected_points,
        }
    }

    /// Expected points above the position baseline.
    pub fn value_vs(&self, baseline: Baseline) -> f64 {
        match baseline {
            Baseline::Average => self.value_vs_position_avg_expected_points,
            Baseline::Minimum => self.value_vs_position_min_expected_points,
        }
    }

    pub fn overall_rank(&self, baseline: Baseline) -> u32 {
        match baseline {
            Baseline::Average => self.overall_rank_avg,
            Baseline::Minimum => self.overall_rank_min,
        }
    }

    fn from_derived(row: DerivedRow, metadata: Option<&TeamMetadata>) -> Result<Self, ModelError> {
        let points = Metric::ExpectedPoints;
        let baseline = |b: Baseline| {
            row.baseline(points, b)
                .copied()
                .ok_or_else(|| ModelError::missing(b.level_column(points), "call add_position_baseline() first"))
        };
        let rank = |c: RankColumn| {
            row.rank(c)
                .ok_or_else(|| ModelError::missing(c.column_name(), "rank not computed"))
        };

        let avg = baseline(Baseline::Average)?;
        let min = baseline(Baseline::Minimum)?;
        let unit = UnitMetrics {
            expected_games: row.require(Metric::ExpectedGames)?,
            expected_points: row.require(points)?,
            position_avg_expected_points: avg.level,
            position_min_expected_points: min.level,
            value_vs_position_avg_expected_points: avg.delta,
            value_vs_position_min_expected_points: min.delta,
            position_rank: rank(RankColumn::Position)?,
            ppg_rank: rank(RankColumn::Ppg)?,
            exp_games_rank: rank(RankColumn::ExpectedGames)?,
            overall_rank_avg: rank(RankColumn::Overall(Baseline::Average))?,
            overall_rank_min: rank(RankColumn::Overall(Baseline::Minimum))?,
            team_meta: metadata.and_then(|m| m.get(row.team())).cloned(),
            team: row.joined.unit.team.clone(),
            position: row.joined.unit.position,
            odds_source: row.joined.odds.odds_source.clone(),
            seed: row.joined.odds.seed,
            is_bye: row.joined.odds.is_bye(),
            win_wc: row.joined.odds.win_wc,
            win_div: row.joined.odds.win_div,
            win_conf: row.joined.odds.win_conf,
            reg_ppg: row.joined.unit.reg_ppg,
        };
        Ok(unit)
    }
}

/// Everything produced by one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltModel {
    /// Unit table in unit-input order.
    pub units: Vec<UnitMetrics>,
    /// Team distribution table, descending by expected games.
    pub teams: Vec<TeamDistributionRow>,
    /// All known odds sources, sorted.
    pub odds_sources: Vec<String>,
    /// The source actually used.
    pub selected_source: String,
    pub diagnostics: Diagnostics,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Runs the unit and team pipelines over borrowed input tables.
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder<'a> {
    units: &'a [UnitRecord],
    odds: &'a [OddsRecord],
    metadata: Option<&'a TeamMetadata>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(units: &'a [UnitRecord], odds: &'a [OddsRecord]) -> Self {
        ModelBuilder {
            units,
            odds,
            metadata: None,
        }
    }

    /// Attach display metadata, left-joined on team abbreviation.
    pub fn with_metadata(mut self, metadata: &'a TeamMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sorted distinct odds sources in the odds table.
    pub fn odds_sources(&self) -> Vec<String> {
        odds_sources(self.odds)
    }

    /// Pick the source to build for: `requested` when known, otherwise the
    /// first known source.
    pub fn resolve_source(&self, requested: &str) -> Result<String, ModelError> {
        let sources = self.odds_sources();
        let requested = requested.trim();
        if sources.iter().any(|s| s == requested) {
            return Ok(requested.to_string());
        }
        sources.into_iter().next().ok_or(ModelError::NoOddsSources)
    }

    /// Run the full pipeline for `selected_source`.
    pub fn build(&self, selected_source: &str) -> Result<BuiltModel, ModelError> {
        let sources = self.odds_sources();
        let resolved = self.resolve_source(selected_source)?;

        let mut diagnostics = Diagnostics::default();
        if resolved != selected_source.trim() {
            diagnostics.push(DataQualityWarning::UnknownSource {
                requested: selected_source.to_string(),
                resolved: resolved.clone(),
            });
        }

        let odds_sel = select_source(self.odds, &resolved);
        diagnostics.extend(check_monotonic(&odds_sel));
        diagnostics.extend(check_coverage(self.units, &odds_sel));

        let joined = join(self.units, &odds_sel)?;
        diagnostics.join = joined.diagnostics;

        let mut rows = derive_rows(joined.rows);
        derive_unit_columns(&mut rows)?;

        let units = rows
            .into_iter()
            .map(|row| UnitMetrics::from_derived(row, self.metadata))
            .collect::<Result<Vec<UnitMetrics>, ModelError>>()?;

        let teams = build_team_table(&odds_sel, self.metadata);
        for team in &teams {
            diagnostics.extend(check_masses(&team.team, &team.distribution));
        }

        info!(
            "model built for '{}': {} units, {} teams, {} warnings",
            resolved,
            units.len(),
            teams.len(),
            diagnostics.warnings.len()
        );

        Ok(BuiltModel {
            units,
            teams,
            odds_sources: sources,
            selected_source: resolved,
            diagnostics,
        })
    }
}

/// Expected games and points, both baselines, and every rank family.
fn derive_unit_columns(rows: &mut [DerivedRow]) -> Result<(), ModelError> {
    add_expected_games(rows);
    add_expected_points(rows, Metric::RegPpg)?;
    for baseline in Baseline::ALL {
        add_position_baseline(rows, Metric::ExpectedPoints, baseline)?;
    }
    add_position_rank(rows, Metric::ExpectedPoints, RankColumn::Position)?;
    add_position_rank(rows, Metric::RegPpg, RankColumn::Ppg)?;
    add_position_rank(rows, Metric::ExpectedGames, RankColumn::ExpectedGames)?;
    for baseline in Baseline::ALL {
        add_overall_rank(rows, Metric::ExpectedPoints, baseline)?;
    }
    Ok(())
}
