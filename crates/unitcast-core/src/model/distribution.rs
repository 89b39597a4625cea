// Playoff games-played distribution per team.
//
// Non-bye teams can play 1-4 games (WC, Div, Conf, SB). Bye teams open in
// the Divisional round and can play at most 3, so their `play_4` is zero.
// Masses are not clamped: inconsistent round odds show up as negative
// percentages.

use serde::Serialize;
use std::cmp::Ordering;

use super::games::expected_games;
use crate::records::{OddsRecord, RoundOdds, TeamMeta, TeamMetadata};

/// Probability mass over the number of playoff games a team plays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayoffDistribution {
    pub expected_games: f64,
    pub play_1: f64,
    pub play_2: f64,
    pub play_3: f64,
    pub play_4: f64,
    /// Probability of playing three or more games.
    pub play_3_plus: f64,
}

impl PlayoffDistribution {
    /// The five masses with their display labels, in column order.
    pub fn masses(&self) -> [(&'static str, f64); 5] {
        [
            ("Play 1", self.play_1),
            ("Play 2", self.play_2),
            ("Play 3", self.play_3),
            ("Play 4", self.play_4),
            ("Play 3+", self.play_3_plus),
        ]
    }
}

/// Convert round-win probabilities into a games-played distribution.
pub fn distribution(odds: RoundOdds) -> PlayoffDistribution {
    let games = expected_games(odds);
    if odds.is_bye {
        PlayoffDistribution {
            expected_games: games,
            play_1: 1.0 - odds.win_div,
            play_2: odds.win_div - odds.win_conf,
            play_3: odds.win_conf,
            play_4: 0.0,
            play_3_plus: odds.win_conf,
        }
    } else {
        PlayoffDistribution {
            expected_games: games,
            play_1: 1.0 - odds.win_wc,
            play_2: odds.win_wc - odds.win_div,
            play_3: odds.win_div - odds.win_conf,
            play_4: odds.win_conf,
            play_3_plus: odds.win_div,
        }
    }
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Round to `decimals` places, ties to even.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Render a probability as a whole percentage, e.g. `0.153` -> `"15%"`.
pub fn format_percent(probability: f64) -> String {
    format!("{}%", (probability * 100.0).round_ties_even() as i64)
}

/// Render expected games with two decimals.
pub fn format_games(games: f64) -> String {
    format!("{:.2}", round_half_even(games, 2))
}

// ---------------------------------------------------------------------------
// Team table
// ---------------------------------------------------------------------------

/// Display strings for one team row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionLabels {
    pub expected_games: String,
    pub play_1: String,
    pub play_2: String,
    pub play_3: String,
    pub play_4: String,
    pub play_3_plus: String,
}

/// One row of the team-level playoff distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDistributionRow {
    pub team: String,
    pub is_bye: bool,
    /// Expected games rounded to two decimals.
    pub expected_games: f64,
    pub distribution: PlayoffDistribution,
    pub labels: DistributionLabels,
    pub team_meta: Option<TeamMeta>,
}

impl TeamDistributionRow {
    pub fn from_odds(odds: &OddsRecord, metadata: Option<&TeamMetadata>) -> Self {
        let dist = distribution(odds.round_odds());
        let labels = DistributionLabels {
            expected_games: format_games(dist.expected_games),
            play_1: format_percent(dist.play_1),
            play_2: format_percent(dist.play_2),
            play_3: format_percent(dist.play_3),
            play_4: format_percent(dist.play_4),
            play_3_plus: format_percent(dist.play_3_plus),
        };
        TeamDistributionRow {
            team: odds.team.clone(),
            is_bye: odds.is_bye(),
            expected_games: round_half_even(dist.expected_games, 2),
            distribution: dist,
            labels,
            team_meta: metadata.and_then(|m| m.get(&odds.team)).cloned(),
        }
    }
}

/// Build the team table for one odds slice, sorted by expected games
/// descending and then by team.
pub fn build_team_table(
    odds_for_source: &[OddsRecord],
    metadata: Option<&TeamMetadata>,
) -> Vec<TeamDistributionRow> {
    let mut rows: Vec<TeamDistributionRow> = odds_for_source
        .iter()
        .map(|o| TeamDistributionRow::from_odds(o, metadata))
        .collect();
    rows.sort_by(|a, b| {
        b.expected_games
            .partial_cmp(&a.expected_games)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team.cmp(&b.team))
    });
    rows
}
