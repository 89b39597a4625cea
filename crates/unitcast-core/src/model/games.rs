// Expected playoff games and expected playoff points.

use tracing::debug;

use super::{DerivedRow, Metric};
use crate::error::ModelError;
use crate::records::RoundOdds;

/// Probability-weighted number of playoff games a team plays.
///
/// A non-bye team always plays the Wild Card round and then each later round
/// with the probability of winning the round before it. A bye team opens in
/// the Divisional round, so `win_wc` is left out whatever value it holds.
pub fn expected_games(odds: RoundOdds) -> f64 {
    if odds.is_bye {
        1.0 + odds.win_div + odds.win_conf
    } else {
        1.0 + odds.win_wc + odds.win_div + odds.win_conf
    }
}

/// Scale a per-game rate by expected games.
pub fn expected_points(rate: f64, expected_games: f64) -> f64 {
    rate * expected_games
}

/// Set `expected_games` on every row from its team's odds.
pub fn add_expected_games(rows: &mut [DerivedRow]) {
    for row in rows.iter_mut() {
        row.expected_games = Some(expected_games(row.joined.odds.round_odds()));
    }
    debug!("expected games derived for {} rows", rows.len());
}

/// Set `expected_points = rate × expected_games` on every row.
///
/// Fails without touching any row if `expected_games` or the rate column is
/// missing on any row.
pub fn add_expected_points(rows: &mut [DerivedRow], rate: Metric) -> Result<(), ModelError> {
    let points = rows
        .iter()
        .map(|row| {
            let games = row.require(Metric::ExpectedGames)?;
            let rate_value = row.require(rate)?;
            Ok(expected_points(rate_value, games))
        })
        .collect::<Result<Vec<f64>, ModelError>>()?;

    for (row, value) in rows.iter_mut().zip(points) {
        row.expected_points = Some(value);
    }
    debug!(
        "expected points derived from {} for {} rows",
        rate.column_name(),
        rows.len()
    );
    Ok(())
}
