// CSV loading and canonicalization for the unit and odds tables.
//
// Both loaders fail fast when a required header is missing and otherwise
// skip rows they cannot canonicalize, logging each skip.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use unitcast_core::records::{coerce_probability, parse_seed};
use unitcast_core::{OddsRecord, Position, UnitRecord};

use crate::error::LoadError;

/// Headers the unit table must carry. `pts` is required but unused.
pub const UNIT_COLUMNS: [&str; 4] = ["team", "position", "pts", "reg_ppg"];

/// Headers the odds table must carry.
pub const ODDS_COLUMNS: [&str; 6] = ["Team", "Odds Source", "Seed", "Win WC", "Win Div", "Win Conf"];

/// Both raw input tables, canonicalized.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTables {
    pub units: Vec<UnitRecord>,
    pub odds: Vec<OddsRecord>,
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Unit CSV row. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawUnit {
    team: String,
    position: String,
    reg_ppg: f64,
}

/// Odds CSV row. Numeric fields stay as text so they can be coerced instead
/// of rejected.
#[derive(Debug, Deserialize)]
struct RawOdds {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Odds Source")]
    odds_source: String,
    #[serde(rename = "Seed", default)]
    seed: String,
    #[serde(rename = "Win WC", default)]
    win_wc: String,
    #[serde(rename = "Win Div", default)]
    win_div: String,
    #[serde(rename = "Win Conf", default)]
    win_conf: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

/// Required columns absent from `headers`, sorted.
pub fn missing_columns(headers: &csv::StringRecord, required: &[&str]) -> Vec<String> {
    let present: HashSet<&str> = headers.iter().collect();
    let mut missing: Vec<String> = required
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect();
    missing.sort();
    missing
}

pub(crate) fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
    origin: &str,
) -> Result<(), LoadError> {
    let headers = reader.headers().map_err(|e| LoadError::Csv {
        path: origin.to_string(),
        source: e,
    })?;
    let missing = missing_columns(headers, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Schema {
            path: origin.to_string(),
            missing,
        })
    }
}

fn canonical_unit(raw: RawUnit) -> Option<UnitRecord> {
    let team = raw.team.trim();
    if team.is_empty() {
        warn!("skipping unit row with empty team");
        return None;
    }
    let Some(position) = Position::from_str_pos(&raw.position) else {
        warn!("skipping unit '{}': unknown position '{}'", team, raw.position);
        return None;
    };
    if !raw.reg_ppg.is_finite() || raw.reg_ppg < 0.0 {
        warn!("skipping unit '{} {}': invalid reg_ppg {}", team, position, raw.reg_ppg);
        return None;
    }
    Some(UnitRecord::new(team, position, raw.reg_ppg))
}

fn canonical_odds(raw: RawOdds) -> Option<OddsRecord> {
    let team = raw.team.trim();
    if team.is_empty() {
        warn!("skipping odds row with empty team");
        return None;
    }
    Some(OddsRecord {
        team: team.to_string(),
        odds_source: raw.odds_source.trim().to_string(),
        seed: parse_seed(&raw.seed),
        win_wc: coerce_probability(&raw.win_wc),
        win_div: coerce_probability(&raw.win_div),
        win_conf: coerce_probability(&raw.win_conf),
    })
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

/// Load unit rows from any reader. `origin` labels errors and log lines.
pub fn load_units_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<UnitRecord>, LoadError> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, &UNIT_COLUMNS, origin)?;
    let mut units = Vec::new();
    for result in reader.deserialize::<RawUnit>() {
        match result {
            Ok(raw) => units.extend(canonical_unit(raw)),
            Err(e) => warn!("skipping malformed unit row in {}: {}", origin, e),
        }
    }
    Ok(units)
}

/// Load odds rows from any reader. `origin` labels errors and log lines.
pub fn load_odds_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<OddsRecord>, LoadError> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, &ODDS_COLUMNS, origin)?;
    let mut odds = Vec::new();
    for result in reader.deserialize::<RawOdds>() {
        match result {
            Ok(raw) => odds.extend(canonical_odds(raw)),
            Err(e) => warn!("skipping malformed odds row in {}: {}", origin, e),
        }
    }
    Ok(odds)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the unit table from a CSV file.
pub fn load_units(path: &Path) -> Result<Vec<UnitRecord>, LoadError> {
    load_units_from_reader(open(path)?, &path.display().to_string())
}

/// Load the odds table from a CSV file.
pub fn load_odds(path: &Path) -> Result<Vec<OddsRecord>, LoadError> {
    load_odds_from_reader(open(path)?, &path.display().to_string())
}

/// Load both tables and reject either one when it has no valid rows.
pub fn load_tables(units_path: &Path, odds_path: &Path) -> Result<InputTables, LoadError> {
    let units = load_units(units_path)?;
    let odds = load_odds(odds_path)?;

    if units.is_empty() {
        return Err(LoadError::Validation(format!(
            "{} produced zero valid unit rows",
            units_path.display()
        )));
    }
    if odds.is_empty() {
        return Err(LoadError::Validation(format!(
            "{} produced zero valid odds rows",
            odds_path.display()
        )));
    }

    info!("loaded {} unit rows and {} odds rows", units.len(), odds.len());
    Ok(InputTables { units, odds })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
