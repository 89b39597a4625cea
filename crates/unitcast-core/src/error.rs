// Structural errors raised by the model pipeline.
//
// Data-quality problems are not errors; they travel as
// `model::diagnostics::DataQualityWarning` values alongside a successful build.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A stage ran before the column it reads was derived, or the requested
    /// input column does not exist on the row set.
    #[error("missing required column `{column}`: {hint}")]
    MissingColumn { column: String, hint: String },

    /// The odds side of the join holds more than one row for a team within
    /// the selected source.
    #[error("odds source `{odds_source}` has {count} rows for team `{team}`; expected exactly one")]
    Cardinality {
        team: String,
        odds_source: String,
        count: usize,
    },

    #[error("no odds sources found in odds data")]
    NoOddsSources,
}

impl ModelError {
    pub(crate) fn missing(column: impl Into<String>, hint: impl Into<String>) -> Self {
        ModelError::MissingColumn {
            column: column.into(),
            hint: hint.into(),
        }
    }
}
