use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    /// Required headers are absent; `missing` is sorted.
    #[error("{path} is missing required columns: {}", missing.join(", "))]
    Schema { path: String, missing: Vec<String> },

    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("validation error: {0}")]
    Validation(String),
}
