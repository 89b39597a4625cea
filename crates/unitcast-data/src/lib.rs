// Ingestion for the unit model: CSV loaders for the unit and odds tables and
// the team display-metadata loader.

pub mod error;
pub mod loader;
pub mod metadata;

pub use error::LoadError;
pub use loader::{load_odds, load_tables, load_units, InputTables};
pub use metadata::{fetch_team_metadata, load_team_metadata};
