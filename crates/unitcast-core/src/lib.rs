// Library root for the playoff unit model: typed records, the metric
// pipeline, and the team-level playoff distribution.

pub mod error;
pub mod model;
pub mod position;
pub mod records;

pub use error::ModelError;
pub use model::build::{BuiltModel, ModelBuilder};
pub use position::Position;
pub use records::{JoinedRow, OddsRecord, RoundOdds, TeamMeta, TeamMetadata, UnitRecord};
