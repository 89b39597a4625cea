// Application state: the loaded input tables and the model built for the
// currently selected odds source.
//
// Changing the source rebuilds the whole model from the raw tables. Every
// other dashboard control reads the built model without rebuilding it.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};
use unitcast_core::{BuiltModel, ModelBuilder, ModelError, OddsRecord, TeamMetadata, UnitRecord};
use unitcast_data::{fetch_team_metadata, load_team_metadata, InputTables};

use crate::config::Config;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct App {
    units: Vec<UnitRecord>,
    odds: Vec<OddsRecord>,
    metadata: TeamMetadata,
    model: BuiltModel,
}

impl App {
    /// Build the initial model for `preferred_source`, falling back to the
    /// first known source when it does not exist.
    pub fn new(
        tables: InputTables,
        metadata: TeamMetadata,
        preferred_source: &str,
    ) -> Result<Self, ModelError> {
        let model = ModelBuilder::new(&tables.units, &tables.odds)
            .with_metadata(&metadata)
            .build(preferred_source)?;
        info!(
            "initial model built for source '{}' ({} sources available)",
            model.selected_source,
            model.odds_sources.len()
        );
        Ok(App {
            units: tables.units,
            odds: tables.odds,
            metadata,
            model,
        })
    }

    pub fn model(&self) -> &BuiltModel {
        &self.model
    }

    pub fn sources(&self) -> &[String] {
        &self.model.odds_sources
    }

    /// Index of the selected source within `sources()`.
    pub fn source_index(&self) -> usize {
        self.sources()
            .iter()
            .position(|s| *s == self.model.selected_source)
            .unwrap_or(0)
    }

    /// Rebuild the model for `source`.
    pub fn select_source(&mut self, source: &str) -> Result<(), ModelError> {
        self.model = ModelBuilder::new(&self.units, &self.odds)
            .with_metadata(&self.metadata)
            .build(source)?;
        info!("rebuilt model for source '{}'", self.model.selected_source);
        Ok(())
    }

    /// Move `step` places through the sorted source list, wrapping around.
    pub fn cycle_source(&mut self, step: isize) -> Result<(), ModelError> {
        let count = self.sources().len();
        if count < 2 {
            return Ok(());
        }
        let next = (self.source_index() as isize + step).rem_euclid(count as isize) as usize;
        let source = self.sources()[next].clone();
        self.select_source(&source)
    }
}

/// Team display metadata from the configured local file, else the remote
/// CSV, else empty. Failures are logged and never fatal.
pub async fn load_display_metadata(config: &Config) -> TeamMetadata {
    if let Some(path) = &config.data.team_metadata {
        match load_team_metadata(Path::new(path)) {
            Ok(metadata) => return metadata,
            Err(e) => warn!("local team metadata unavailable: {}", e),
        }
    }

    if config.metadata.fetch_remote {
        let client = match reqwest::Client::builder().timeout(FETCH_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("failed to build HTTP client: {}", e);
                return TeamMetadata::new();
            }
        };
        match fetch_team_metadata(&client, &config.metadata.url).await {
            Ok(metadata) => return metadata,
            Err(e) => warn!("remote team metadata unavailable: {}", e),
        }
    }

    info!("no team metadata; charts use fallback colours");
    TeamMetadata::new()
}
