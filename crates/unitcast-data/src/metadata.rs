// Team display metadata: names and colours keyed by abbreviation.
//
// Accepts the nflverse `teams_colors_logos.csv` shape. Header case is
// normalized before matching, and columns other than the four read here are
// ignored.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use unitcast_core::{TeamMeta, TeamMetadata};

use crate::error::LoadError;
use crate::loader::{csv_reader, missing_columns};

const METADATA_COLUMNS: [&str; 1] = ["team_abbr"];

#[derive(Debug, Deserialize)]
struct RawTeamMeta {
    team_abbr: String,
    #[serde(default)]
    team_name: String,
    #[serde(default)]
    team_color: String,
    #[serde(default)]
    team_color2: String,
}

/// Load team metadata from any reader. `origin` labels errors and log lines.
pub fn load_team_metadata_from_reader<R: Read>(rdr: R, origin: &str) -> Result<TeamMetadata, LoadError> {
    let mut reader = csv_reader(rdr);
    let headers = reader.headers().map_err(|e| LoadError::Csv {
        path: origin.to_string(),
        source: e,
    })?;
    let lowered: csv::StringRecord = headers.iter().map(str::to_lowercase).collect();
    let missing = missing_columns(&lowered, &METADATA_COLUMNS);
    if !missing.is_empty() {
        return Err(LoadError::Schema {
            path: origin.to_string(),
            missing,
        });
    }
    reader.set_headers(lowered);

    let mut metadata = TeamMetadata::new();
    for result in reader.deserialize::<RawTeamMeta>() {
        match result {
            Ok(raw) => {
                let abbr = raw.team_abbr.trim();
                if abbr.is_empty() {
                    warn!("skipping team metadata row with empty team_abbr");
                    continue;
                }
                metadata.insert(TeamMeta {
                    abbr: abbr.to_string(),
                    name: raw.team_name,
                    color: raw.team_color,
                    color2: raw.team_color2,
                });
            }
            Err(e) => warn!("skipping malformed team metadata row in {}: {}", origin, e),
        }
    }
    Ok(metadata)
}

/// Load team metadata from a local CSV file.
pub fn load_team_metadata(path: &Path) -> Result<TeamMetadata, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let metadata = load_team_metadata_from_reader(file, &path.display().to_string())?;
    info!("loaded metadata for {} teams from {}", metadata.len(), path.display());
    Ok(metadata)
}

/// Download and parse team metadata. Non-2xx responses are errors.
pub async fn fetch_team_metadata(client: &reqwest::Client, url: &str) -> Result<TeamMetadata, LoadError> {
    let http = |source: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        source,
    };
    let response = client
        .get(url)
        .send()
        .await
        .map_err(http)?
        .error_for_status()
        .map_err(http)?;
    let body = response.bytes().await.map_err(http)?;
    let metadata = load_team_metadata_from_reader(body.as_ref(), url)?;
    info!("fetched metadata for {} teams from {}", metadata.len(), url);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nflverse_shape_parsed() {
        let csv_data = "\
team_abbr,team_name,team_id,team_nick,team_conf,team_division,team_color,team_color2,team_color3
KC,Kansas City Chiefs,2310,Chiefs,AFC,AFC West,#E31837,#FFB612,#000000
DET,Detroit Lions,1540,Lions,NFC,NFC North,#0076B6,#B0B7BC,#000000";

        let metadata = load_team_metadata_from_reader(csv_data.as_bytes(), "teams").unwrap();
        assert_eq!(metadata.len(), 2);
        let kc = metadata.get("KC").unwrap();
        assert_eq!(kc.name, "Kansas City Chiefs");
        assert_eq!(kc.color, "#E31837");
        assert_eq!(kc.color2, "#FFB612");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let csv_data = "\
Team_Abbr,TEAM_NAME,Team_Color,Team_Color2
BUF,Buffalo Bills,#00338D,#C60C30";

        let metadata = load_team_metadata_from_reader(csv_data.as_bytes(), "teams").unwrap();
        assert_eq!(metadata.get("BUF").unwrap().color, "#00338D");
    }

    #[test]
    fn optional_columns_default_to_empty() {
        let csv_data = "team_abbr\nGB";
        let metadata = load_team_metadata_from_reader(csv_data.as_bytes(), "teams").unwrap();
        let gb = metadata.get("GB").unwrap();
        assert_eq!(gb.name, "");
        assert_eq!(gb.color, "");
    }

    #[test]
    fn missing_abbr_column_is_schema_error() {
        let csv_data = "team_name,team_color\nChiefs,#E31837";
        let err = load_team_metadata_from_reader(csv_data.as_bytes(), "teams").unwrap_err();
        assert!(matches!(err, LoadError::Schema { missing, .. } if missing == vec!["team_abbr"]));
    }

    #[test]
    fn empty_abbr_rows_skipped() {
        let csv_data = "team_abbr,team_name\n,Nobody\nPHI,Philadelphia Eagles";
        let metadata = load_team_metadata_from_reader(csv_data.as_bytes(), "teams").unwrap();
        assert_eq!(metadata.len(), 1);
        assert!(metadata.get("PHI").is_some());
    }
}
