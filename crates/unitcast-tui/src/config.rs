// Configuration loading and validation (config/unitcast.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unitcast_core::model::baseline::Baseline;
use unitcast_core::model::Metric;

pub const CONFIG_FILE: &str = "unitcast.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub metadata: MetadataConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub points: String,
    pub odds: String,
    #[serde(default)]
    pub team_metadata: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fetch_remote: bool,
}

/// Dashboard defaults with the selectors already parsed.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub default_source: String,
    pub baseline: Baseline,
    pub chart_metric: Metric,
}

/// Raw deserialization target for unitcast.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataConfig,
    #[serde(default = "default_metadata")]
    metadata: MetadataConfig,
    dashboard: DashboardSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardSection {
    #[serde(default)]
    title: String,
    #[serde(default)]
    default_source: String,
    #[serde(default = "default_baseline")]
    baseline: String,
    #[serde(default = "default_chart_metric")]
    chart_metric: String,
}

fn default_metadata() -> MetadataConfig {
    MetadataConfig {
        url: String::new(),
        fetch_remote: false,
    }
}

fn default_baseline() -> String {
    Baseline::Average.key().to_string()
}

fn default_chart_metric() -> String {
    Metric::ExpectedPoints.column_name().to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/unitcast.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    let config = Config {
        dashboard: parse_dashboard(file.dashboard)?,
        data: file.data,
        metadata: file.metadata,
    };
    validate(&config)?;
    Ok(config)
}

/// Copy files from `defaults/` into `config/` when they are missing there.
/// Existing files are never overwritten. Returns the copied paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_dashboard(raw: DashboardSection) -> Result<DashboardConfig, ConfigError> {
    let baseline = Baseline::from_key(&raw.baseline).ok_or_else(|| ConfigError::ValidationError {
        field: "dashboard.baseline".into(),
        message: format!("must be \"avg\" or \"min\", got \"{}\"", raw.baseline),
    })?;
    let chart_metric = match Metric::from_column(&raw.chart_metric) {
        Some(metric @ (Metric::ExpectedPoints | Metric::RegPpg)) => metric,
        _ => {
            return Err(ConfigError::ValidationError {
                field: "dashboard.chart_metric".into(),
                message: format!(
                    "must be \"expected_points\" or \"reg_ppg\", got \"{}\"",
                    raw.chart_metric
                ),
            })
        }
    };
    Ok(DashboardConfig {
        title: raw.title,
        default_source: raw.default_source,
        baseline,
        chart_metric,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let paths: &[(&str, &str)] = &[
        ("data.points", config.data.points.as_str()),
        ("data.odds", config.data.odds.as_str()),
    ];
    for (name, value) in paths {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config
        .data
        .team_metadata
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "data.team_metadata".into(),
            message: "must not be empty when set".into(),
        });
    }

    if config.metadata.fetch_remote && config.metadata.url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "metadata.url".into(),
            message: "required when fetch_remote is true".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Locate the directory holding `defaults/` whether tests run from the
    /// crate root or the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/unitcast-tui/defaults").exists() {
            cwd.join("crates/unitcast-tui")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("unitcast_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(tmp: &Path, text: &str) {
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
    }

    const MINIMAL: &str = r#"
[data]
points = "p.csv"
odds = "o.csv"

[dashboard]
title = "Test"
default_source = "DraftKings"
"#;

    #[test]
    fn load_valid_config_from_defaults() {
        let root = project_root();
        let tmp = scratch("defaults");
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            tmp.join("config").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load default config");
        assert_eq!(config.data.points, "data/pts_2025.csv");
        assert_eq!(config.data.odds, "data/playoff_odds.csv");
        assert!(config.data.team_metadata.is_none());
        assert!(config.metadata.fetch_remote);
        assert!(config.metadata.url.ends_with("teams_colors_logos.csv"));
        assert_eq!(config.dashboard.title, "Big Burger Bet 2026");
        assert_eq!(config.dashboard.default_source, "Fanduel");
        assert_eq!(config.dashboard.baseline, Baseline::Average);
        assert_eq!(config.dashboard.chart_metric, Metric::ExpectedPoints);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_default() {
        let tmp = scratch("minimal");
        write_config(&tmp, MINIMAL);

        let config = load_config_from(&tmp).unwrap();
        assert!(!config.metadata.fetch_remote);
        assert_eq!(config.dashboard.baseline, Baseline::Average);
        assert_eq!(config.dashboard.chart_metric, Metric::ExpectedPoints);
        assert_eq!(config.dashboard.default_source, "DraftKings");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn min_baseline_and_ppg_metric_parse() {
        let tmp = scratch("selectors");
        write_config(
            &tmp,
            &format!("{MINIMAL}baseline = \"min\"\nchart_metric = \"reg_ppg\"\n"),
        );

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.dashboard.baseline, Baseline::Minimum);
        assert_eq!(config.dashboard.chart_metric, Metric::RegPpg);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_baseline() {
        let tmp = scratch("bad_baseline");
        write_config(&tmp, &format!("{MINIMAL}baseline = \"median\"\n"));

        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "dashboard.baseline"),
            other => panic!("expected ValidationError, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_expected_games_chart_metric() {
        let tmp = scratch("bad_metric");
        write_config(&tmp, &format!("{MINIMAL}chart_metric = \"expected_games\"\n"));

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "dashboard.chart_metric"
        ));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_points_path() {
        let tmp = scratch("empty_points");
        write_config(&tmp, &MINIMAL.replace("\"p.csv\"", "\"  \""));

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "data.points"
        ));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_fetch_remote_without_url() {
        let tmp = scratch("no_url");
        write_config(&tmp, &format!("{MINIMAL}\n[metadata]\nfetch_remote = true\n"));

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "metadata.url"
        ));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = scratch("missing");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("invalid");
        write_config(&tmp, "[data\npoints = ");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_then_skips() {
        let tmp = std::env::temp_dir().join("unitcast_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE)]);

        fs::write(tmp.join("config").join(CONFIG_FILE), "edited").unwrap();
        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let kept = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "edited");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("unitcast_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let err = ensure_config_files(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_config_bootstraps_from_defaults() {
        let tmp = std::env::temp_dir().join("unitcast_config_bootstrap");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();

        let config = load_config(&tmp).unwrap();
        assert_eq!(config.dashboard.title, "Test");
        assert!(tmp.join("config").join(CONFIG_FILE).exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}
