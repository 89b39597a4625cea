// Integration tests for the file and network loaders.

use std::fs;
use std::path::PathBuf;

use unitcast_core::ModelBuilder;
use unitcast_data::{fetch_team_metadata, load_tables, load_team_metadata, LoadError};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("unitcast_data_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const UNITS: &str = "\
team,position,pts,reg_ppg
KC,QB,340,20.0
KC,K,140,8.0
BUF,QB,380,22.4
BUF,K,150,8.8
";

const ODDS: &str = "\
Team,Odds Source,Seed,Win WC,Win Div,Win Conf
KC,Fanduel,1,0,0.7,0.45
BUF,Fanduel,2,0.8,0.5,0.25
KC,DraftKings,1,0,0.68,0.44
BUF,DraftKings,2,0.78,0.52,0.27
";

#[test]
fn tables_load_and_build() {
    let dir = temp_dir("tables");
    let units_path = dir.join("units.csv");
    let odds_path = dir.join("odds.csv");
    fs::write(&units_path, UNITS).unwrap();
    fs::write(&odds_path, ODDS).unwrap();

    let tables = load_tables(&units_path, &odds_path).unwrap();
    assert_eq!(tables.units.len(), 4);
    assert_eq!(tables.odds.len(), 4);

    let builder = ModelBuilder::new(&tables.units, &tables.odds);
    assert_eq!(builder.odds_sources(), vec!["DraftKings", "Fanduel"]);
    let model = builder.build("Fanduel").unwrap();
    assert_eq!(model.units.len(), 4);
    assert_eq!(model.teams.len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn table_without_valid_rows_is_rejected() {
    let dir = temp_dir("empty");
    let units_path = dir.join("units.csv");
    let odds_path = dir.join("odds.csv");
    fs::write(&units_path, "team,position,pts,reg_ppg\nKC,LS,1,1.0\n").unwrap();
    fs::write(&odds_path, ODDS).unwrap();

    let err = load_tables(&units_path, &odds_path).unwrap_err();
    assert!(matches!(err, LoadError::Validation(_)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn odds_schema_error_surfaces_through_load_tables() {
    let dir = temp_dir("schema");
    let units_path = dir.join("units.csv");
    let odds_path = dir.join("odds.csv");
    fs::write(&units_path, UNITS).unwrap();
    fs::write(&odds_path, "Team,Seed\nKC,1\n").unwrap();

    let err = load_tables(&units_path, &odds_path).unwrap_err();
    match err {
        LoadError::Schema { missing, .. } => assert_eq!(missing.len(), 4),
        other => panic!("expected Schema error, got {other:?}"),
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn metadata_attaches_to_model_rows() {
    let dir = temp_dir("metadata");
    let units_path = dir.join("units.csv");
    let odds_path = dir.join("odds.csv");
    let teams_path = dir.join("teams.csv");
    fs::write(&units_path, UNITS).unwrap();
    fs::write(&odds_path, ODDS).unwrap();
    fs::write(
        &teams_path,
        "team_abbr,team_name,team_color,team_color2\nKC,Kansas City Chiefs,#E31837,#FFB612\n",
    )
    .unwrap();

    let tables = load_tables(&units_path, &odds_path).unwrap();
    let metadata = load_team_metadata(&teams_path).unwrap();
    let model = ModelBuilder::new(&tables.units, &tables.odds)
        .with_metadata(&metadata)
        .build("Fanduel")
        .unwrap();

    let kc = model.units.iter().find(|u| u.team == "KC").unwrap();
    assert_eq!(kc.team_meta.as_ref().unwrap().color, "#E31837");
    let buf = model.units.iter().find(|u| u.team == "BUF").unwrap();
    assert!(buf.team_meta.is_none());

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn fetch_from_unreachable_host_is_http_error() {
    let client = reqwest::Client::new();
    let err = fetch_team_metadata(&client, "http://127.0.0.1:9/teams.csv")
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Http { .. }));
}
