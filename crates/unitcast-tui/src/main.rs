// Unitcast entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the unit and odds tables, then team metadata
// 4. Build the model for the preferred odds source
// 5. Print JSON (--json) or run the dashboard until the user quits

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use unitcast_data::load_tables;
use unitcast_tui::app::{load_display_metadata, App};
use unitcast_tui::config;
use unitcast_tui::export;
use unitcast_tui::tui::{self, ViewState};

#[derive(Debug, Parser)]
#[command(name = "unitcast", about = "Playoff expected-points dashboard for NFL position units")]
struct Cli {
    /// Print the built model as JSON to stdout instead of opening the dashboard.
    #[arg(long)]
    json: bool,

    /// Odds source to build for; overrides `dashboard.default_source`.
    #[arg(long)]
    source: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("unitcast starting up");

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = config::load_config(&cwd).context("failed to load configuration")?;
    info!(
        "config loaded: points={}, odds={}",
        config.data.points, config.data.odds
    );

    let tables = load_tables(Path::new(&config.data.points), Path::new(&config.data.odds))
        .context("failed to load input tables")?;
    let metadata = load_display_metadata(&config).await;

    let source = cli
        .source
        .as_deref()
        .unwrap_or(&config.dashboard.default_source);
    let app = App::new(tables, metadata, source).context("failed to build model")?;

    if cli.json {
        export::write_json(app.model(), std::io::stdout().lock())
            .context("failed to write JSON export")?;
        info!("JSON export written");
        return Ok(());
    }

    let view_state = ViewState::from_config(&config.dashboard);
    tui::run(app, view_state, config.dashboard.title.clone()).await?;

    info!("unitcast shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("unitcast.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("unitcast=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
