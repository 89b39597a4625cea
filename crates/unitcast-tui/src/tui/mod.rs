// Terminal dashboard: layout, input handling and widget rendering.
//
// `App` owns the data and the built model. The TUI keeps a `ViewState` with
// the presentation controls (baseline, filters, chart selection, scroll).
// Only a source change goes back to `App` for a rebuild; every other key
// mutates `ViewState` and the next render tick picks it up (~30 fps).

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tracing::{error, info};
use unitcast_core::model::baseline::Baseline;
use unitcast_core::model::view::{present_positions, teams, UnitFilter};
use unitcast_core::model::Metric;
use unitcast_core::{BuiltModel, Position};

use crate::app::App;
use crate::config::DashboardConfig;
use layout::build_layout;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Key presses that need more than a `ViewState` change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextSource,
    PreviousSource,
    Quit,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Presentation state for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Baseline used for the rank order and the value column.
    pub baseline: Baseline,
    /// Rank table position filter (`None` = all positions).
    pub position_filter: Option<Position>,
    /// Rank table team filter (`None` = all teams).
    pub team_filter: Option<String>,
    /// Position shown in the bar chart.
    pub chart_position: Option<Position>,
    /// Metric plotted in the bar chart.
    pub chart_metric: Metric,
    /// First visible row of the rank table.
    pub scroll_offset: usize,
    /// Positions present in the current model, in display order.
    pub positions: Vec<Position>,
    /// Teams present in the current model, sorted.
    pub teams: Vec<String>,
    /// Every (team, position) in the current model; used to bound scrolling.
    pub unit_keys: Vec<(String, Position)>,
    /// Last error to show in the help bar.
    pub status_message: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            baseline: Baseline::Average,
            position_filter: None,
            team_filter: None,
            chart_position: None,
            chart_metric: Metric::ExpectedPoints,
            scroll_offset: 0,
            positions: Vec::new(),
            teams: Vec::new(),
            unit_keys: Vec::new(),
            status_message: None,
        }
    }
}

impl ViewState {
    pub fn from_config(dashboard: &DashboardConfig) -> Self {
        ViewState {
            baseline: dashboard.baseline,
            chart_metric: dashboard.chart_metric,
            ..ViewState::default()
        }
    }

    /// Refresh the selectable positions and teams after a build. Selections
    /// that no longer exist are cleared; the chart falls back to the first
    /// present position.
    pub fn sync_model(&mut self, model: &BuiltModel) {
        self.positions = present_positions(&model.units);
        self.teams = teams(&model.units);
        self.unit_keys = model
            .units
            .iter()
            .map(|u| (u.team.clone(), u.position))
            .collect();

        if self
            .position_filter
            .is_some_and(|p| !self.positions.contains(&p))
        {
            self.position_filter = None;
        }
        if self
            .team_filter
            .as_ref()
            .is_some_and(|t| !self.teams.contains(t))
        {
            self.team_filter = None;
        }
        if !self
            .chart_position
            .is_some_and(|p| self.positions.contains(&p))
        {
            self.chart_position = self.positions.first().copied();
        }
        self.scroll_offset = self.scroll_offset.min(self.filtered_len().saturating_sub(1));
    }

    /// Filter for the rank table built from the current selections.
    pub fn unit_filter(&self) -> UnitFilter {
        let mut filter = UnitFilter::default();
        if let Some(position) = self.position_filter {
            filter = filter.with_position(position);
        }
        if let Some(team) = &self.team_filter {
            filter = filter.with_team(team.clone());
        }
        filter
    }

    /// Number of rank table rows left after filtering.
    pub fn filtered_len(&self) -> usize {
        self.unit_keys
            .iter()
            .filter(|(team, position)| {
                self.position_filter.map_or(true, |p| p == *position)
                    && self.team_filter.as_ref().map_or(true, |t| t == team)
            })
            .count()
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, app: &App, state: &ViewState, title: &str) {
    let layout = build_layout(frame.area());
    let model = app.model();

    widgets::status_bar::render_title(frame, layout.title_bar, title, app, state);
    widgets::rankings::render(frame, layout.rankings, model, state);
    widgets::chart::render(frame, layout.chart, model, state);
    widgets::distribution::render_sources(frame, layout.sources, app);
    widgets::distribution::render_table(frame, layout.distribution, model);
    widgets::status_bar::render_help(frame, layout.help_bar, state);
}

/// Apply a command that needs the app. Returns false when the loop should stop.
fn apply_command(command: Command, app: &mut App, state: &mut ViewState) -> bool {
    let result = match command {
        Command::Quit => return false,
        Command::NextSource => app.cycle_source(1),
        Command::PreviousSource => app.cycle_source(-1),
    };
    match result {
        Ok(()) => state.status_message = None,
        Err(e) => {
            error!("rebuild failed: {}", e);
            state.status_message = Some(format!("rebuild failed: {e}"));
        }
    }
    state.sync_model(app.model());
    true
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the dashboard until the user quits.
///
/// Takes over the terminal (raw mode, alternate screen), restores it on exit
/// and from a panic hook.
pub async fn run(mut app: App, mut view_state: ViewState, title: String) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    view_state.sync_model(app.model());

    let mut event_stream = EventStream::new();
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            if !apply_command(command, &mut app, &mut view_state) {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &app, &view_state, &title))?;
            }
        }
    }

    ratatui::restore();
    info!("dashboard closed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
