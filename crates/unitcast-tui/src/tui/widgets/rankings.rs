// Rank table widget: every unit ordered by overall rank for the active
// baseline, with the position/team filters applied.
//
// Ranks shown are the ones computed on the full table, so filtered views
// have gaps in the Overall Rank column.

use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table};
use ratatui::Frame;
use unitcast_core::model::baseline::Baseline;
use unitcast_core::model::build::UnitMetrics;
use unitcast_core::model::view::rank_view;
use unitcast_core::BuiltModel;

use crate::tui::ViewState;

/// Render the rank table into the given area.
pub fn render(frame: &mut Frame, area: Rect, model: &BuiltModel, state: &ViewState) {
    let filtered = rank_view(&model.units, state.baseline, &state.unit_filter());

    // Borders and header row.
    let visible_rows = (area.height as usize).saturating_sub(3);
    let total = filtered.len();
    let scroll_offset = state.scroll_offset.min(total.saturating_sub(1));

    let header = Row::new(header_labels(state.baseline).map(Cell::from))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = filtered
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|unit| Row::new(row_cells(unit, state.baseline).map(Cell::from)))
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(7),
        Constraint::Length(13),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(build_title(state, total)))
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_widget(table, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Column headers; the last one names the active baseline.
pub fn header_labels(baseline: Baseline) -> [String; 7] {
    [
        "Overall Rank".to_string(),
        "Unit".to_string(),
        "Position Rank".to_string(),
        "PPG".to_string(),
        "PPG Rank".to_string(),
        "Exp Pts".to_string(),
        value_label(baseline).to_string(),
    ]
}

pub fn value_label(baseline: Baseline) -> &'static str {
    match baseline {
        Baseline::Average => "Exp Pts vs Pos Avg",
        Baseline::Minimum => "Exp Pts vs Pos Min",
    }
}

/// Display strings for one unit row.
pub fn row_cells(unit: &UnitMetrics, baseline: Baseline) -> [String; 7] {
    [
        unit.overall_rank(baseline).to_string(),
        unit.unit_label(),
        unit.position_rank.to_string(),
        format!("{:.2}", unit.reg_ppg),
        unit.ppg_rank.to_string(),
        format!("{:.2}", unit.expected_points),
        format!("{:.2}", unit.value_vs(baseline)),
    ]
}

fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Unit Rankings");
    if let Some(position) = state.position_filter {
        title.push_str(&format!(" [{}]", position));
    }
    if let Some(team) = &state.team_filter {
        title.push_str(&format!(" [{}]", team));
    }
    title.push_str(&format!(" ({})", filtered_count));
    Line::from(title)
}
