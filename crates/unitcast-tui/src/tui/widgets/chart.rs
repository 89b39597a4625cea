// Bar chart widget: one position's units sorted by the chosen metric, bars
// in team colours, with the position mean in the title.

use ratatui::layout::{Direction, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;
use unitcast_core::model::build::UnitMetrics;
use unitcast_core::model::view::{position_series, PositionSeries};
use unitcast_core::model::Metric;
use unitcast_core::{BuiltModel, TeamMeta};

use crate::tui::ViewState;

/// Bar colour when a team has no metadata.
pub const FALLBACK_COLOR: &str = "#888888";
/// Value-label background when a team has no metadata.
pub const FALLBACK_COLOR2: &str = "#222222";

/// Render the chart for the selected position into the given area.
pub fn render(frame: &mut Frame, area: Rect, model: &BuiltModel, state: &ViewState) {
    let Some(position) = state.chart_position else {
        let paragraph = Paragraph::new("  No units to chart.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Chart"));
        frame.render_widget(paragraph, area);
        return;
    };

    let series = position_series(&model.units, position, state.chart_metric);
    let bars: Vec<Bar> = series
        .rows
        .iter()
        .map(|unit| unit_bar(unit, series.metric))
        .collect();
    let max = bars_max(&series);

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(chart_title(&series)))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max.max(1));
    frame.render_widget(chart, area);
}

/// e.g. `"QB | Expected Playoff Points | Avg: 41.20"`
pub fn chart_title(series: &PositionSeries<'_>) -> String {
    let mut title = format!("{} | {}", series.position, series.metric.label());
    if let Some(mean) = series.mean {
        title.push_str(&format!(" | Avg: {:.2}", mean));
    }
    title
}

fn unit_bar(unit: &UnitMetrics, metric: Metric) -> Bar<'static> {
    let value = unit.metric(metric);
    let (color, color2) = bar_colors(unit.team_meta.as_ref());
    Bar::default()
        .label(Line::from(unit.team.clone()))
        .value(scaled(value))
        .text_value(format!("{:.2}", value))
        .style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::White).bg(color2))
}

fn bars_max(series: &PositionSeries<'_>) -> u64 {
    series
        .rows
        .iter()
        .map(|unit| scaled(unit.metric(series.metric)))
        .max()
        .unwrap_or(0)
}

/// Bar heights are integers; keep two decimals of resolution.
fn scaled(value: f64) -> u64 {
    (value.max(0.0) * 100.0).round() as u64
}

/// Primary and secondary team colours, with grey fallbacks.
pub fn bar_colors(meta: Option<&TeamMeta>) -> (Color, Color) {
    let pick = |hex: Option<&str>, fallback: &str| {
        hex.and_then(hex_color)
            .or_else(|| hex_color(fallback))
            .unwrap_or(Color::Gray)
    };
    (
        pick(meta.map(|m| m.color.as_str()), FALLBACK_COLOR),
        pick(meta.map(|m| m.color2.as_str()), FALLBACK_COLOR2),
    )
}

/// Parse `#RRGGBB` into an RGB colour.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
