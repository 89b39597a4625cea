// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------------------+
// | Title Bar (1 row)                                            |
// +--------------------+-------------------+---------------------+
// | Rank Table (45%)   | Bar Chart (28%)   | Odds Source (7)     |
// |                    |                   +---------------------+
// |                    |                   | Distribution (fill) |
// +--------------------+-------------------+---------------------+
// | Help Bar (1 row)                                             |
// +--------------------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Dashboard title, selected source and active controls.
    pub title_bar: Rect,
    /// Left column: globally ranked unit table.
    pub rankings: Rect,
    /// Middle column: per-position bar chart.
    pub chart: Rect,
    /// Right column top: odds source selector.
    pub sources: Rect,
    /// Right column bottom: team playoff-games distribution.
    pub distribution: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(10),   // panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(28),
            Constraint::Percentage(27),
        ])
        .split(vertical[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(columns[2]);

    AppLayout {
        title_bar: vertical[0],
        rankings: columns[0],
        chart: columns[1],
        sources: right[0],
        distribution: right[1],
        help_bar: vertical[2],
    }
}
