// Right column widgets: the odds source selector and the team
// playoff-games distribution table.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Row, Table};
use ratatui::Frame;
use unitcast_core::model::distribution::TeamDistributionRow;
use unitcast_core::BuiltModel;

use super::chart::bar_colors;
use crate::app::App;

const HEADERS: [&str; 7] = ["Team", "Exp Games", "Play 1", "Play 2", "Play 3", "Play 4", "Play 3+"];

/// Render the list of odds sources with the selected one highlighted.
pub fn render_sources(frame: &mut Frame, area: Rect, app: &App) {
    let selected = app.source_index();
    let items: Vec<ListItem> = app
        .sources()
        .iter()
        .enumerate()
        .map(|(i, source)| {
            if i == selected {
                ListItem::new(format!("> {}", source)).style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}", source))
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Odds Source (s/S)"),
    );
    frame.render_widget(list, area);
}

/// Render the team distribution table for the selected source.
pub fn render_table(frame: &mut Frame, area: Rect, model: &BuiltModel) {
    let header = Row::new(HEADERS.map(Cell::from))
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = model.teams.iter().map(team_row).collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Playoff Games"));
    frame.render_widget(table, area);
}

fn team_row(team: &TeamDistributionRow) -> Row<'static> {
    let (team_color, _) = bar_colors(team.team_meta.as_ref());
    let mut cells = vec![
        Cell::from(team.team.clone()).style(Style::default().fg(team_color)),
        Cell::from(team.labels.expected_games.clone()),
    ];
    cells.extend(
        [
            (&team.labels.play_1, team.distribution.play_1),
            (&team.labels.play_2, team.distribution.play_2),
            (&team.labels.play_3, team.distribution.play_3),
            (&team.labels.play_4, team.distribution.play_4),
            (&team.labels.play_3_plus, team.distribution.play_3_plus),
        ]
        .into_iter()
        .map(|(label, value)| Cell::from(label.clone()).style(mass_style(value))),
    );
    Row::new(cells)
}

/// Negative masses come from inconsistent odds and are shown in red.
fn mass_style(value: f64) -> Style {
    if value < 0.0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}
