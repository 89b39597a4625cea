// Title and help bars.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::tui::ViewState;

const HELP: &str =
    " q:Quit | s/S:Source | b:Baseline | p:Position | t:Team | Esc:Clear | c:Chart | m:Metric | \u{2191}\u{2193}:Scroll";

/// Title, selected source, baseline and warning count.
pub fn render_title(frame: &mut Frame, area: Rect, title: &str, app: &App, state: &ViewState) {
    let paragraph =
        Paragraph::new(title_line(title, app, state)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn title_line(title: &str, app: &App, state: &ViewState) -> Line<'static> {
    let model = app.model();
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![
        Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            format!(
                "Source: {} ({}/{})",
                model.selected_source,
                app.source_index() + 1,
                app.sources().len()
            ),
            Style::default().fg(Color::Cyan),
        ),
        separator(),
        Span::raw(format!("Baseline: {}", state.baseline.label())),
    ];

    let warnings = model.diagnostics.warnings.len();
    if warnings > 0 {
        spans.push(separator());
        spans.push(Span::styled(
            format!("{} data warnings (see log)", warnings),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

/// Key hints, or the last error when there is one.
pub fn render_help(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.status_message {
        Some(message) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            HELP,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
