// Keyboard input handling.
//
// Source changes and quit become `Command`s for the run loop; everything
// else mutates `ViewState` directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unitcast_core::model::Metric;

use super::{Command, ViewState};

const PAGE_SIZE: usize = 10;

/// Handle a keyboard event. Returns a command when the key needs the app.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<Command> {
    // crossterm reports Press and Release on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match key_event.code {
        KeyCode::Char('q') => Some(Command::Quit),

        // Odds source (full rebuild)
        KeyCode::Char('s') => Some(Command::NextSource),
        KeyCode::Char('S') => Some(Command::PreviousSource),

        KeyCode::Char('b') => {
            view_state.baseline = view_state.baseline.toggle();
            view_state.scroll_offset = 0;
            None
        }

        // Rank table filters
        KeyCode::Char('p') => {
            view_state.position_filter =
                cycle_option(view_state.position_filter.as_ref(), &view_state.positions);
            view_state.scroll_offset = 0;
            None
        }
        KeyCode::Char('t') => {
            view_state.team_filter =
                cycle_option(view_state.team_filter.as_ref(), &view_state.teams);
            view_state.scroll_offset = 0;
            None
        }
        KeyCode::Esc => {
            view_state.position_filter = None;
            view_state.team_filter = None;
            view_state.scroll_offset = 0;
            None
        }

        // Chart controls
        KeyCode::Char('c') => {
            view_state.chart_position =
                cycle_wrapping(view_state.chart_position.as_ref(), &view_state.positions);
            None
        }
        KeyCode::Char('m') => {
            view_state.chart_metric = match view_state.chart_metric {
                Metric::ExpectedPoints => Metric::RegPpg,
                _ => Metric::ExpectedPoints,
            };
            None
        }

        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            view_state.scroll_offset = 0;
            None
        }

        _ => None,
    }
}

/// Step `None -> first -> ... -> last -> None`.
fn cycle_option<T: Clone + PartialEq>(current: Option<&T>, options: &[T]) -> Option<T> {
    match current.and_then(|c| options.iter().position(|o| o == c)) {
        None => options.first().cloned(),
        Some(i) => options.get(i + 1).cloned(),
    }
}

/// Step `first -> ... -> last -> first`.
fn cycle_wrapping<T: Clone + PartialEq>(current: Option<&T>, options: &[T]) -> Option<T> {
    cycle_option(current, options).or_else(|| options.first().cloned())
}

fn scroll_up(view_state: &mut ViewState, amount: usize) {
    view_state.scroll_offset = view_state.scroll_offset.saturating_sub(amount);
}

fn scroll_down(view_state: &mut ViewState, amount: usize) {
    let max = view_state.filtered_len().saturating_sub(1);
    view_state.scroll_offset = (view_state.scroll_offset + amount).min(max);
}
