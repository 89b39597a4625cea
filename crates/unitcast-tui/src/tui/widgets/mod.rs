// TUI widget modules for each dashboard panel.

pub mod chart;
pub mod distribution;
pub mod rankings;
pub mod status_bar;
