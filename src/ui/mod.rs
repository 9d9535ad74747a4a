pub mod header;
pub mod menu_list;
pub mod status_bar;
pub mod theme;
pub mod toasts;

use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::App;

/// Top-level draw function
pub fn draw(f: &mut Frame, app: &App) {
    let visible = app.toasts.visible(Local::now());
    let toast_height = if visible.is_empty() {
        0
    } else {
        visible.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(toast_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    menu_list::render(f, app, chunks[1]);
    if !visible.is_empty() {
        toasts::render(f, &visible, chunks[2]);
    }
    status_bar::render(f, app, chunks[3]);
}
