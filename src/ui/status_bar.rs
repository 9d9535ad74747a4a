use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::theme;
use crate::app::App;
use crate::menu::MenuAction;

/// Render the bottom status bar with context-sensitive keybinding hints
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if app.is_disabled() {
        disabled_hints()
    } else {
        match app.menu.items().get(app.selected_index) {
            Some(item) if item.is_setting() => setting_hints(),
            Some(item) if item.is_busy() => busy_hints(),
            _ => button_hints(),
        }
    };

    let para = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn button_hints() -> Vec<Span<'static>> {
    vec![
        key("↑↓/jk"),
        desc("Navigate "),
        key("Enter"),
        desc("Start "),
        key("q"),
        desc("Close"),
    ]
}

fn busy_hints() -> Vec<Span<'static>> {
    vec![
        key("↑↓/jk"),
        desc("Navigate "),
        key("Esc/b"),
        desc("Cancel "),
        key("q"),
        desc("Close"),
    ]
}

fn setting_hints() -> Vec<Span<'static>> {
    vec![
        key("↑↓/jk"),
        desc("Navigate "),
        key("←→/hl"),
        desc("Change "),
        key("q"),
        desc("Save & close"),
    ]
}

fn disabled_hints() -> Vec<Span<'static>> {
    vec![key("q"), desc("Quit")]
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(format!(" [{k}] "), theme::style_key_hint())
}

fn desc(d: &'static str) -> Span<'static> {
    Span::styled(d, theme::style_key_desc())
}
