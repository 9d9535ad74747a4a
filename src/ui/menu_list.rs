use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme;
use crate::animation::spinner;
use crate::app::App;
use crate::menu::{ItemState, MenuAction, MenuItem};
use crate::profile::SlotContent;
use crate::switch::CANCELED_REASON;

const LABEL_WIDTH: usize = 20;

/// Render the settings menu
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.menu.items().len();
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" Settings ({count}) "),
            theme::style_accent_bold(),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border())
        .style(theme::style_default());

    if app.is_disabled() {
        let msg = match &app.open_error {
            Some(e) => format!("Profiles unavailable: {e}"),
            None => "Profiles unavailable".to_string(),
        };
        let para = Paragraph::new(msg)
            .block(block)
            .style(theme::style_error())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(para, area);
        return;
    }

    let status_width = (area.width as usize).saturating_sub(LABEL_WIDTH + 8);
    let items: Vec<ListItem> = app
        .menu
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let is_selected = idx == app.selected_index;

            let selector = if is_selected {
                Span::styled(format!("{} ", theme::ARROW), theme::style_accent())
            } else {
                Span::styled("  ", theme::style_default())
            };

            // Activity indicator
            let indicator = if item.is_busy() {
                Span::styled(
                    format!("{} ", spinner::spinner_frame(app.animation.tick_count)),
                    theme::style_accent(),
                )
            } else {
                Span::raw("  ")
            };

            let label_style = if is_selected {
                theme::style_selected()
            } else {
                theme::style_default()
            };
            let label = Span::styled(fit_width(item.label(), LABEL_WIDTH), label_style);

            let status_text = if item.is_setting() && is_selected {
                format!(
                    "{} {} {}",
                    theme::ADJUST_LEFT,
                    item.status(),
                    theme::ADJUST_RIGHT
                )
            } else {
                item.status().to_string()
            };
            let status = Span::styled(
                fit_width(&status_text, status_width),
                status_style(item, is_selected),
            );

            ListItem::new(Line::from(vec![selector, indicator, label, Span::raw(" "), status]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_symbol("");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn status_style(item: &MenuItem, is_selected: bool) -> Style {
    let status = item.status();
    match item {
        MenuItem::ProfileSwitch(profile) => {
            if profile.state() != ItemState::Ready {
                theme::style_accent()
            } else if status.starts_with("Done!") {
                theme::style_success()
            } else if status == CANCELED_REASON {
                theme::style_warning()
            } else if status != profile.descriptor().summary() {
                theme::style_error()
            } else {
                match profile.descriptor().content() {
                    SlotContent::Empty => theme::style_dim(),
                    SlotContent::Unreadable => theme::style_error(),
                    SlotContent::Configured(_) => theme::style_default(),
                }
            }
        }
        MenuItem::Disconnect(_) => match status {
            "Done!" => theme::style_success(),
            "Error!" => theme::style_error(),
            _ => theme::style_default(),
        },
        MenuItem::BootSetting(_) if is_selected => theme::style_accent_bold(),
        MenuItem::BootSetting(_) => theme::style_default(),
    }
}

/// Pad or truncate `text` to exactly `width` terminal columns.
fn fit_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let text_width = text.width();
    if text_width <= width {
        return format!("{text}{}", " ".repeat(width - text_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out.push_str(&" ".repeat(width - 1 - used));
    out
}
