use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::theme;
use crate::notify::toast::Toast;
use crate::notify::NotificationLevel;

/// Render the visible notifications, newest last
pub fn render(frame: &mut Frame, toasts: &[Toast], area: Rect) {
    let lines: Vec<Line> = toasts
        .iter()
        .map(|toast| {
            let (icon, style) = match toast.level {
                NotificationLevel::Info => (theme::ICON_INFO, theme::style_accent()),
                NotificationLevel::Error => (theme::ICON_ERROR, theme::style_error()),
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", toast.shown_at.format("%H:%M:%S")),
                    theme::style_dim(),
                ),
                Span::styled(format!("{icon} "), style),
                Span::styled(toast.text.clone(), style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Notifications ", theme::style_dim()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border())
        .style(theme::style_default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
