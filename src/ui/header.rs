use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::theme;
use crate::animation::spinner;
use crate::app::App;

/// Render the application header bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![Span::styled(
        " Network Profiles ",
        theme::style_accent_bold(),
    )]);

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border_focused())
        .style(theme::style_default());

    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };

    let status = Paragraph::new(Line::from(build_status_spans(app))).alignment(Alignment::Right);
    frame.render_widget(status, inner);

    let store = Line::from(vec![Span::styled(
        format!("  {}", app.store_label),
        theme::style_dim(),
    )]);
    frame.render_widget(Paragraph::new(store).alignment(Alignment::Left), inner);
}

fn build_status_spans(app: &App) -> Vec<Span<'static>> {
    if app.open_error.is_some() {
        return vec![Span::styled("Unavailable ", theme::style_error())];
    }
    if app.is_busy() {
        let spin = spinner::spinner_frame(app.animation.tick_count);
        return vec![
            Span::styled(format!("{spin} "), theme::style_accent()),
            Span::styled("Switching… ", theme::style_dim()),
        ];
    }
    vec![Span::styled("Ready ", theme::style_dim())]
}
