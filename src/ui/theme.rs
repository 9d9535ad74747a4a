use ratatui::style::{Color, Modifier, Style};

// ─── Glyphs ────────────────────────────────────────────────────────────────
pub const ARROW: &str = "▶";
pub const ICON_ERROR: &str = "✖";
pub const ICON_INFO: &str = "●";
pub const ADJUST_LEFT: &str = "◀";
pub const ADJUST_RIGHT: &str = "▶";

// ─── Color Palette (terminal-adaptive, transparency-friendly) ──────────

/// Background: always Reset (transparent), respects terminal background
pub const BG: Color = Color::Reset;

/// Primary text color
pub const FG: Color = Color::White;

/// Dimmed text (labels, inactive elements)
pub const FG_DIM: Color = Color::DarkGray;

/// Accent color (selected items, active borders, keybinding hints)
pub const ACCENT: Color = Color::Cyan;

/// Border color (inactive)
pub const BORDER: Color = Color::DarkGray;

/// Border color (focused/active panel)
pub const BORDER_FOCUSED: Color = Color::Cyan;

/// Finished switch
pub const SUCCESS: Color = Color::Green;

/// Canceled switch
pub const WARNING: Color = Color::Yellow;

/// Error color
pub const ERROR: Color = Color::Red;

/// Selected item background (only element that gets a bg)
pub const SELECTED_BG: Color = Color::DarkGray;

// ─── Style Constructors ──────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(FG).bg(BG)
}

pub fn style_dim() -> Style {
    Style::default().fg(FG_DIM).bg(BG)
}

pub fn style_accent() -> Style {
    Style::default().fg(ACCENT).bg(BG)
}

pub fn style_accent_bold() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default()
        .fg(FG)
        .bg(SELECTED_BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_success() -> Style {
    Style::default()
        .fg(SUCCESS)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_error() -> Style {
    Style::default().fg(ERROR).bg(BG)
}

pub fn style_warning() -> Style {
    Style::default().fg(WARNING).bg(BG)
}

pub fn style_border() -> Style {
    Style::default().fg(BORDER).bg(BG)
}

pub fn style_border_focused() -> Style {
    Style::default().fg(BORDER_FOCUSED).bg(BG)
}

pub fn style_key_hint() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_key_desc() -> Style {
    Style::default().fg(FG_DIM).bg(BG)
}
