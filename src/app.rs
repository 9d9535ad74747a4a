use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error};

use crate::animation::AnimationState;
use crate::event::Event;
use crate::menu::{MenuAction, SwitcherMenu};
use crate::notify::toast::ToastBoard;

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub menu: SwitcherMenu,
    pub toasts: ToastBoard,
    pub selected_index: usize,
    pub should_quit: bool,
    pub animation: AnimationState,

    /// Set when the menu could not be opened; the list renders disabled
    pub open_error: Option<String>,

    /// Shown in the header
    pub store_label: String,
}

impl App {
    pub fn new(menu: SwitcherMenu, toasts: ToastBoard, store_label: impl Into<String>) -> Self {
        Self {
            menu,
            toasts,
            selected_index: 0,
            should_quit: false,
            animation: AnimationState::default(),
            open_error: None,
            store_label: store_label.into(),
        }
    }

    /// Open the settings menu. A failure leaves it disabled rather than
    /// ending the program.
    pub fn open_menu(&mut self) {
        self.selected_index = 0;
        match self.menu.open() {
            Ok(()) => self.open_error = None,
            Err(e) => {
                error!("Could not open menu: {}", e);
                self.open_error = Some(e.to_string());
            }
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.open_error.is_some() || self.menu.items().is_empty()
    }

    /// Close the menu (cancel, commit, release) and stop the loop.
    pub fn quit(&mut self) {
        self.menu.close();
        self.should_quit = true;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.quit();
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit();
                return;
            }
            _ => {}
        }

        if self.is_disabled() {
            return;
        }

        let index = self.selected_index;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter => self.menu.start(index),
            KeyCode::Esc | KeyCode::Char('b') => self.menu.cancel(index),
            KeyCode::Left | KeyCode::Char('h') => self.menu.adjust(index, -1),
            KeyCode::Right | KeyCode::Char('l') => self.menu.adjust(index, 1),
            _ => {}
        }
    }

    fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn select_next(&mut self) {
        let last = self.menu.items().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(last);
    }

    /// Process an application event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {
                self.animation.tick();
                // Catches completions whose wake-up raced a menu close/reopen
                self.menu.finish_ready();
            }
            Event::SwitchFinished(index) => {
                if !self.menu.finish(index) {
                    debug!("Finish for item {} had nothing to deliver", index);
                }
            }
            Event::Resize(_w, _h) => {
                // Terminal resized, ratatui redraws automatically
            }
        }
    }

    /// True while any item has an operation in flight
    pub fn is_busy(&self) -> bool {
        self.menu.items().iter().any(|item| item.is_busy())
    }
}
