use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Local};

use super::{NotificationLevel, NotificationSink};
use crate::error::{SwitcherError, SwitcherResult};

/// Upper bound on toasts kept around at once
const MAX_TOASTS: usize = 5;

/// A notification currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: NotificationLevel,
    pub text: String,
    pub shown_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

#[derive(Debug, Default)]
struct BoardState {
    initialized: bool,
    fade_delays: HashMap<NotificationLevel, f32>,
    toasts: VecDeque<Toast>,
}

/// In-terminal notification sink; the UI renders whatever is visible.
#[derive(Debug, Clone, Default)]
pub struct ToastBoard {
    state: Arc<Mutex<BoardState>>,
}

impl ToastBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop expired toasts and return the rest, oldest first.
    pub fn visible(&self, now: DateTime<Local>) -> Vec<Toast> {
        let mut state = self.lock();
        state.toasts.retain(|t| t.expires_at > now);
        state.toasts.iter().cloned().collect()
    }
}

impl NotificationSink for ToastBoard {
    fn init(&self) -> SwitcherResult<()> {
        let mut state = self.lock();
        if state.initialized {
            return Err(SwitcherError::SubsystemInit {
                subsystem: "notifications",
                reason: "toast board already initialized".into(),
            });
        }
        state.initialized = true;
        Ok(())
    }

    fn deinit(&self) {
        let mut state = self.lock();
        state.initialized = false;
        state.fade_delays.clear();
    }

    fn set_fade_delay(&self, level: NotificationLevel, secs: f32) {
        self.lock().fade_delays.insert(level, secs);
    }

    fn emit(&self, level: NotificationLevel, text: &str) {
        let mut state = self.lock();
        if !state.initialized {
            return;
        }
        let secs = state.fade_delays.get(&level).copied().unwrap_or(5.0);
        let shown_at = Local::now();
        let expires_at = shown_at + Duration::milliseconds((secs * 1000.0) as i64);
        state.toasts.push_back(Toast {
            level,
            text: text.to_string(),
            shown_at,
            expires_at,
        });
        while state.toasts.len() > MAX_TOASTS {
            state.toasts.pop_front();
        }
    }
}
