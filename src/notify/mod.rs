pub mod toast;

use tracing::{error, warn};

use crate::error::SwitcherResult;
use crate::guard::{SharedSubsystem, Subsystem};

pub use toast::ToastBoard;

/// Severity of an on-screen notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Backend that actually puts notifications on screen.
pub trait NotificationSink: Send + Sync + 'static {
    fn init(&self) -> SwitcherResult<()>;

    fn deinit(&self);

    /// How long a notification of `level` stays up before fading out
    fn set_fade_delay(&self, level: NotificationLevel, secs: f32);

    fn emit(&self, level: NotificationLevel, text: &str);
}

/// Prefixed notifications, shared through a [`SharedSubsystem`].
pub struct Notifications {
    prefix: String,
    fade_delay_secs: f32,
    sink: Box<dyn NotificationSink>,
}

impl Notifications {
    pub fn new(prefix: &str, fade_delay_secs: f32, sink: impl NotificationSink) -> Self {
        let prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("[{prefix}] ")
        };
        Self {
            prefix,
            fade_delay_secs,
            sink: Box::new(sink),
        }
    }

}

impl Subsystem for Notifications {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn initialize(&self) -> SwitcherResult<()> {
        self.sink.init()?;
        self.sink
            .set_fade_delay(NotificationLevel::Info, self.fade_delay_secs);
        self.sink
            .set_fade_delay(NotificationLevel::Error, self.fade_delay_secs);
        Ok(())
    }

    fn finalize(&self) {
        self.sink.deinit();
    }
}

impl SharedSubsystem<Notifications> {
    pub fn info(&self, msg: &str) {
        self.emit(NotificationLevel::Info, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(NotificationLevel::Error, msg);
    }

    /// Error notification plus a persistent log line.
    pub fn report_error(&self, msg: &str) {
        self.error(msg);
        error!(target: "net_switcher::notify", "{}", msg);
    }

    fn emit(&self, level: NotificationLevel, msg: &str) {
        let shown = self.with_live(|notifications| {
            let full = format!("{}{}", notifications.prefix, msg);
            notifications.sink.emit(level, &full);
        });
        if shown.is_none() {
            warn!("notifications used before initialization, dropping: {}", msg);
        }
    }
}
