use tracing::info;

use super::MenuAction;
use crate::context::Subsystems;
use crate::error::SwitcherResult;

/// Inline "disconnect everything" button.
pub struct DisconnectItem {
    status: String,
    subsystems: Subsystems,
}

impl DisconnectItem {
    pub fn new(subsystems: Subsystems) -> Self {
        Self {
            status: String::new(),
            subsystems,
        }
    }

    fn disconnect(&self) -> SwitcherResult<()> {
        let service = self.subsystems.platform.acquire()?;
        service.disconnect_all()
    }
}

impl MenuAction for DisconnectItem {
    fn label(&self) -> &str {
        "Disconnect all"
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn on_started(&mut self) {
        match self.disconnect() {
            Ok(()) => {
                info!("Disconnected all profiles");
                self.status = "Done!".into();
                self.subsystems.notifications.info("Disconnected");
            }
            Err(e) => {
                self.status = "Error!".into();
                self.subsystems
                    .notifications
                    .report_error(&format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationLevel, Notifications};
    use crate::testing::{FakeNetConfig, RecordingSink};

    fn item(fake: &FakeNetConfig, sink: &RecordingSink) -> DisconnectItem {
        DisconnectItem::new(Subsystems::new(
            Notifications::new("test", 5.0, sink.clone()),
            fake.clone(),
        ))
    }

    #[test]
    fn test_disconnect_reports_done() {
        let fake = FakeNetConfig::default();
        let sink = RecordingSink::default();
        let mut item = item(&fake, &sink);

        item.on_started();
        assert_eq!(item.status(), "Done!");
        assert_eq!(fake.disconnect_calls(), 1);
        assert_eq!(fake.inits(), 1);
        assert_eq!(fake.finalizes(), 1);
    }

    #[test]
    fn test_disconnect_failure_reports_error() {
        let fake = FakeNetConfig::default();
        fake.fail_disconnect(true);
        let sink = RecordingSink::default();
        let mut item = item(&fake, &sink);
        let _notify = item.subsystems.notifications.acquire().unwrap();

        item.on_started();
        assert_eq!(item.status(), "Error!");
        assert_eq!(sink.count(NotificationLevel::Error), 1);
        assert!(!item.is_busy());
    }

    #[test]
    fn test_platform_unavailable_reports_error() {
        let fake = FakeNetConfig::default();
        fake.fail_init(true);
        let sink = RecordingSink::default();
        let mut item = item(&fake, &sink);

        item.on_started();
        assert_eq!(item.status(), "Error!");
        assert_eq!(fake.disconnect_calls(), 0);
    }
}
