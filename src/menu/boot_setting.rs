use tracing::{debug, error, info};

use super::MenuAction;
use crate::context::NotificationService;
use crate::error::SwitcherResult;
use crate::platform::{NetConfig, ProfileId};

/// Which boot profile a setting edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSlot {
    Primary,
    Secondary,
}

impl BootSlot {
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Default profile",
            Self::Secondary => "Secondary profile",
        }
    }

    fn setter_name(self) -> &'static str {
        match self {
            Self::Primary => "set_default_boot_id",
            Self::Secondary => "set_secondary_boot_id",
        }
    }

    fn read(self, service: &dyn NetConfig) -> SwitcherResult<u8> {
        match self {
            Self::Primary => service.default_boot_id(),
            Self::Secondary => service.secondary_boot_id(),
        }
    }

    fn write(self, service: &dyn NetConfig, id: ProfileId) -> SwitcherResult<()> {
        match self {
            Self::Primary => service.set_default_boot_id(id),
            Self::Secondary => service.set_secondary_boot_id(id),
        }
    }
}

/// Bounded integer setting for one boot profile id.
pub struct BootSettingItem {
    slot: BootSlot,
    value: ProfileId,
    status: String,
}

impl BootSettingItem {
    /// Read the current value, falling back to `fallback` if the platform
    /// can't say or reports something outside `1..=6`.
    pub fn load(slot: BootSlot, service: &dyn NetConfig, fallback: ProfileId) -> Self {
        let value = match slot.read(service).and_then(ProfileId::new) {
            Ok(id) => id,
            Err(e) => {
                debug!("{}: using {} ({})", slot.label(), fallback, e);
                fallback
            }
        };
        Self {
            slot,
            value,
            status: value.to_string(),
        }
    }

    pub fn slot(&self) -> BootSlot {
        self.slot
    }

    pub fn value(&self) -> ProfileId {
        self.value
    }

    /// Write the edited value back if the platform's current value differs.
    ///
    /// Skipped when the platform can't be re-read. Returns whether a write
    /// happened and succeeded.
    pub fn commit(&self, service: &dyn NetConfig, notify: &NotificationService) -> bool {
        let current = match self.slot.read(service) {
            Ok(current) => current,
            Err(e) => {
                debug!("{}: re-read failed, not committing: {}", self.slot.label(), e);
                return false;
            }
        };
        if current == self.value.get() {
            return false;
        }

        let name = self.slot.label().to_lowercase();
        match self.slot.write(service, self.value) {
            Ok(()) => {
                info!("{} changed from {} to {}", self.slot.label(), current, self.value);
                notify.info(&format!("Set {} to {}", name, self.value));
                true
            }
            Err(e) => {
                notify.error(&format!("Could not set {} to {}", name, self.value));
                error!("{}({}) failed: {}", self.slot.setter_name(), self.value, e);
                false
            }
        }
    }
}

impl MenuAction for BootSettingItem {
    fn label(&self) -> &str {
        self.slot.label()
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn adjust(&mut self, delta: i32) {
        let next = (self.value.get() as i32 + delta).clamp(ProfileId::MIN as i32, ProfileId::MAX as i32);
        if let Ok(id) = ProfileId::new(next as u8) {
            self.value = id;
            self.status = id.to_string();
        }
    }
}
