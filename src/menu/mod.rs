//! The profile-switcher settings menu: item set and open/close brackets.

pub mod boot_setting;
pub mod disconnect_item;
pub mod profile_item;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::context::Subsystems;
use crate::error::SwitcherResult;
use crate::event::Event;
use crate::guard::SubsystemGuard;
use crate::notify::Notifications;
use crate::platform::{NetConfig, ProfileId};
use crate::profile::ProfileDescriptor;

pub use boot_setting::{BootSettingItem, BootSlot};
pub use disconnect_item::DisconnectItem;
pub use profile_item::{ItemState, ProfileSwitchItem};

/// What the host can do with a menu item.
///
/// Buttons receive `on_started`/`on_cancel`/`on_finished`; integer settings
/// receive `adjust`. Every item renders a status string.
pub trait MenuAction {
    fn label(&self) -> &str;

    fn status(&self) -> &str;

    fn on_started(&mut self) {}

    fn on_cancel(&mut self) {}

    /// True once a started operation has finished and `on_finished` is due.
    fn poll(&mut self) -> bool {
        false
    }

    fn on_finished(&mut self) {}

    fn adjust(&mut self, _delta: i32) {}

    fn is_busy(&self) -> bool {
        false
    }
}

/// Closed set of items the menu shows
pub enum MenuItem {
    ProfileSwitch(ProfileSwitchItem),
    Disconnect(DisconnectItem),
    BootSetting(BootSettingItem),
}

impl MenuItem {
    fn action(&self) -> &dyn MenuAction {
        match self {
            Self::ProfileSwitch(item) => item,
            Self::Disconnect(item) => item,
            Self::BootSetting(item) => item,
        }
    }

    fn action_mut(&mut self) -> &mut dyn MenuAction {
        match self {
            Self::ProfileSwitch(item) => item,
            Self::Disconnect(item) => item,
            Self::BootSetting(item) => item,
        }
    }

    pub fn is_setting(&self) -> bool {
        matches!(self, Self::BootSetting(_))
    }
}

impl MenuAction for MenuItem {
    fn label(&self) -> &str {
        self.action().label()
    }

    fn status(&self) -> &str {
        self.action().status()
    }

    fn on_started(&mut self) {
        self.action_mut().on_started()
    }

    fn on_cancel(&mut self) {
        self.action_mut().on_cancel()
    }

    fn poll(&mut self) -> bool {
        self.action_mut().poll()
    }

    fn on_finished(&mut self) {
        self.action_mut().on_finished()
    }

    fn adjust(&mut self, delta: i32) {
        self.action_mut().adjust(delta)
    }

    fn is_busy(&self) -> bool {
        self.action().is_busy()
    }
}

/// Last known boot profile ids, kept across menu openings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootProfileSettings {
    pub primary: ProfileId,
    pub secondary: ProfileId,
}

impl Default for BootProfileSettings {
    fn default() -> Self {
        Self {
            primary: ProfileId::FIRST,
            secondary: ProfileId::FIRST,
        }
    }
}

/// The settings overlay. One instance lives for the whole process and is
/// opened and closed by the host.
pub struct SwitcherMenu {
    subsystems: Subsystems,
    runtime: Handle,
    events: mpsc::UnboundedSender<Event>,
    settings: BootProfileSettings,
    items: Vec<MenuItem>,
    notify_guard: Option<SubsystemGuard<Notifications>>,
    open: bool,
}

impl SwitcherMenu {
    pub fn new(subsystems: Subsystems, runtime: Handle, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            subsystems,
            runtime,
            events,
            settings: BootProfileSettings::default(),
            items: Vec::new(),
            notify_guard: None,
            open: false,
        }
    }

    /// Build the item list: profiles 1-6, both boot settings, then disconnect.
    ///
    /// A failing notification backend only disables notifications. A failing
    /// platform service leaves the menu open but empty and returns the error.
    pub fn open(&mut self) -> SwitcherResult<()> {
        if self.open {
            debug!("Menu already open");
            return Ok(());
        }
        self.open = true;

        self.notify_guard = match self.subsystems.notifications.acquire() {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!("Notifications disabled for this session: {}", e);
                None
            }
        };

        let platform = self.subsystems.platform.acquire()?;
        self.items = self.build_items(&*platform);
        info!("Menu opened with {} items", self.items.len());
        Ok(())
    }

    fn build_items(&self, service: &dyn NetConfig) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = ProfileId::all()
            .enumerate()
            .map(|(index, id)| {
                MenuItem::ProfileSwitch(ProfileSwitchItem::new(
                    index,
                    ProfileDescriptor::load(service, id),
                    self.subsystems.clone(),
                    self.runtime.clone(),
                    self.events.clone(),
                ))
            })
            .collect();

        items.push(MenuItem::BootSetting(BootSettingItem::load(
            BootSlot::Primary,
            service,
            self.settings.primary,
        )));
        items.push(MenuItem::BootSetting(BootSettingItem::load(
            BootSlot::Secondary,
            service,
            self.settings.secondary,
        )));
        items.push(MenuItem::Disconnect(DisconnectItem::new(self.subsystems.clone())));
        items
    }

    /// Cancel outstanding switches, commit changed boot settings and release
    /// the notification session.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }

        for item in &mut self.items {
            if let MenuItem::ProfileSwitch(profile) = item {
                if profile.state() == ItemState::Connecting {
                    debug!("Canceling switch to profile {} on close", profile.id());
                    profile.on_cancel();
                }
            }
        }

        self.commit_settings();

        self.items.clear();
        self.notify_guard = None;
        self.open = false;
        info!("Menu closed");
    }

    fn commit_settings(&mut self) {
        let settings: Vec<&BootSettingItem> = self
            .items
            .iter()
            .filter_map(|item| match item {
                MenuItem::BootSetting(setting) => Some(setting),
                _ => None,
            })
            .collect();
        if settings.is_empty() {
            return;
        }

        match self.subsystems.platform.acquire() {
            Ok(platform) => {
                for setting in &settings {
                    setting.commit(&*platform, &self.subsystems.notifications);
                }
            }
            Err(e) => warn!("Boot profile settings not saved: {}", e),
        }

        for setting in settings {
            match setting.slot() {
                BootSlot::Primary => self.settings.primary = setting.value(),
                BootSlot::Secondary => self.settings.secondary = setting.value(),
            }
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[cfg(test)]
    pub fn settings(&self) -> BootProfileSettings {
        self.settings
    }

    pub fn start(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.on_started();
        }
    }

    pub fn cancel(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.on_cancel();
        }
    }

    pub fn adjust(&mut self, index: usize, delta: i32) {
        if let Some(item) = self.items.get_mut(index) {
            item.adjust(delta);
        }
    }

    /// Deliver `on_finished` to the item at `index` if its operation is done.
    pub fn finish(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        if !item.poll() {
            return false;
        }
        item.on_finished();
        true
    }

    /// Finish every item whose operation completed; returns how many did.
    pub fn finish_ready(&mut self) -> usize {
        (0..self.items.len()).filter(|&i| self.finish(i)).count()
    }
}
