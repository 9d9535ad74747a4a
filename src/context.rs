use std::sync::Arc;

use crate::guard::SharedSubsystem;
use crate::notify::Notifications;
use crate::platform::NetConfig;

pub type PlatformService = SharedSubsystem<dyn NetConfig>;
pub type NotificationService = SharedSubsystem<Notifications>;

/// The two shared subsystems, handed to everything that needs them.
#[derive(Clone)]
pub struct Subsystems {
    pub notifications: Arc<NotificationService>,
    pub platform: Arc<PlatformService>,
}

impl Subsystems {
    pub fn new(notifications: Notifications, platform: impl NetConfig) -> Self {
        let platform: Arc<PlatformService> = Arc::new(SharedSubsystem::new(platform));
        Self {
            notifications: Arc::new(SharedSubsystem::new(notifications)),
            platform,
        }
    }
}
