use tracing::debug;

use crate::platform::{InterfaceKind, NetConfig, ProfileId};

pub const EMPTY_SUMMARY: &str = "<empty>";
pub const ERROR_SUMMARY: &str = "Error!";

/// What a profile slot held when it was read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Empty,
    Unreadable,
    Configured(InterfaceKind),
}

/// Human-readable view of one profile slot, computed once when the menu
/// item is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    id: ProfileId,
    content: SlotContent,
    summary: String,
}

impl ProfileDescriptor {
    /// Read slot `id` and summarize it. Never fails: every outcome has a
    /// displayable summary.
    pub fn load(service: &dyn NetConfig, id: ProfileId) -> Self {
        let exists = service.record_exists(id).unwrap_or_else(|e| {
            debug!("record_exists({}) failed: {}", id, e);
            false
        });
        if !exists {
            return Self::new(id, SlotContent::Empty, EMPTY_SUMMARY.into());
        }

        let record = match service.read_record(id) {
            Ok(record) => record,
            Err(e) => {
                debug!("read_record({}) failed: {}", id, e);
                return Self::new(id, SlotContent::Unreadable, ERROR_SUMMARY.into());
            }
        };

        let kind = record.kind();
        let summary = match kind {
            InterfaceKind::WiFi => format!("[Wi-Fi] SSID=\"{}\"", record.ssid()),
            InterfaceKind::Ethernet => "[Ethernet]".to_string(),
            InterfaceKind::Unknown => String::new(),
        };
        Self::new(id, SlotContent::Configured(kind), summary)
    }

    fn new(id: ProfileId, content: SlotContent, summary: String) -> Self {
        Self {
            id,
            content,
            summary,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}
