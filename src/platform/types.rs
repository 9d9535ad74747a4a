use std::fmt;

use crate::error::{SwitcherError, SwitcherResult};

/// Largest SSID the platform stores, in bytes.
pub const MAX_SSID_LEN: usize = 32;

/// A fixed profile slot in the platform store, always in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(u8);

impl ProfileId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;
    pub const FIRST: ProfileId = ProfileId(Self::MIN);

    pub fn new(id: u8) -> SwitcherResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(SwitcherError::InvalidProfileId(id as i64))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every slot, in display order.
    pub fn all() -> impl Iterator<Item = ProfileId> {
        (Self::MIN..=Self::MAX).map(ProfileId)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which interface a profile drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    WiFi,
    Ethernet,
    Unknown,
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WiFi => write!(f, "Wi-Fi"),
            Self::Ethernet => write!(f, "Ethernet"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A persisted connection profile as the platform reports it.
///
/// `ssid_length` is whatever the platform claims; it is never trusted past
/// the buffer or [`MAX_SSID_LEN`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub wifi_enabled: bool,
    pub ethernet_enabled: bool,
    pub ssid: Vec<u8>,
    pub ssid_length: usize,
}

impl ProfileRecord {
    #[cfg(test)]
    pub fn wifi(ssid: &str) -> Self {
        Self {
            wifi_enabled: true,
            ethernet_enabled: false,
            ssid: ssid.as_bytes().to_vec(),
            ssid_length: ssid.len(),
        }
    }

    #[cfg(test)]
    pub fn ethernet() -> Self {
        Self {
            ethernet_enabled: true,
            ..Default::default()
        }
    }

    /// Wi-Fi wins when both interface flags are set.
    pub fn kind(&self) -> InterfaceKind {
        if self.wifi_enabled {
            InterfaceKind::WiFi
        } else if self.ethernet_enabled {
            InterfaceKind::Ethernet
        } else {
            InterfaceKind::Unknown
        }
    }

    pub fn ssid(&self) -> String {
        let len = self.ssid_length.min(self.ssid.len()).min(MAX_SSID_LEN);
        String::from_utf8_lossy(&self.ssid[..len]).into_owned()
    }
}
