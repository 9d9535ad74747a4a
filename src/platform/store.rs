use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SwitcherError, SwitcherResult};
use crate::guard::Subsystem;
use crate::platform::service::NetConfig;
use crate::platform::types::{ProfileId, ProfileRecord};

// ── On-disk format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    default_boot_id: u8,
    #[serde(default)]
    secondary_boot_id: u8,
    #[serde(default)]
    profiles: BTreeMap<u8, StoredProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredProfile {
    #[serde(default)]
    wifi: bool,
    #[serde(default)]
    ethernet: bool,
    #[serde(default)]
    ssid: String,
}

impl From<&StoredProfile> for ProfileRecord {
    fn from(p: &StoredProfile) -> Self {
        ProfileRecord {
            wifi_enabled: p.wifi,
            ethernet_enabled: p.ethernet,
            ssid: p.ssid.as_bytes().to_vec(),
            ssid_length: p.ssid.len(),
        }
    }
}

/// Artificial latency applied to the blocking connection calls
#[derive(Debug, Clone, Copy, Default)]
pub struct Latency {
    pub connect: Duration,
    pub disconnect: Duration,
}

/// File-backed stand-in for the console's network-configuration service.
///
/// The JSON file is loaded on `initialize` and dropped on `finalize`; boot id
/// changes are written straight back to disk.
pub struct JsonNetConfig {
    path: PathBuf,
    latency: Latency,
    loaded: Mutex<Option<StoreFile>>,
}

impl JsonNetConfig {
    pub fn new(path: impl Into<PathBuf>, latency: Latency) -> Self {
        Self {
            path: path.into(),
            latency,
            loaded: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Option<StoreFile>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut StoreFile) -> SwitcherResult<T>) -> SwitcherResult<T> {
        let mut loaded = self.lock();
        match loaded.as_mut() {
            Some(store) => f(store),
            None => Err(SwitcherError::Platform("service not initialized".into())),
        }
    }

    fn persist(&self, store: &StoreFile) -> SwitcherResult<()> {
        let json = serde_json::to_string_pretty(store)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn bootstrap(&self) -> SwitcherResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = StoreFile {
            default_boot_id: 1,
            secondary_boot_id: 1,
            profiles: BTreeMap::new(),
        };
        self.persist(&store)?;
        info!("Created empty profile store at {}", self.path.display());
        Ok(())
    }
}

impl Subsystem for JsonNetConfig {
    fn name(&self) -> &'static str {
        "network configuration"
    }

    fn initialize(&self) -> SwitcherResult<()> {
        if !self.path.exists() {
            self.bootstrap()?;
        }
        let text = std::fs::read_to_string(&self.path)?;
        let store: StoreFile = serde_json::from_str(&text)?;
        debug!(
            "Loaded {} profiles from {}",
            store.profiles.len(),
            self.path.display()
        );
        *self.lock() = Some(store);
        Ok(())
    }

    fn finalize(&self) {
        *self.lock() = None;
    }
}

impl NetConfig for JsonNetConfig {
    fn record_exists(&self, id: ProfileId) -> SwitcherResult<bool> {
        self.with_store(|store| Ok(store.profiles.contains_key(&id.get())))
    }

    fn read_record(&self, id: ProfileId) -> SwitcherResult<ProfileRecord> {
        self.with_store(|store| {
            store
                .profiles
                .get(&id.get())
                .map(ProfileRecord::from)
                .ok_or(SwitcherError::RecordRead(id.get()))
        })
    }

    fn connect(&self, id: ProfileId) -> SwitcherResult<()> {
        std::thread::sleep(self.latency.connect);
        self.with_store(|store| match store.profiles.get(&id.get()) {
            Some(profile) => {
                info!("Connected using profile {} ({})", id, ProfileRecord::from(profile).kind());
                Ok(())
            }
            None => {
                warn!("Connect requested for empty profile {}", id);
                Err(SwitcherError::Platform(format!("profile {id} is not configured")))
            }
        })
    }

    fn disconnect_all(&self) -> SwitcherResult<()> {
        std::thread::sleep(self.latency.disconnect);
        self.with_store(|_| {
            info!("All connections closed");
            Ok(())
        })
    }

    fn default_boot_id(&self) -> SwitcherResult<u8> {
        self.with_store(|store| Ok(store.default_boot_id))
    }

    fn set_default_boot_id(&self, id: ProfileId) -> SwitcherResult<()> {
        self.with_store(|store| {
            let mut updated = store.clone();
            updated.default_boot_id = id.get();
            self.persist(&updated)?;
            *store = updated;
            Ok(())
        })
    }

    fn secondary_boot_id(&self) -> SwitcherResult<u8> {
        self.with_store(|store| Ok(store.secondary_boot_id))
    }

    fn set_secondary_boot_id(&self, id: ProfileId) -> SwitcherResult<()> {
        self.with_store(|store| {
            let mut updated = store.clone();
            updated.secondary_boot_id = id.get();
            self.persist(&updated)?;
            *store = updated;
            Ok(())
        })
    }
}
