//! In-crate fakes for the platform service and notification sink.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::error::{SwitcherError, SwitcherResult};
use crate::guard::Subsystem;
use crate::notify::{NotificationLevel, NotificationSink};
use crate::platform::{NetConfig, ProfileId, ProfileRecord};

/// Blocks callers until opened.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
    waiting: AtomicUsize,
}

impl Gate {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pass(&self) {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
    }

    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }

    /// Spin until some thread is blocked in [`pass`](Self::pass).
    pub fn wait_for_waiter(&self) {
        while self.waiting.load(Ordering::SeqCst) == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

#[derive(Default)]
struct FakeInner {
    records: Mutex<HashMap<u8, SwitcherResult<ProfileRecord>>>,
    default_boot: Mutex<Option<u8>>,
    secondary_boot: Mutex<Option<u8>>,
    default_writes: Mutex<Vec<u8>>,
    secondary_writes: Mutex<Vec<u8>>,
    connects: Mutex<Vec<u8>>,
    disconnects: AtomicUsize,
    inits: AtomicUsize,
    finalizes: AtomicUsize,
    fail_init: AtomicBool,
    fail_exists: AtomicBool,
    fail_disconnect: AtomicBool,
    fail_set_boot: AtomicBool,
    init_gate: Mutex<Option<Arc<Gate>>>,
    disconnect_gate: Mutex<Option<Arc<Gate>>>,
    connect_gate: Mutex<Option<Arc<Gate>>>,
}

/// Scriptable platform service. Clones share state.
///
/// Slots without a record are absent; `connect` fails for them like the
/// real service does. Boot id reads fail until set.
#[derive(Clone, Default)]
pub struct FakeNetConfig {
    inner: Arc<FakeInner>,
}

fn pass(gate: &Mutex<Option<Arc<Gate>>>) {
    let gate = gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.pass();
    }
}

impl FakeNetConfig {
    pub fn set_record(&self, id: u8, record: SwitcherResult<ProfileRecord>) {
        self.inner.records.lock().unwrap().insert(id, record);
    }

    pub fn set_default_boot(&self, id: Option<u8>) {
        *self.inner.default_boot.lock().unwrap() = id;
    }

    pub fn set_secondary_boot(&self, id: Option<u8>) {
        *self.inner.secondary_boot.lock().unwrap() = id;
    }

    pub fn fail_init(&self, fail: bool) {
        self.inner.fail_init.store(fail, Ordering::SeqCst);
    }

    pub fn fail_exists(&self, fail: bool) {
        self.inner.fail_exists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_disconnect(&self, fail: bool) {
        self.inner.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set_boot(&self, fail: bool) {
        self.inner.fail_set_boot.store(fail, Ordering::SeqCst);
    }

    pub fn gate_init(&self, gate: Arc<Gate>) {
        *self.inner.init_gate.lock().unwrap() = Some(gate);
    }

    pub fn gate_disconnect(&self, gate: Arc<Gate>) {
        *self.inner.disconnect_gate.lock().unwrap() = Some(gate);
    }

    pub fn gate_connect(&self, gate: Arc<Gate>) {
        *self.inner.connect_gate.lock().unwrap() = Some(gate);
    }

    pub fn connect_calls(&self) -> Vec<u8> {
        self.inner.connects.lock().unwrap().clone()
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.disconnects.load(Ordering::SeqCst)
    }

    pub fn inits(&self) -> usize {
        self.inner.inits.load(Ordering::SeqCst)
    }

    pub fn finalizes(&self) -> usize {
        self.inner.finalizes.load(Ordering::SeqCst)
    }

    pub fn default_writes(&self) -> Vec<u8> {
        self.inner.default_writes.lock().unwrap().clone()
    }

    pub fn secondary_writes(&self) -> Vec<u8> {
        self.inner.secondary_writes.lock().unwrap().clone()
    }
}

impl Subsystem for FakeNetConfig {
    fn name(&self) -> &'static str {
        "fake network configuration"
    }

    fn initialize(&self) -> SwitcherResult<()> {
        self.inner.inits.fetch_add(1, Ordering::SeqCst);
        pass(&self.inner.init_gate);
        if self.inner.fail_init.load(Ordering::SeqCst) {
            return Err(SwitcherError::Platform("initialize failed".into()));
        }
        Ok(())
    }

    fn finalize(&self) {
        self.inner.finalizes.fetch_add(1, Ordering::SeqCst);
    }
}

impl NetConfig for FakeNetConfig {
    fn record_exists(&self, id: ProfileId) -> SwitcherResult<bool> {
        if self.inner.fail_exists.load(Ordering::SeqCst) {
            return Err(SwitcherError::Platform("exists query failed".into()));
        }
        Ok(self.inner.records.lock().unwrap().contains_key(&id.get()))
    }

    fn read_record(&self, id: ProfileId) -> SwitcherResult<ProfileRecord> {
        self.inner
            .records
            .lock()
            .unwrap()
            .get(&id.get())
            .cloned()
            .unwrap_or(Err(SwitcherError::RecordRead(id.get())))
    }

    fn connect(&self, id: ProfileId) -> SwitcherResult<()> {
        self.inner.connects.lock().unwrap().push(id.get());
        pass(&self.inner.connect_gate);
        match self.inner.records.lock().unwrap().get(&id.get()) {
            Some(Ok(_)) => Ok(()),
            _ => Err(SwitcherError::Platform(format!("profile {id} is not configured"))),
        }
    }

    fn disconnect_all(&self) -> SwitcherResult<()> {
        self.inner.disconnects.fetch_add(1, Ordering::SeqCst);
        pass(&self.inner.disconnect_gate);
        if self.inner.fail_disconnect.load(Ordering::SeqCst) {
            return Err(SwitcherError::Platform("disconnect_all failed".into()));
        }
        Ok(())
    }

    fn default_boot_id(&self) -> SwitcherResult<u8> {
        self.inner
            .default_boot
            .lock()
            .unwrap()
            .ok_or_else(|| SwitcherError::Platform("no default boot id".into()))
    }

    fn set_default_boot_id(&self, id: ProfileId) -> SwitcherResult<()> {
        if self.inner.fail_set_boot.load(Ordering::SeqCst) {
            return Err(SwitcherError::Platform("write failed".into()));
        }
        self.inner.default_writes.lock().unwrap().push(id.get());
        self.set_default_boot(Some(id.get()));
        Ok(())
    }

    fn secondary_boot_id(&self) -> SwitcherResult<u8> {
        self.inner
            .secondary_boot
            .lock()
            .unwrap()
            .ok_or_else(|| SwitcherError::Platform("no secondary boot id".into()))
    }

    fn set_secondary_boot_id(&self, id: ProfileId) -> SwitcherResult<()> {
        if self.inner.fail_set_boot.load(Ordering::SeqCst) {
            return Err(SwitcherError::Platform("write failed".into()));
        }
        self.inner.secondary_writes.lock().unwrap().push(id.get());
        self.set_secondary_boot(Some(id.get()));
        Ok(())
    }
}

#[derive(Default)]
struct SinkInner {
    messages: Mutex<Vec<(NotificationLevel, String)>>,
    fade_delays: Mutex<HashMap<NotificationLevel, f32>>,
    inits: AtomicUsize,
    deinits: AtomicUsize,
    fail_init: AtomicBool,
    up: AtomicBool,
    emitted_while_down: AtomicUsize,
}

/// Notification sink that records everything it is asked to show.
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: Arc<SinkInner>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.inner.messages.lock().unwrap().clone()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.messages().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn fade_delay(&self, level: NotificationLevel) -> Option<f32> {
        self.inner.fade_delays.lock().unwrap().get(&level).copied()
    }

    pub fn inits(&self) -> usize {
        self.inner.inits.load(Ordering::SeqCst)
    }

    pub fn deinits(&self) -> usize {
        self.inner.deinits.load(Ordering::SeqCst)
    }

    pub fn fail_init(&self, fail: bool) {
        self.inner.fail_init.store(fail, Ordering::SeqCst);
    }

    /// Emits that arrived between `deinit` and the next successful `init`
    pub fn emitted_while_down(&self) -> usize {
        self.inner.emitted_while_down.load(Ordering::SeqCst)
    }
}

impl NotificationSink for RecordingSink {
    fn init(&self) -> SwitcherResult<()> {
        self.inner.inits.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_init.load(Ordering::SeqCst) {
            return Err(SwitcherError::SubsystemInit {
                subsystem: "notifications",
                reason: "module missing".into(),
            });
        }
        self.inner.up.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn deinit(&self) {
        self.inner.up.store(false, Ordering::SeqCst);
        self.inner.deinits.fetch_add(1, Ordering::SeqCst);
    }

    fn set_fade_delay(&self, level: NotificationLevel, secs: f32) {
        self.inner.fade_delays.lock().unwrap().insert(level, secs);
    }

    fn emit(&self, level: NotificationLevel, text: &str) {
        if !self.inner.up.load(Ordering::SeqCst) {
            self.inner.emitted_while_down.fetch_add(1, Ordering::SeqCst);
        }
        self.inner
            .messages
            .lock()
            .unwrap()
            .push((level, text.to_string()));
    }
}
