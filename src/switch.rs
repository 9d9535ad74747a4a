//! Background profile switch with cooperative cancellation.
//!
//! A switch disconnects everything and then connects the chosen profile.
//! Cancellation is only observed at the checkpoint before each of those two
//! platform calls; a call already in flight always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::context::PlatformService;
use crate::error::{SwitcherError, SwitcherResult};
use crate::platform::ProfileId;

pub const CANCELED_REASON: &str = "Canceled by user";

/// Terminal result of a switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Succeeded,
    Failed(String),
    Canceled,
}

impl SwitchOutcome {
    /// Text shown to the user for anything but success
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Succeeded => None,
            Self::Failed(reason) => Some(reason),
            Self::Canceled => Some(CANCELED_REASON),
        }
    }
}

/// Cancellation flag shared between the requester and the worker.
///
/// Monotonic: once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Checkpoint: fail with [`SwitcherError::Canceled`] if cancellation was requested.
    pub fn check(&self) -> SwitcherResult<()> {
        if self.is_cancelled() {
            Err(SwitcherError::Canceled)
        } else {
            Ok(())
        }
    }
}

/// Run one switch to completion on the current thread.
///
/// Holds its own acquisition of the platform service for the whole switch,
/// so closing the menu meanwhile cannot finalize the service under it.
pub fn run_switch(platform: &Arc<PlatformService>, id: ProfileId, cancel: &CancelFlag) -> SwitchOutcome {
    match try_switch(platform, id, cancel) {
        Ok(()) => {
            info!("Switched to profile {}", id);
            SwitchOutcome::Succeeded
        }
        Err(SwitcherError::Canceled) => {
            info!("Switch to profile {} canceled", id);
            SwitchOutcome::Canceled
        }
        Err(e) => {
            warn!("Switch to profile {} failed: {}", id, e);
            SwitchOutcome::Failed(e.to_string())
        }
    }
}

fn try_switch(platform: &Arc<PlatformService>, id: ProfileId, cancel: &CancelFlag) -> SwitcherResult<()> {
    let service = platform.acquire()?;

    cancel.check()?;
    debug!("Disconnecting before switching to profile {}", id);
    service.disconnect_all()?;

    cancel.check()?;
    debug!("Connecting profile {}", id);
    service.connect(id).map_err(|e| {
        debug!("connect({}) failed: {}", id, e);
        SwitcherError::SwitchFailure(id.get())
    })
}

/// A switch running on the blocking pool.
pub struct SwitchTask {
    id: ProfileId,
    cancel: CancelFlag,
    result: oneshot::Receiver<SwitchOutcome>,
    outcome: Option<SwitchOutcome>,
}

impl SwitchTask {
    /// Start switching to `id` in the background.
    ///
    /// `on_done` runs on the worker after the outcome has been published, so
    /// anything it wakes up can read [`outcome`](Self::outcome) right away.
    pub fn start<F>(runtime: &Handle, platform: Arc<PlatformService>, id: ProfileId, on_done: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let cancel = CancelFlag::new();
        let (tx, rx) = oneshot::channel();

        let worker_cancel = cancel.clone();
        runtime.spawn_blocking(move || {
            let outcome = run_switch(&platform, id, &worker_cancel);
            if tx.send(outcome).is_err() {
                debug!("Switch to profile {} finished after its owner went away", id);
            }
            on_done();
        });

        Self {
            id,
            cancel,
            result: rx,
            outcome: None,
        }
    }

    /// Ask the worker to stop at its next checkpoint. Never blocks.
    pub fn request_cancel(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Cancellation requested for switch to profile {}", self.id);
        }
        self.cancel.cancel();
    }

    #[cfg(test)]
    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The terminal outcome, or `None` while the worker is still running.
    pub fn outcome(&mut self) -> Option<SwitchOutcome> {
        if self.outcome.is_none() {
            match self.result.try_recv() {
                Ok(outcome) => self.outcome = Some(outcome),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.outcome = Some(SwitchOutcome::Failed(
                        "switch worker stopped unexpectedly".into(),
                    ));
                }
            }
        }
        self.outcome.clone()
    }
}
