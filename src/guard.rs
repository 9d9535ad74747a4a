//! Reference-counted lifetime for subsystems shared between the menu and
//! background workers.
//!
//! Every [`SharedSubsystem::acquire`] is paired with exactly one release,
//! performed when the returned [`SubsystemGuard`] drops. The first
//! acquisition initializes the backing subsystem and the last release tears
//! it down, no matter how acquisitions from different threads interleave.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{SwitcherError, SwitcherResult};

/// Something with a global init/teardown pair that must not be repeated
/// while in use.
pub trait Subsystem: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn initialize(&self) -> SwitcherResult<()>;

    fn finalize(&self);
}

#[derive(Debug, Default)]
struct GuardState {
    refs: usize,
    live: bool,
    /// Why the last initialization attempt failed
    init_error: Option<SwitcherError>,
}

/// Process-wide reference count around one [`Subsystem`].
///
/// The counter and the init/teardown calls are serialized by one lock, so a
/// 0->1 transition finishes initializing before any other acquirer gets the
/// subsystem.
pub struct SharedSubsystem<S: ?Sized> {
    state: Mutex<GuardState>,
    subsystem: S,
}

impl<S: Subsystem> SharedSubsystem<S> {
    pub fn new(subsystem: S) -> Self {
        Self {
            state: Mutex::new(GuardState::default()),
            subsystem,
        }
    }
}

impl<S: Subsystem + ?Sized> SharedSubsystem<S> {
    /// Take one reference, initializing on the 0->1 transition.
    ///
    /// The reference is counted even when initialization fails; on that
    /// path the guard built for it is dropped here, which performs the
    /// matching release.
    pub fn acquire(self: &Arc<Self>) -> SwitcherResult<SubsystemGuard<S>> {
        let guard = self.enter();
        guard.ensure_live()?;
        Ok(guard)
    }

    /// Count one reference and attempt initialization on 0->1, without
    /// requiring the subsystem to be usable afterwards.
    fn enter(self: &Arc<Self>) -> SubsystemGuard<S> {
        let mut state = self.lock_state();
        state.refs += 1;
        if state.refs == 1 {
            match self.subsystem.initialize() {
                Ok(()) => {
                    state.live = true;
                    state.init_error = None;
                    debug!("{} initialized", self.subsystem.name());
                }
                Err(e) => {
                    warn!("Failed to initialize {}: {}", self.subsystem.name(), e);
                    state.init_error = Some(e);
                }
            }
        }
        drop(state);

        SubsystemGuard {
            owner: Arc::clone(self),
        }
    }

    fn release(&self) {
        let mut state = self.lock_state();
        if state.refs == 0 {
            warn!("{} released more often than acquired", self.subsystem.name());
            return;
        }
        state.refs -= 1;
        if state.refs == 0 && state.live {
            self.subsystem.finalize();
            state.live = false;
            debug!("{} finalized", self.subsystem.name());
        }
    }

    /// Outstanding acquisitions
    #[cfg(test)]
    pub fn refs(&self) -> usize {
        self.lock_state().refs
    }

    /// True while at least one acquisition is held and initialization succeeded.
    #[cfg(test)]
    pub fn is_live(&self) -> bool {
        self.lock_state().live
    }

    /// Run `f` on the subsystem if it is live, without taking a reference.
    ///
    /// The state lock is held for the call, so a concurrent teardown waits
    /// for `f` to return. `f` must not acquire or release this subsystem.
    pub(crate) fn with_live<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        let state = self.lock_state();
        if state.live {
            Some(f(&self.subsystem))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn peek(&self) -> &S {
        &self.subsystem
    }

    fn lock_state(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped acquisition; releases its reference on drop.
pub struct SubsystemGuard<S: Subsystem + ?Sized> {
    owner: Arc<SharedSubsystem<S>>,
}

impl<S: Subsystem + ?Sized> SubsystemGuard<S> {
    /// Fails unless the subsystem initialized. A reference taken while an
    /// earlier failed initialization is still held sees that failure.
    fn ensure_live(&self) -> SwitcherResult<()> {
        let state = self.owner.lock_state();
        if state.live {
            return Ok(());
        }
        let subsystem = self.owner.subsystem.name();
        Err(match &state.init_error {
            Some(SwitcherError::SubsystemInit {
                subsystem: inner,
                reason,
            }) => SwitcherError::SubsystemInit {
                subsystem: *inner,
                reason: reason.clone(),
            },
            Some(other) => SwitcherError::SubsystemInit {
                subsystem,
                reason: other.to_string(),
            },
            None => SwitcherError::SubsystemInit {
                subsystem,
                reason: "unavailable".into(),
            },
        })
    }
}

impl<S: Subsystem + ?Sized> Deref for SubsystemGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.owner.subsystem
    }
}

impl<S: Subsystem + ?Sized> Drop for SubsystemGuard<S> {
    fn drop(&mut self) {
        self.owner.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNetConfig, Gate};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;

    #[derive(Default)]
    struct Counting {
        inits: AtomicUsize,
        finalizes: AtomicUsize,
        live: AtomicBool,
        overlapped: AtomicBool,
        fail: AtomicBool,
    }

    impl Subsystem for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn initialize(&self) -> SwitcherResult<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SwitcherError::Platform("boom".into()));
            }
            if self.live.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            Ok(())
        }

        fn finalize(&self) {
            self.finalizes.fetch_add(1, Ordering::SeqCst);
            if !self.live.swap(false, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_nested_acquire_initializes_once() {
        let shared = Arc::new(SharedSubsystem::new(Counting::default()));

        let outer = shared.acquire().unwrap();
        {
            let _inner = shared.acquire().unwrap();
            assert_eq!(shared.refs(), 2);
        }
        assert!(shared.is_live());
        assert_eq!(outer.finalizes.load(Ordering::SeqCst), 0);
        drop(outer);

        assert_eq!(shared.refs(), 0);
        assert!(!shared.is_live());
        assert_eq!(shared.peek().inits.load(Ordering::SeqCst), 1);
        assert_eq!(shared.peek().finalizes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reacquire_after_teardown_initializes_again() {
        let shared = Arc::new(SharedSubsystem::new(Counting::default()));
        drop(shared.acquire().unwrap());
        drop(shared.acquire().unwrap());
        assert_eq!(shared.peek().inits.load(Ordering::SeqCst), 2);
        assert_eq!(shared.peek().finalizes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_init_surfaces_error_and_releases() {
        let shared = Arc::new(SharedSubsystem::new(Counting::default()));
        shared.peek().fail.store(true, Ordering::SeqCst);

        let err = shared.acquire().err().unwrap();
        assert!(matches!(
            err,
            SwitcherError::SubsystemInit { subsystem: "counting", .. }
        ));
        assert_eq!(shared.peek().inits.load(Ordering::SeqCst), 1);
        assert_eq!(shared.peek().finalizes.load(Ordering::SeqCst), 0);
        assert_eq!(shared.refs(), 0);

        shared.peek().fail.store(false, Ordering::SeqCst);
        let guard = shared.acquire().unwrap();
        assert_eq!(guard.inits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let shared = Arc::new(SharedSubsystem::new(Counting::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for i in 0..500 {
                        let guard = shared.acquire().unwrap();
                        assert!(guard.live.load(Ordering::SeqCst));
                        if i % 7 == 0 {
                            let nested = shared.acquire().unwrap();
                            assert!(nested.live.load(Ordering::SeqCst));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let counting = shared.peek();
        assert_eq!(shared.refs(), 0);
        assert!(!counting.live.load(Ordering::SeqCst));
        assert!(!counting.overlapped.load(Ordering::SeqCst));
        assert_eq!(
            counting.inits.load(Ordering::SeqCst),
            counting.finalizes.load(Ordering::SeqCst)
        );
    }

    #[test]
    fn test_acquire_during_failed_init_sees_failure() {
        let fake = FakeNetConfig::default();
        fake.fail_init(true);
        let gate = Gate::closed();
        fake.gate_init(gate.clone());
        let shared = Arc::new(SharedSubsystem::new(fake.clone()));

        let (release_tx, release_rx) = mpsc::channel::<()>();
        let first = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let guard = shared.enter();
                let result = guard.ensure_live();
                release_rx.recv().unwrap();
                drop(guard);
                result
            })
        };
        gate.wait_for_waiter();

        let second = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || shared.acquire().err())
        };
        gate.open();
        let second_err = second.join().unwrap();
        release_tx.send(()).unwrap();
        let first_err = first.join().unwrap().err();

        assert!(matches!(first_err, Some(SwitcherError::SubsystemInit { .. })));
        assert!(matches!(second_err, Some(SwitcherError::SubsystemInit { .. })));
        assert_eq!(fake.inits(), 1);
        assert_eq!(fake.finalizes(), 0);
        assert_eq!(shared.refs(), 0);
        assert!(!shared.is_live());
    }
}
