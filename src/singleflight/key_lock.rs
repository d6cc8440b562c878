//! Per-key gate and completion broadcast.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OwnedMutexGuard};

use super::FetchError;

/// Outcome of one fill round, shared with every waiter of that round.
pub type RoundOutcome = Result<(), Arc<FetchError>>;

/// Coordination state for one cache key.
///
/// `gate` admits one owner at a time and is only ever try-acquired.
/// `done` carries the outcome of the latest finished round; waiters
/// subscribe before trying the gate so a completion can not slip past them.
#[derive(Debug)]
pub struct KeyLock {
    gate: Arc<Mutex<()>>,
    in_flight: AtomicBool,
    done: watch::Sender<Option<RoundOutcome>>,
}

impl KeyLock {
    pub fn new() -> Self {
        let (done, _) = watch::channel(None);
        Self {
            gate: Arc::new(Mutex::new(())),
            in_flight: AtomicBool::new(false),
            done,
        }
    }

    /// Registers interest in the next round completion.
    pub fn subscribe(&self) -> watch::Receiver<Option<RoundOutcome>> {
        self.done.subscribe()
    }

    /// Attempts to become the owner without blocking.
    pub fn try_own(self: &Arc<Self>) -> Option<FlightGuard> {
        let gate = self.gate.clone().try_lock_owned().ok()?;
        self.in_flight.store(true, Ordering::Release);
        Some(FlightGuard {
            lock: self.clone(),
            gate: Some(gate),
            outcome: None,
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Default for KeyLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one fill round.
///
/// Dropping the guard releases the gate first and then broadcasts the round
/// outcome. A guard dropped without [`FlightGuard::finish`] (cancelled or
/// panicking owner) broadcasts [`FetchError::Abandoned`].
#[derive(Debug)]
pub struct FlightGuard {
    lock: Arc<KeyLock>,
    gate: Option<OwnedMutexGuard<()>>,
    outcome: Option<RoundOutcome>,
}

impl FlightGuard {
    pub fn finish(mut self, outcome: RoundOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| Err(Arc::new(FetchError::Abandoned)));

        self.lock.in_flight.store(false, Ordering::Release);
        drop(self.gate.take());
        self.lock.done.send_replace(Some(outcome));
    }
}
