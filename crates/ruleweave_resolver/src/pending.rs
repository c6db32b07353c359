//! One-shot results from lookups that finish elsewhere.
//!
//! Some answers come from an external search that reports back through a
//! callback. [`pending`] returns the two halves: the [`Completer`] goes to
//! the callback, and the caller blocks on the [`PendingLookup`] for at most
//! a bounded time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use ruleweave_foundation::{Error, ErrorKind, Result};
use tracing::debug;

enum State<T> {
    Waiting,
    Done(T),
    Abandoned,
    Taken,
}

struct Slot<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

/// Creates a linked completer and pending lookup.
#[must_use]
pub fn pending<T>() -> (Completer<T>, PendingLookup<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(State::Waiting),
        ready: Condvar::new(),
    });
    (
        Completer {
            slot: Arc::clone(&slot),
        },
        PendingLookup { slot },
    )
}

/// The half that delivers the result.
///
/// Dropping it without calling [`complete`](Self::complete) interrupts the
/// waiter.
pub struct Completer<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Completer<T> {
    /// Delivers the result and wakes the waiter.
    pub fn complete(self, value: T) {
        let mut state = self.slot.state.lock();
        if matches!(*state, State::Waiting) {
            *state = State::Done(value);
            self.slot.ready.notify_all();
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        let mut state = self.slot.state.lock();
        if matches!(*state, State::Waiting) {
            *state = State::Abandoned;
            self.slot.ready.notify_all();
        }
    }
}

/// The half that waits for the result.
pub struct PendingLookup<T> {
    slot: Arc<Slot<T>>,
}

impl<T> PendingLookup<T> {
    /// Returns true if a result or an interruption has arrived.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(*self.slot.state.lock(), State::Waiting)
    }

    /// Blocks until the result arrives or `timeout` elapses.
    ///
    /// # Errors
    /// Returns `Timeout` if nothing arrives in time and `Interrupted` if the
    /// completer was dropped without completing.
    pub fn wait(self, timeout: Duration) -> Result<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.slot.state.lock();
        loop {
            match std::mem::replace(&mut *state, State::Taken) {
                State::Done(value) => return Ok(value),
                State::Abandoned | State::Taken => {
                    debug!("pending lookup interrupted");
                    return Err(Error::new(ErrorKind::Interrupted));
                }
                State::Waiting => {
                    *state = State::Waiting;
                    if self.slot.ready.wait_until(&mut state, deadline).timed_out()
                        && matches!(*state, State::Waiting)
                    {
                        debug!(?timeout, "pending lookup timed out");
                        return Err(Error::new(ErrorKind::Timeout));
                    }
                }
            }
        }
    }
}
