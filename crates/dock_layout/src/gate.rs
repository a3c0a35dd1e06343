//! Readiness gate: wait for the launcher process before touching its preferences.

use crate::runtime::error::{DockError, DockResult};
use std::thread;
use std::time::Duration;

/// Fixed delay between process-table checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Answers "is a process with exactly this name running?".
pub trait ProcessTable {
    /// Return whether a process named `process_name` currently exists.
    fn is_running(&self, process_name: &str) -> DockResult<bool>;
}

/// Blocking delay between polls.
pub trait Sleeper {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Result of a successful wait.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitOutcome {
    /// Number of process-table checks made, including the successful one.
    pub polls: u64,
    /// Seconds slept before the process was found.
    pub waited_secs: u64,
}

/// Wait until `process_name` is running, checking once immediately and then every second.
///
/// A process that is already running returns without sleeping. Once `max_wait_secs` seconds
/// have elapsed without a match the gate fails instead of checking again, so
/// `max_wait_secs = 0` means a single check.
///
/// # Errors
///
/// Returns a [`ReadinessTimeout`](crate::runtime::error::DockErrorCategory::ReadinessTimeout)
/// error when the window closes, or the process-table error if a check cannot run.
pub fn wait_for_ready<P, S>(
    table: &P,
    sleeper: &S,
    process_name: &str,
    max_wait_secs: u64,
) -> DockResult<WaitOutcome>
where
    P: ProcessTable + ?Sized,
    S: Sleeper + ?Sized,
{
    let mut elapsed = 0u64;
    let mut polls = 0u64;
    loop {
        polls += 1;
        if table.is_running(process_name)? {
            return Ok(WaitOutcome {
                polls,
                waited_secs: elapsed,
            });
        }
        if elapsed >= max_wait_secs {
            return Err(DockError::readiness_timeout(format!(
                "`{process_name}` was not running after {max_wait_secs}s"
            ))
            .with_operation(format!("wait for {process_name}"))
            .with_hint("raise `max_wait_secs` or check that a user session is logged in"));
        }
        sleeper.sleep(POLL_INTERVAL);
        elapsed += 1;
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Process table that reports the process after a fixed number of negative checks.
    #[derive(Debug)]
    pub(crate) struct ScriptedTable {
        appears_after: Option<u64>,
        checks: Cell<u64>,
        names: RefCell<Vec<String>>,
    }

    impl ScriptedTable {
        pub(crate) fn running() -> Self {
            Self::appearing_after(0)
        }

        pub(crate) fn never() -> Self {
            Self {
                appears_after: None,
                checks: Cell::new(0),
                names: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn appearing_after(misses: u64) -> Self {
            Self {
                appears_after: Some(misses),
                checks: Cell::new(0),
                names: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn checks(&self) -> u64 {
            self.checks.get()
        }

        pub(crate) fn names(&self) -> Vec<String> {
            self.names.borrow().clone()
        }
    }

    impl ProcessTable for ScriptedTable {
        fn is_running(&self, process_name: &str) -> DockResult<bool> {
            let seen = self.checks.get();
            self.checks.set(seen + 1);
            self.names.borrow_mut().push(process_name.to_string());
            Ok(self.appears_after.is_some_and(|misses| seen >= misses))
        }
    }

    /// Sleeper that records requested delays instead of blocking.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSleeper {
        slept: RefCell<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub(crate) fn slept(&self) -> Vec<Duration> {
            self.slept.borrow().clone()
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }
}
