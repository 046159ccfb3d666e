//! Generation-based supersession of background behaviors.
//!
//! Background intake behaviors run as detached tasks that write to the same
//! motors and pistons. Rather than locking the actuators, each behavior
//! captures a generation number when it starts and re-checks it before every
//! write. Starting a new behavior bumps the counter, so every older behavior
//! sees itself as stale on its next iteration, zeroes its outputs, and
//! terminates.
//!
//! Cancellation is cooperative and polling-based: nothing observes a cancel
//! faster than one loop iteration. A superseded task may issue at most one
//! further actuator write before it notices, bounded by its own tick period;
//! the newer task writes at the same cadence and immediately overwrites it.
//!
//! # Example
//!
//! ```
//! use charybdis::tasking::TaskSupervisor;
//!
//! let supervisor = TaskSupervisor::new();
//!
//! let first = supervisor.begin_new();
//! assert!(supervisor.is_current(first));
//!
//! // Starting a second behavior invalidates the first.
//! let second = supervisor.begin_new();
//! assert!(!supervisor.is_current(first));
//! assert!(supervisor.is_current(second));
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// A token identifying one started background behavior.
///
/// Captured from [`TaskSupervisor::begin_new`] when the behavior launches
/// and compared against the live value before every actuator write.
pub type Generation = u64;

/// A monotonically increasing generation counter shared between the control
/// loop and every background behavior.
///
/// Cloning the supervisor clones a handle to the same counter, so a clone
/// can be moved into a spawned task while the control loop keeps its own.
/// The counter is the only state shared for correctness between concurrent
/// behaviors; a plain atomic increment/read is all the synchronization the
/// scheme needs, because staleness is decided by exact equality against a
/// captured snapshot.
#[derive(Clone, Default)]
pub struct TaskSupervisor {
    live: Arc<AtomicU64>,
}

impl TaskSupervisor {
    /// Creates a supervisor with no generation handed out yet.
    pub fn new() -> Self { Self::default() }

    /// Starts a new generation and returns it.
    ///
    /// The returned value is the only current generation; every value
    /// returned by earlier calls is stale from this point on.
    pub fn begin_new(&self) -> Generation { self.live.fetch_add(1, Ordering::SeqCst) + 1 }

    /// Returns whether `generation` is still the live one.
    ///
    /// Side-effect free. Background loops call this once per iteration,
    /// before touching any actuator.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.live.load(Ordering::SeqCst) == generation
    }

    /// Invalidates every generation handed out so far.
    ///
    /// Equivalent to [`begin_new`](Self::begin_new) with the new value
    /// discarded: every in-flight behavior observes itself as stale on its
    /// next check. Used by full-stop commands.
    pub fn cancel_all(&self) { self.begin_new(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_generation_is_current() {
        let supervisor = TaskSupervisor::new();
        let a = supervisor.begin_new();
        assert!(supervisor.is_current(a));

        let b = supervisor.begin_new();
        assert!(b > a);
        assert!(!supervisor.is_current(a));
        assert!(supervisor.is_current(b));
    }

    #[test]
    fn cancel_all_invalidates_everything() {
        let supervisor = TaskSupervisor::new();
        let a = supervisor.begin_new();
        supervisor.cancel_all();
        assert!(!supervisor.is_current(a));

        // A generation begun after the cancel is live as usual.
        let b = supervisor.begin_new();
        assert!(supervisor.is_current(b));
    }

    #[test]
    fn clones_share_the_counter() {
        let supervisor = TaskSupervisor::new();
        let handle = supervisor.clone();

        let a = supervisor.begin_new();
        assert!(handle.is_current(a));

        let b = handle.begin_new();
        assert!(!supervisor.is_current(a));
        assert!(supervisor.is_current(b));
    }

    #[test]
    fn generations_stay_monotonic_across_cancels() {
        let supervisor = TaskSupervisor::new();
        let mut prev = supervisor.begin_new();
        for _ in 0..16 {
            supervisor.cancel_all();
            let next = supervisor.begin_new();
            assert!(next > prev);
            prev = next;
        }
    }
}
