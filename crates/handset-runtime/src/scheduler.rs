#![forbid(unsafe_code)]

//! Delayed-task queue for alert expiry and ticker animation.
//!
//! # Design
//!
//! Tasks live in one queue ordered by `(deadline, id)` on a monotonic clock.
//! Two drivers consume it:
//!
//! - **Threaded** ([`Scheduler::spawn`]): a named worker thread sleeps on a
//!   condition variable until the earliest deadline, runs every due task with
//!   the queue unlocked, and goes back to sleep.
//! - **Manual** ([`Scheduler::manual`]): no thread. Time only moves when the
//!   paired [`ManualClock`] is advanced, which fires due tasks on the calling
//!   thread. Tests use this for deterministic interleavings.
//!
//! # Invariants
//!
//! 1. A one-shot task fires exactly once, never before its deadline.
//! 2. Tasks fire in deadline order; equal deadlines fire in scheduling order.
//! 3. A repeating task's next deadline is one interval after its previous run
//!    finished (work, then sleep).
//! 4. There is no cancellation. [`TimerHandle::interrupt`] moves a pending
//!    task's deadline to "now": an interrupted timer still fires, just early.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Task panics | Callback unwinds | Logged, contained; repeating tasks keep their schedule |
//! | Scheduler dropped | Owning display dropped | Pending tasks are discarded, worker exits |
//! | Handle outlives scheduler | `TimerHandle` kept after drop | `interrupt()` returns false |
//! | Deadline overflows the clock | Delay too large for `Instant` | Task is never due; handle is inert |

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

/// Floor for repeating intervals, so a manual advance always terminates.
const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

type OnceFn = Box<dyn FnOnce() + Send>;
type RepeatFn = Box<dyn FnMut() + Send>;

enum Task {
    Once(OnceFn),
    Repeating { interval: Duration, run: RepeatFn },
}

#[derive(Default)]
struct Queue {
    entries: BTreeMap<(Instant, u64), Task>,
    next_id: u64,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
    /// Virtual time for manual mode; `None` means wall-clock.
    virtual_now: Option<Mutex<Instant>>,
}

impl Shared {
    fn new(virtual_now: Option<Instant>) -> Self {
        Self {
            queue: Mutex::new(Queue::default()),
            wake: Condvar::new(),
            virtual_now: virtual_now.map(Mutex::new),
        }
    }

    fn now(&self) -> Instant {
        match &self.virtual_now {
            Some(now) => *now.lock(),
            None => Instant::now(),
        }
    }

    fn allocate_id(&self) -> u64 {
        let mut queue = self.queue.lock();
        let id = queue.next_id;
        queue.next_id += 1;
        id
    }

    fn insert(&self, deadline: Instant, task: Task) -> u64 {
        let mut queue = self.queue.lock();
        let id = queue.next_id;
        queue.next_id += 1;
        if !queue.shutdown {
            queue.entries.insert((deadline, id), task);
        }
        drop(queue);
        self.wake.notify_one();
        id
    }

    fn reinsert(&self, deadline: Instant, id: u64, task: Task) {
        let mut queue = self.queue.lock();
        if queue.shutdown {
            return;
        }
        queue.entries.insert((deadline, id), task);
        drop(queue);
        self.wake.notify_one();
    }

    /// Pop the earliest task if it is due at `now`.
    fn take_due(queue: &mut MutexGuard<'_, Queue>, now: Instant) -> Option<(Instant, u64, Task)> {
        let (&(deadline, _), _) = queue.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        let ((deadline, id), task) = queue.entries.pop_first()?;
        Some((deadline, id, task))
    }

    /// Run a task with the queue unlocked; re-queue it if it repeats.
    fn run(&self, id: u64, task: Task) {
        match task {
            Task::Once(f) => {
                trace!(timer_id = id, "timer fired");
                if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
                    error!(timer_id = id, "scheduled task panicked");
                }
            }
            Task::Repeating { interval, mut run } => {
                if panic::catch_unwind(AssertUnwindSafe(&mut run)).is_err() {
                    error!(timer_id = id, "repeating task panicked; keeping schedule");
                }
                match self.now().checked_add(interval) {
                    Some(next) => self.reinsert(next, id, Task::Repeating { interval, run }),
                    None => warn!(timer_id = id, "next run overflows the clock; task retired"),
                }
            }
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut queue = shared.queue.lock();
    loop {
        if queue.shutdown {
            debug!("scheduler worker exiting");
            return;
        }
        if let Some((_, id, task)) = Shared::take_due(&mut queue, Instant::now()) {
            MutexGuard::unlocked(&mut queue, || shared.run(id, task));
            continue;
        }
        match queue.entries.first_key_value().map(|(&(deadline, _), _)| deadline) {
            Some(deadline) => {
                shared.wake.wait_until(&mut queue, deadline);
            }
            None => shared.wake.wait(&mut queue),
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Owner of a delayed-task queue.
///
/// Dropping the scheduler discards pending tasks and stops its worker.
pub struct Scheduler {
    shared: Arc<Shared>,
}

impl Scheduler {
    /// Start a scheduler driven by a background thread named `name`.
    pub fn spawn(name: &str) -> io::Result<Self> {
        let shared = Arc::new(Shared::new(None));
        let worker = Arc::clone(&shared);
        // Detached: the worker ends on its own once the scheduler is dropped.
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(worker))?;
        debug!(thread = name, "scheduler worker started");
        Ok(Self { shared })
    }

    /// Create a scheduler whose time only moves through the returned clock.
    #[must_use]
    pub fn manual() -> (Self, ManualClock) {
        let shared = Arc::new(Shared::new(Some(Instant::now())));
        let clock = ManualClock {
            shared: Arc::clone(&shared),
        };
        (Self { shared }, clock)
    }

    /// True when driven by a [`ManualClock`].
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.shared.virtual_now.is_some()
    }

    /// Current time on this scheduler's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.shared.now()
    }

    /// Run `f` once, `delay` from now.
    ///
    /// A delay past the end of the clock's range is never due: `f` is
    /// dropped and the returned handle is never pending.
    pub fn schedule_once<F>(&self, delay: Duration, f: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(deadline) = self.shared.now().checked_add(delay) else {
            return self.never_due(delay);
        };
        let id = self.shared.insert(deadline, Task::Once(Box::new(f)));
        trace!(timer_id = id, delay_ms = delay.as_millis() as u64, "timer scheduled");
        self.handle(id)
    }

    /// Run `f` every `interval`, starting one interval from now.
    pub fn schedule_repeating<F>(&self, interval: Duration, f: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let interval = interval.max(MIN_REPEAT_INTERVAL);
        let Some(deadline) = self.shared.now().checked_add(interval) else {
            return self.never_due(interval);
        };
        let id = self.shared.insert(
            deadline,
            Task::Repeating {
                interval,
                run: Box::new(f),
            },
        );
        trace!(timer_id = id, interval_ms = interval.as_millis() as u64, "repeating task scheduled");
        self.handle(id)
    }

    /// Number of tasks waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().entries.len()
    }

    fn never_due(&self, delay: Duration) -> TimerHandle {
        let id = self.shared.allocate_id();
        warn!(timer_id = id, ?delay, "deadline overflows the clock; task never due");
        self.handle(id)
    }

    fn handle(&self, id: u64) -> TimerHandle {
        TimerHandle {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("manual", &self.is_manual())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let discarded = {
            let mut queue = self.shared.queue.lock();
            queue.shutdown = true;
            std::mem::take(&mut queue.entries)
        };
        self.shared.wake.notify_all();
        // Task closures are dropped outside the lock.
        drop(discarded);
    }
}

// ============================================================================
// TimerHandle
// ============================================================================

/// Reference to a scheduled task.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    shared: Weak<Shared>,
}

impl TimerHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while the task is waiting in the queue.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let queue = shared.queue.lock();
        queue.entries.keys().any(|&(_, id)| id == self.id)
    }

    /// Make a pending task due immediately.
    ///
    /// Interrupting never cancels: the task fires at the next drain, as if
    /// its sleep had been cut short. Returns false when the task is not
    /// waiting (already fired, currently running, or scheduler gone).
    pub fn interrupt(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let now = shared.now();
        let mut queue = shared.queue.lock();
        let Some(key) = queue.entries.keys().find(|&&(_, id)| id == self.id).copied() else {
            return false;
        };
        if key.0 > now {
            if let Some(task) = queue.entries.remove(&key) {
                queue.entries.insert((now, self.id), task);
            }
        }
        drop(queue);
        shared.wake.notify_all();
        debug!(timer_id = self.id, "timer interrupted; firing early");
        true
    }
}

// ============================================================================
// ManualClock
// ============================================================================

/// Driver for a manual [`Scheduler`].
pub struct ManualClock {
    shared: Arc<Shared>,
}

impl ManualClock {
    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.shared.now()
    }

    /// Move time forward by `by`, firing every task that comes due.
    ///
    /// Tasks fire in deadline order with the clock set to each deadline, so
    /// a task scheduled from inside another task fires in the same call when
    /// its deadline falls within the window. Returns the number of firings.
    /// A step past the end of the clock's range is refused and fires nothing.
    pub fn advance(&self, by: Duration) -> usize {
        let Some(target) = self.shared.now().checked_add(by) else {
            warn!(?by, "manual clock step overflows; ignored");
            return 0;
        };
        let mut fired = 0;
        loop {
            let due = {
                let mut queue = self.shared.queue.lock();
                Shared::take_due(&mut queue, target)
            };
            let Some((deadline, id, task)) = due else {
                break;
            };
            self.set_at_least(deadline);
            self.shared.run(id, task);
            fired += 1;
        }
        self.set_at_least(target);
        fired
    }

    fn set_at_least(&self, t: Instant) {
        if let Some(now) = &self.shared.virtual_now {
            let mut now = now.lock();
            if t > *now {
                *now = t;
            }
        }
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock").finish_non_exhaustive()
    }
}
