//! Repeating-task schedulers.
//!
//! A session never owns a timer. It hands a tick task to a [`TickScheduler`]
//! and keeps the returned [`CancelToken`]. Production code schedules on a
//! tokio runtime; tests use [`ManualScheduler`] and decide exactly when each
//! tick runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// What a task wants after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

pub type TickTask = Box<dyn FnMut() -> TickControl + Send + 'static>;

/// Shared cancellation flag. Cancelling is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub trait TickScheduler {
    /// Run `task` every `interval_ms` until it returns [`TickControl::Stop`]
    /// or the returned token is cancelled.
    fn schedule(&self, interval_ms: u64, task: TickTask) -> CancelToken;
}

struct ScheduledTask {
    token: CancelToken,
    task: TickTask,
}

/// Runs tasks only when told to. Clones share the same task list.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ScheduledTask>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ScheduledTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run every live task once. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        // Tasks run outside the lock so they may schedule more work.
        let mut batch = std::mem::take(&mut *self.guard());
        let mut ran = 0;
        batch.retain_mut(|scheduled| {
            if scheduled.token.is_cancelled() {
                return false;
            }
            ran += 1;
            match (scheduled.task)() {
                TickControl::Continue => !scheduled.token.is_cancelled(),
                TickControl::Stop => {
                    scheduled.token.cancel();
                    false
                }
            }
        });
        let mut tasks = self.guard();
        batch.append(&mut tasks);
        *tasks = batch;
        ran
    }

    pub fn live_tasks(&self) -> usize {
        self.guard()
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .count()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&self, _interval_ms: u64, task: TickTask) -> CancelToken {
        let token = CancelToken::new();
        self.guard().push(ScheduledTask {
            token: token.clone(),
            task,
        });
        token
    }
}

/// Spawns one tokio task per schedule, ticking on `tokio::time::interval`.
///
/// Late ticks are skipped rather than bunched: the controller catches up
/// from the clock anyway.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime this is called from.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&self, interval_ms: u64, mut task: TickTask) -> CancelToken {
        let token = CancelToken::new();
        let task_token = token.clone();
        let period = Duration::from_millis(interval_ms.max(1));

        self.handle.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if task_token.is_cancelled() {
                    break;
                }
                if task() == TickControl::Stop {
                    task_token.cancel();
                    break;
                }
            }
        });
        token
    }
}
