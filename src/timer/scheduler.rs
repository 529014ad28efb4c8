use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Callback invoked on every scheduled tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle to a scheduled periodic task
pub trait ScheduledTask: Send {
    /// Stop the task; no further ticks are scheduled after this returns
    fn cancel(&self);
}

/// Periodic callback scheduling with cancellation
pub trait TickScheduler: Send + Sync {
    /// Invoke `tick` every `interval` until the returned task is cancelled
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Box<dyn ScheduledTask>;
}

/// Production scheduler backed by a tokio timer task
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Create a scheduler on the current tokio runtime
    ///
    /// Panics outside of a runtime context; use [`TokioScheduler::with_handle`]
    /// to schedule onto an explicit runtime.
    pub fn new() -> Self {
        Self {
            runtime: tokio::runtime::Handle::current(),
        }
    }

    /// Create a scheduler on a specific runtime
    pub fn with_handle(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Box<dyn ScheduledTask> {
        debug!("scheduling periodic tick every {:?}", interval);
        let handle = self.runtime.spawn(async move {
            // First fire happens one full interval after scheduling
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        });
        Box::new(TokioTask { handle })
    }
}

struct TokioTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask for TokioTask {
    fn cancel(&self) {
        self.handle.abort();
    }
}

/// Mock scheduler for testing without timers
///
/// Ticks never fire on their own; tests drive them with [`MockScheduler::fire_all`].
/// Cloning shares the task table.
#[derive(Clone, Default)]
pub struct MockScheduler {
    inner: Arc<Mutex<MockSchedulerInner>>,
}

#[derive(Default)]
struct MockSchedulerInner {
    next_id: u64,
    tasks: BTreeMap<u64, MockEntry>,
}

struct MockEntry {
    interval: Duration,
    tick: TickCallback,
}

impl MockScheduler {
    /// Create an empty mock scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently scheduled (not cancelled) tasks
    pub fn active_tasks(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    /// Intervals of the currently scheduled tasks, in scheduling order
    pub fn intervals(&self) -> Vec<Duration> {
        self.inner
            .lock()
            .unwrap()
            .tasks
            .values()
            .map(|entry| entry.interval)
            .collect()
    }

    /// Snapshot the scheduled callbacks, in scheduling order
    ///
    /// A snapshot taken before a cancel can still be invoked afterwards,
    /// which lets tests replay a tick that was already in flight when
    /// cancellation raced with it.
    pub fn callbacks(&self) -> Vec<TickCallback> {
        self.inner
            .lock()
            .unwrap()
            .tasks
            .values()
            .map(|entry| Arc::clone(&entry.tick))
            .collect()
    }

    /// Fire every scheduled task once
    pub fn fire_all(&self) {
        for tick in self.callbacks() {
            tick();
        }
    }
}

impl TickScheduler for MockScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Box<dyn ScheduledTask> {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.tasks.insert(id, MockEntry { interval, tick });
        Box::new(MockTask {
            id,
            inner: Arc::clone(&self.inner),
        })
    }
}

struct MockTask {
    id: u64,
    inner: Arc<Mutex<MockSchedulerInner>>,
}

impl ScheduledTask for MockTask {
    fn cancel(&self) {
        self.inner.lock().unwrap().tasks.remove(&self.id);
    }
}
