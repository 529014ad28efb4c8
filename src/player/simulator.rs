use std::sync::{Arc, Mutex};

use crate::logging::LogSink;
use crate::player::{PlaybackListener, PlaybackState, PlayerSnapshot, SimulatorConfig};
use crate::timer::{Clock, ScheduledTask, TickCallback, TickScheduler};

/// Tag used for diagnostics emitted through the log sink
const TAG: &str = "SimulatedPlayer";

/// Very simple playback simulator
///
/// Starts paused at position 0. While playing, a periodic tick re-derives
/// the position from a timestamp captured at the last `play` or `seek_to`
/// and broadcasts it to every registered listener. State-changing methods
/// no-op (with a diagnostic) when already in the requested state.
///
/// All state lives behind one mutex shared with the tick task, so direct
/// calls and timer ticks are serialized against each other. Listeners are
/// invoked while that lock is held; they must not call back into the
/// player.
pub struct SimulatedPlayer {
    shared: Arc<Mutex<PlayerShared>>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn TickScheduler>,
    logger: Arc<dyn LogSink>,
    config: SimulatorConfig,
    /// Handle for the periodic update loop; `Some` iff state is Playing
    tick_task: Option<Box<dyn ScheduledTask>>,
    released: bool,
}

struct PlayerShared {
    state: PlaybackState,
    current_position: u64,
    /// Position captured at the start of the current playing span
    span_base: u64,
    /// Clock reading captured at the last play or seek
    last_timestamp: u64,
    listeners: Vec<Box<dyn PlaybackListener>>,
}

impl SimulatedPlayer {
    /// Create a paused player at position 0
    pub fn new(
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TickScheduler>,
        logger: Arc<dyn LogSink>,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(PlayerShared {
                state: PlaybackState::Paused,
                current_position: 0,
                span_base: 0,
                last_timestamp: 0,
                listeners: Vec::new(),
            })),
            clock,
            scheduler,
            logger,
            config,
            tick_task: None,
            released: false,
        }
    }

    /// Register a listener; registration order is notification order
    ///
    /// No deduplication is performed: a listener registered twice receives
    /// every event twice.
    pub fn add_playback_listener(&mut self, listener: Box<dyn PlaybackListener>) {
        if self.released {
            self.logger.log(TAG, "add_playback_listener: player is released");
            return;
        }
        self.shared.lock().unwrap().listeners.push(listener);
    }

    /// Start playback; no-op when already playing
    pub fn play(&mut self) {
        if self.released {
            self.logger.log(TAG, "play: player is released");
            return;
        }

        {
            let mut shared = self.shared.lock().unwrap();
            if shared.state == PlaybackState::Playing {
                self.logger.log(TAG, "play: already playing");
                return;
            }

            // Fresh anchor so the first tick's delta is measured from here
            shared.last_timestamp = self.clock.now_ms();
            shared.span_base = shared.current_position;
            shared.state = PlaybackState::Playing;
            for listener in &mut shared.listeners {
                listener.on_state_changed(PlaybackState::Playing);
            }
        }

        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        let logger = Arc::clone(&self.logger);
        let tick: TickCallback = Arc::new(move || {
            let mut shared = shared.lock().unwrap();
            advance_position(&mut shared, clock.as_ref(), logger.as_ref());
        });
        self.tick_task = Some(
            self.scheduler
                .schedule_repeating(self.config.tick_interval, tick),
        );
    }

    /// Pause playback; no-op when already paused
    ///
    /// Performs one final position update (with its progress broadcast)
    /// before the loop stops, so no in-flight progress is lost.
    pub fn pause(&mut self) {
        if self.released {
            self.logger.log(TAG, "pause: player is released");
            return;
        }

        {
            let mut shared = self.shared.lock().unwrap();
            if shared.state == PlaybackState::Paused {
                self.logger.log(TAG, "pause: already paused");
                return;
            }

            // One last update.
            advance_position(&mut shared, self.clock.as_ref(), self.logger.as_ref());
            shared.state = PlaybackState::Paused;
            for listener in &mut shared.listeners {
                listener.on_state_changed(PlaybackState::Paused);
            }
        }

        if let Some(task) = self.tick_task.take() {
            task.cancel();
        }
    }

    /// Jump to an absolute position without changing the playback state
    ///
    /// Clamped to the configured duration when one is set. Resets the
    /// timing anchor, so subsequent ticks measure from the seek point.
    pub fn seek_to(&mut self, position_ms: u64) {
        if self.released {
            self.logger.log(TAG, "seek_to: player is released");
            return;
        }

        let target = match self.config.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };

        let mut shared = self.shared.lock().unwrap();
        shared.current_position = target;
        shared.span_base = target;
        shared.last_timestamp = self.clock.now_ms();
        for listener in &mut shared.listeners {
            listener.on_progress_updated(target);
        }
    }

    /// Stop the loop, drop every listener, and make the player inert
    ///
    /// Further operations are warn-logged no-ops; no listener receives any
    /// event after this returns.
    pub fn release(&mut self) {
        if self.released {
            self.logger.log(TAG, "release: already released");
            return;
        }

        if let Some(task) = self.tick_task.take() {
            task.cancel();
        }

        let mut shared = self.shared.lock().unwrap();
        shared.state = PlaybackState::Paused;
        shared.listeners.clear();
        drop(shared);

        self.released = true;
    }

    /// Current playback position in milliseconds
    pub fn current_position(&self) -> u64 {
        self.shared.lock().unwrap().current_position
    }

    /// Current playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.shared.lock().unwrap().state
    }

    /// Current `{state, position}` pair
    pub fn snapshot(&self) -> PlayerSnapshot {
        let shared = self.shared.lock().unwrap();
        PlayerSnapshot {
            state: shared.state,
            position_ms: shared.current_position,
        }
    }
}

impl Drop for SimulatedPlayer {
    fn drop(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.cancel();
        }
    }
}

/// Re-derive the position from the span anchor and broadcast it
///
/// The delta is always measured against the timestamp captured at the last
/// play or seek, never against the previous tick, so replaying a tick with
/// the same clock reading is idempotent.
fn advance_position(shared: &mut PlayerShared, clock: &dyn Clock, logger: &dyn LogSink) {
    if shared.state != PlaybackState::Playing {
        // A pause or release won the race against this tick
        logger.log(TAG, "tick: state is not Playing");
        return;
    }

    let elapsed = clock.now_ms().saturating_sub(shared.last_timestamp);
    shared.current_position = shared.span_base + elapsed;
    let position = shared.current_position;
    for listener in &mut shared.listeners {
        listener.on_progress_updated(position);
    }
}
