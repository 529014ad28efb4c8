pub mod simulator;

pub use simulator::SimulatedPlayer;

use serde::Serialize;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    Paused,
    Playing,
}

impl PlaybackState {
    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        *self == PlaybackState::Playing
    }
}

/// Observer notified of playback state transitions and progress ticks
///
/// Both events are delivered synchronously on whatever context triggered
/// them, in listener registration order. The player does not isolate
/// listener panics; they unwind into the caller of the triggering
/// operation.
pub trait PlaybackListener: Send {
    /// A genuine Paused/Playing transition happened
    fn on_state_changed(&mut self, new_state: PlaybackState);

    /// The playback position moved (periodic tick, seek, or the final
    /// update performed by `pause`)
    fn on_progress_updated(&mut self, position_ms: u64);
}

/// Playback simulation configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Interval between progress updates while playing
    pub tick_interval: Duration,
    /// Media duration in milliseconds; seeks are clamped to it when set.
    /// `None` means unbounded media.
    pub duration_ms: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            duration_ms: None,
        }
    }
}

/// The player's `{state, position}` pair at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub position_ms: u64,
}
