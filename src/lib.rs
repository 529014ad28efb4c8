//! Simulated media playback engine with platform session mirroring.
//!
//! The core is [`SimulatedPlayer`]: a single playback position and a
//! Paused/Playing state, driven forward in real time by a periodic tick
//! while playing, with synchronous fan-out of state and progress events
//! to registered listeners. Around it sit the clock/scheduler seams
//! (`timer`), a media-session surface kept in sync by a listener
//! (`session`), and the logging boundary (`logging`).

pub mod logging;
pub mod player;
pub mod session;
pub mod timer;

pub use logging::{LogBuffer, LogSink, TracingSink};
pub use player::{
    PlaybackListener, PlaybackState, PlayerSnapshot, SimulatedPlayer, SimulatorConfig,
};
pub use session::{
    MediaMetadata, MediaSession, SessionCommand, SessionMirror, SessionSnapshot,
};
pub use timer::{Clock, MonotonicClock, TickScheduler, TokioScheduler};
