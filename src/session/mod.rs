pub mod mirror;

pub use mirror::SessionMirror;

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::logging::LogSink;
use crate::player::{PlaybackState, SimulatedPlayer};

/// Tag used for diagnostics emitted through the log sink
const TAG: &str = "MediaSession";

/// Transport actions a session advertises to external controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionActions {
    pub play: bool,
    pub pause: bool,
    pub play_pause: bool,
    pub stop: bool,
    pub seek: bool,
}

impl SessionActions {
    /// Actions advertised while paused
    pub fn while_paused() -> Self {
        Self {
            play: true,
            pause: false,
            play_pause: true,
            stop: true,
            seek: true,
        }
    }

    /// Actions advertised while playing
    pub fn while_playing() -> Self {
        Self {
            play: false,
            pause: true,
            play_pause: true,
            stop: true,
            seek: true,
        }
    }
}

/// Metadata of the media item the session reports
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// `None` means unbounded media
    pub duration_ms: Option<u64>,
}

/// Externally-visible view of a session at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub state: PlaybackState,
    pub position_ms: u64,
    pub actions: SessionActions,
    pub metadata: MediaMetadata,
}

/// Platform-level media session mirroring the simulator's state
///
/// External controllers read this instead of the player itself. It is kept
/// in sync by a [`SessionMirror`] registered as a playback listener.
pub struct MediaSession {
    metadata: MediaMetadata,
    state: PlaybackState,
    position_ms: u64,
    actions: SessionActions,
    active: bool,
    logger: Arc<dyn LogSink>,
}

impl MediaSession {
    /// Create an inactive session reporting Paused at position 0
    pub fn new(metadata: MediaMetadata, logger: Arc<dyn LogSink>) -> Self {
        Self {
            metadata,
            state: PlaybackState::Paused,
            position_ms: 0,
            actions: SessionActions::while_paused(),
            active: false,
            logger,
        }
    }

    /// Mark the session visible (or invisible) to external controllers
    pub fn set_active(&mut self, active: bool) {
        self.logger
            .log(TAG, if active { "activated" } else { "deactivated" });
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Update the reported state and position, switching the action set
    pub fn set_playback(&mut self, state: PlaybackState, position_ms: u64) {
        self.state = state;
        self.position_ms = position_ms;
        self.actions = match state {
            PlaybackState::Paused => SessionActions::while_paused(),
            PlaybackState::Playing => SessionActions::while_playing(),
        };
    }

    /// Update only the reported position
    pub fn set_position(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
    }

    /// Replace the reported metadata
    pub fn set_metadata(&mut self, metadata: MediaMetadata) {
        self.metadata = metadata;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn actions(&self) -> SessionActions {
        self.actions
    }

    /// Current externally-visible view
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.active,
            state: self.state,
            position_ms: self.position_ms,
            actions: self.actions,
            metadata: self.metadata.clone(),
        }
    }
}

/// Transport command issued by an external controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Play,
    Pause,
    /// Mapped to `pause`; the simulator has no stopped state
    Stop,
    SeekTo(u64),
}

/// Error parsing a transport command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("seek requires a position in milliseconds")]
    MissingSeekPosition,
    #[error("invalid seek position: {0}")]
    InvalidSeekPosition(String),
}

impl SessionCommand {
    /// Parse a textual transport command: `play`, `pause`, `stop`,
    /// or `seek <ms>`
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");
        match command {
            "play" => Ok(SessionCommand::Play),
            "pause" => Ok(SessionCommand::Pause),
            "stop" => Ok(SessionCommand::Stop),
            "seek" => {
                let position = parts.next().ok_or(CommandError::MissingSeekPosition)?;
                let position = position
                    .parse::<u64>()
                    .map_err(|_| CommandError::InvalidSeekPosition(position.to_string()))?;
                Ok(SessionCommand::SeekTo(position))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Route this command into the player, logging it first
    ///
    /// Callers must not hold the session lock here: the player notifies
    /// its listeners synchronously, and the session mirror takes that
    /// lock while handling them.
    pub fn dispatch(&self, player: &mut SimulatedPlayer, logger: &dyn LogSink) {
        match self {
            SessionCommand::Play => {
                logger.log(TAG, "onPlay");
                player.play();
            }
            SessionCommand::Pause => {
                logger.log(TAG, "onPause");
                player.pause();
            }
            SessionCommand::Stop => {
                logger.log(TAG, "onStop");
                player.pause();
            }
            SessionCommand::SeekTo(position_ms) => {
                logger.log(TAG, &format!("onSeekTo {}", position_ms));
                player.seek_to(*position_ms);
            }
        }
    }
}
