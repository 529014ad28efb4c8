use std::sync::{Arc, Mutex};

use crate::player::{PlaybackListener, PlaybackState};
use crate::session::MediaSession;

/// Playback listener that keeps a [`MediaSession`] in sync with the player
///
/// State changes update the session's reported state, position, and action
/// set; progress ticks refresh the reported position. The mirror tracks
/// the last broadcast position itself, so a state change can report it
/// without calling back into the player (the player's lock is held while
/// listeners run).
pub struct SessionMirror {
    session: Arc<Mutex<MediaSession>>,
    last_position: u64,
}

impl SessionMirror {
    pub fn new(session: Arc<Mutex<MediaSession>>) -> Self {
        Self {
            session,
            last_position: 0,
        }
    }
}

impl PlaybackListener for SessionMirror {
    fn on_state_changed(&mut self, new_state: PlaybackState) {
        self.session
            .lock()
            .unwrap()
            .set_playback(new_state, self.last_position);
    }

    fn on_progress_updated(&mut self, position_ms: u64) {
        self.last_position = position_ms;
        self.session.lock().unwrap().set_position(position_ms);
    }
}
