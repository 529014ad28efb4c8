use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Maximum entries kept in the in-memory log
const MAX_LOG_ENTRIES: usize = 1000;

/// Fire-and-forget diagnostics sink consumed by the player and session
///
/// Implementations must never fail the caller.
pub trait LogSink: Send + Sync {
    fn log(&self, tag: &str, message: &str);
}

/// Sink that forwards everything to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, tag: &str, message: &str) {
        debug!("{}: {}", tag, message);
    }
}

/// In-memory log pane holding timestamped entries, newest first
///
/// Entries are formatted as `[Thh:mm:ss.mmm] tag.message` with a local,
/// time-only timestamp. Cloning shares the buffer, so a frontend can keep
/// a handle while the player owns its own copy. Every entry is also
/// forwarded to `tracing`.
#[derive(Clone, Default)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    /// All entries joined with newlines, newest first
    pub fn render(&self) -> String {
        let entries = self.entries.lock().unwrap();
        let mut out = String::new();
        for entry in entries.iter() {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl LogSink for LogBuffer {
    fn log(&self, tag: &str, message: &str) {
        let timestamp = Local::now().format("T%H:%M:%S%.3f");
        let line = format!("[{}] {}.{}", timestamp, tag, message);

        let mut entries = self.entries.lock().unwrap();
        entries.push_front(line);
        entries.truncate(MAX_LOG_ENTRIES);
        drop(entries);

        debug!("{}: {}", tag, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_buffer_is_newest_first() {
        let log = LogBuffer::new();
        log.log("Player", "first");
        log.log("Player", "second");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("Player.second"));
        assert!(entries[1].ends_with("Player.first"));
    }

    #[test]
    fn test_log_buffer_entry_format() {
        let log = LogBuffer::new();
        log.log("MediaSession", "command: play");

        let entries = log.entries();
        // [Thh:mm:ss.mmm] tag.message
        assert!(entries[0].starts_with("[T"));
        assert!(entries[0].contains("] MediaSession.command: play"));
    }

    #[test]
    fn test_log_buffer_clear() {
        let log = LogBuffer::new();
        log.log("Player", "noise");
        log.clear();
        assert!(log.entries().is_empty());
        assert_eq!(log.render(), "");
    }

    #[test]
    fn test_log_buffer_caps_entries() {
        let log = LogBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            log.log("Player", &format!("entry {}", i));
        }
        assert_eq!(log.entries().len(), MAX_LOG_ENTRIES);
        // Newest entry survives the cap
        assert!(log.entries()[0].ends_with(&format!("entry {}", MAX_LOG_ENTRIES + 9)));
    }

    #[test]
    fn test_tracing_sink_never_fails_the_caller() {
        // No subscriber installed; the call must still be a no-op success
        TracingSink.log("SimulatedPlayer", "play: already playing");
    }

    #[test]
    fn test_clones_share_the_buffer() {
        let log = LogBuffer::new();
        let handle = log.clone();
        handle.log("Player", "shared");
        assert_eq!(log.entries().len(), 1);
    }
}
