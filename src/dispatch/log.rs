//! User-facing activity feed shared by the sender and its observers.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use std::fmt::Display;
use std::sync::mpsc::sync_channel;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::SyncSender;
use std::sync::mpsc::TrySendError;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Severity of a feed entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Warning,
    Error,
}

impl LogKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the activity feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub kind: LogKind,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            kind,
        }
    }

    /// The timestamp in RFC 3339 form, e.g. `2024-05-01T09:30:00Z`.
    pub fn rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Whoever is listening for feed entries.
pub trait LogSink {
    fn deliver(&self, entry: LogEntry);

    fn info(&self, message: &str) {
        self.deliver(LogEntry::new(message, LogKind::Info));
    }

    fn warning(&self, message: &str) {
        self.deliver(LogEntry::new(message, LogKind::Warning));
    }

    fn error(&self, message: &str) {
        self.deliver(LogEntry::new(message, LogKind::Error));
    }
}

/// In-memory feed: keeps every entry and fans it out to channel subscribers.
///
/// A subscriber whose channel is full misses the entry; one whose receiver
/// was dropped is forgotten. Delivery never blocks.
#[derive(Default)]
pub struct LogFeed {
    entries: RwLock<Vec<LogEntry>>,
    subscribers: Mutex<Vec<SyncSender<LogEntry>>>,
}

impl LogFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry delivered so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Opens a channel receiving every later entry, buffering up to `capacity`.
    pub fn subscribe(&self, capacity: usize) -> Receiver<LogEntry> {
        let (sender, receiver) = sync_channel(capacity);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }
}

impl LogSink for LogFeed {
    fn deliver(&self, entry: LogEntry) {
        match entry.kind {
            LogKind::Info => tracing::info!("{}", entry.message),
            LogKind::Warning => tracing::warn!("{}", entry.message),
            LogKind::Error => tracing::error!("{}", entry.message),
        }

        // Recorded before any subscriber sees it
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());

        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|sender| match sender.try_send(entry.clone()) {
                Ok(()) | Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_history_in_order() {
        let feed = LogFeed::new();
        feed.info("Checking if recipients are valid");
        feed.warning("No recipients");
        feed.error("boom");

        let entries = feed.entries();
        let kinds: Vec<LogKind> = entries.iter().map(|entry| entry.kind).collect();
        assert_eq!(kinds, vec![LogKind::Info, LogKind::Warning, LogKind::Error]);
        assert_eq!(entries[1].message, "No recipients");
        assert!(entries[0].timestamp <= entries[2].timestamp);
    }

    #[test]
    fn subscribers_receive_later_entries() {
        let feed = LogFeed::new();
        feed.info("before");
        let receiver = feed.subscribe(8);
        feed.info("after");

        let entry = receiver.try_recv().unwrap();
        assert_eq!(entry.message, "after");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn history_holds_an_entry_before_subscribers_see_it() {
        let feed = std::sync::Arc::new(LogFeed::new());
        let receiver = feed.subscribe(1);
        let reader = {
            let feed = std::sync::Arc::clone(&feed);
            std::thread::spawn(move || {
                let entry = receiver.recv().unwrap();
                feed.entries().contains(&entry)
            })
        };

        feed.info("sent");
        assert!(reader.join().unwrap());
    }

    #[test]
    fn full_or_closed_subscribers_never_block() {
        let feed = LogFeed::new();
        let slow = feed.subscribe(1);
        let closed = feed.subscribe(1);
        drop(closed);

        feed.info("one");
        feed.info("two");

        assert_eq!(slow.try_recv().unwrap().message, "one");
        assert!(slow.try_recv().is_err());
        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.subscribers.lock().unwrap().len(), 1);
    }

    #[test]
    fn timestamps_are_rfc3339() {
        let entry = LogEntry::new("x", LogKind::Info);
        let parsed = DateTime::parse_from_rfc3339(&entry.rfc3339()).unwrap();
        assert_eq!(parsed.timestamp(), entry.timestamp.timestamp());
        assert_eq!(LogKind::Warning.to_string(), "warning");
    }

    #[test]
    fn feed_is_shareable_across_threads() {
        let feed = std::sync::Arc::new(LogFeed::new());
        let handles: Vec<_> = (0..4)
            .map(|index| {
                let feed = std::sync::Arc::clone(&feed);
                std::thread::spawn(move || feed.info(&format!("worker {index}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(feed.entries().len(), 4);
    }
}
