//! In-memory buffering log sink
//!
//! The buffer is the default sink for a run: it is always available, replays
//! its contents on demand, and notifies registered listeners per message so
//! a UI poller or a test harness can observe messages as they arrive.

use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::Mutex;

use super::{LogLevel, LogMessage, LogSink};

type Listener = Box<dyn Fn(&LogMessage) + Send + Sync>;

/// Handle returned by [`BufferSink::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(usize);

/// Thread-safe, append-only log buffer with per-message notifications
#[derive(Default)]
pub struct BufferSink {
    messages: Mutex<Vec<LogMessage>>,
    listeners: Mutex<Vec<Option<Listener>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener invoked once per logged message.
    ///
    /// Delivery is fire-and-forget: a panicking listener is isolated and
    /// does not prevent delivery to the remaining listeners, and the
    /// logging caller is never blocked on listener outcomes.
    pub fn subscribe(&self, listener: impl Fn(&LogMessage) + Send + Sync + 'static) -> ListenerHandle {
        let mut listeners = self.listeners.lock();
        listeners.push(Some(Box::new(listener)));
        ListenerHandle(listeners.len() - 1)
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, handle: ListenerHandle) {
        let mut listeners = self.listeners.lock();
        if let Some(slot) = listeners.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Copy of all messages logged so far, in insertion order
    pub fn snapshot(&self) -> Vec<LogMessage> {
        self.messages.lock().clone()
    }

    /// Render the whole buffer as newline-separated formatted lines
    pub fn render(&self) -> String {
        self.messages
            .lock()
            .iter()
            .map(LogMessage::format)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl LogSink for BufferSink {
    fn log(&self, level: LogLevel, text: &str) {
        let message = LogMessage::new(level, text);

        // The producer lock covers only the append; listeners run outside it.
        self.messages.lock().push(message.clone());

        let listeners = self.listeners.lock();
        for listener in listeners.iter().flatten() {
            let _ = catch_unwind(AssertUnwindSafe(|| listener(&message)));
        }
    }
}
