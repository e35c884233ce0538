//! Fan-out log sink
//!
//! Forwards every message to an ordered list of child sinks. The composite
//! is the last line of defense for logging faults: a panicking child is
//! isolated per call and the remaining sinks still receive the message.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::{LogLevel, LogSink};

/// Log sink fanning each message out to an ordered list of sinks
pub struct CompositeSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }

    /// Append a sink to the end of the fan-out order
    pub fn push(&mut self, sink: Arc<dyn LogSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for CompositeSink {
    fn log(&self, level: LogLevel, text: &str) {
        for sink in &self.sinks {
            let _ = catch_unwind(AssertUnwindSafe(|| sink.log(level, text)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::BufferSink;

    struct ExplodingSink;

    impl LogSink for ExplodingSink {
        fn log(&self, _level: LogLevel, _text: &str) {
            panic!("sink failure");
        }
    }

    #[test]
    fn test_fans_out_in_order() {
        let first = Arc::new(BufferSink::new());
        let second = Arc::new(BufferSink::new());
        let composite = CompositeSink::new(vec![first.clone(), second.clone()]);

        composite.info("broadcast");
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_failing_sink_is_isolated() {
        let buffer = Arc::new(BufferSink::new());
        let composite = CompositeSink::new(vec![Arc::new(ExplodingSink), buffer.clone()]);

        composite.info("still delivered");
        composite.error("and this too");

        let messages = buffer.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "still delivered");
        assert_eq!(messages[1].text, "and this too");
    }

    #[test]
    fn test_push_appends_sink() {
        let buffer = Arc::new(BufferSink::new());
        let mut composite = CompositeSink::new(Vec::new());
        assert!(composite.is_empty());

        composite.push(buffer.clone());
        assert_eq!(composite.len(), 1);

        composite.info("late subscriber");
        assert_eq!(buffer.len(), 1);
    }
}
