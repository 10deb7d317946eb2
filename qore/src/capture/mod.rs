//! Per-call output capture.
//!
//! A full pipeline run aggregates everything its stages say, logs
//! included, into one stream that is extracted once at the end. Each run
//! owns its own [`OutputCapture`]; executors write through a
//! [`CaptureSink`] handed to them for that run only. Nothing process-wide
//! is redirected, so concurrent runs cannot interleave into each other's
//! buffers.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use uuid::Uuid;

/// A buffer collecting the output of a single run.
///
/// Dropping the capture on any exit path releases the buffer; sinks
/// cloned from it keep writing into it but are never observed again.
#[derive(Debug)]
pub struct OutputCapture {
    id: Uuid,
    buffer: Arc<Mutex<String>>,
}

impl OutputCapture {
    /// Starts a new capture.
    #[must_use]
    pub fn begin() -> Self {
        let id = Uuid::new_v4();
        trace!(capture_id = %id, "Output capture started");
        Self {
            id,
            buffer: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Returns the capture's identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns a sink writing into this capture.
    #[must_use]
    pub fn sink(&self) -> CaptureSink {
        CaptureSink {
            capture_id: Some(self.id),
            buffer: Some(Arc::clone(&self.buffer)),
        }
    }

    /// Returns a copy of what has been captured so far.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Ends the capture and returns everything written to it.
    #[must_use]
    pub fn finish(self) -> String {
        let text = std::mem::take(&mut *self.buffer.lock());
        trace!(capture_id = %self.id, bytes = text.len(), "Output capture finished");
        text
    }
}

/// A cloneable writer into an [`OutputCapture`], or a sink that discards.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    capture_id: Option<Uuid>,
    buffer: Option<Arc<Mutex<String>>>,
}

impl CaptureSink {
    /// Creates a sink that drops everything written to it.
    #[must_use]
    pub fn discard() -> Self {
        Self::default()
    }

    /// Returns the identifier of the owning capture, if any.
    #[must_use]
    pub fn capture_id(&self) -> Option<Uuid> {
        self.capture_id
    }

    /// Returns true if writes are dropped.
    #[must_use]
    pub fn is_discarding(&self) -> bool {
        self.buffer.is_none()
    }

    /// Appends text verbatim.
    pub fn write(&self, text: &str) {
        if let Some(buffer) = &self.buffer {
            buffer.lock().push_str(text);
        }
    }

    /// Appends a line, adding a trailing newline.
    pub fn write_line(&self, line: &str) {
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer.lock();
            buffer.push_str(line);
            buffer.push('\n');
        }
    }
}

impl fmt::Write for CaptureSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        CaptureSink::write(self, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt::Write as _;

    #[test]
    fn test_capture_collects_writes() {
        let capture = OutputCapture::begin();
        let sink = capture.sink();

        sink.write_line("Crew Execution Started");
        sink.write("- partial");
        sink.write(" item\n");

        assert_eq!(capture.finish(), "Crew Execution Started\n- partial item\n");
    }

    #[test]
    fn test_cloned_sinks_share_buffer() {
        let capture = OutputCapture::begin();
        let a = capture.sink();
        let b = a.clone();

        a.write_line("one");
        b.write_line("two");

        assert_eq!(a.capture_id(), Some(capture.id()));
        assert_eq!(capture.snapshot(), "one\ntwo\n");
    }

    #[test]
    fn test_fmt_write() {
        let capture = OutputCapture::begin();
        let mut sink = capture.sink();
        writeln!(sink, "Net savings: ${}", 200).unwrap();

        assert_eq!(capture.finish(), "Net savings: $200\n");
    }

    #[test]
    fn test_discard_sink() {
        let sink = CaptureSink::discard();
        assert!(sink.is_discarding());
        assert_eq!(sink.capture_id(), None);
        sink.write_line("dropped");
    }

    #[test]
    fn test_captures_are_isolated() {
        let first = OutputCapture::begin();
        let second = OutputCapture::begin();
        assert_ne!(first.id(), second.id());

        first.sink().write_line("first run");
        second.sink().write_line("second run");

        assert_eq!(first.finish(), "first run\n");
        assert_eq!(second.finish(), "second run\n");
    }

    #[test]
    fn test_sink_outlives_capture() {
        let capture = OutputCapture::begin();
        let sink = capture.sink();
        drop(capture);

        sink.write_line("late write");
    }
}
