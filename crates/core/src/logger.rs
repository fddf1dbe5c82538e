//! Identity-tagged logger.
//!
//! Every line carries the worker's symbol, a sub-second wall-clock
//! stamp, the worker id, the message padded to a fixed width, and a
//! descriptor of the executing thread:
//!
//! ```text
//! 🟨  :07:412     1: 🟢 worker compute start                 - Thread:  3 🐰 .default
//! ```
//!
//! The write path is one locked write of a complete line. That per-line
//! atomicity is contractual: the log stream is the experiment's only
//! observable artifact, and a garbled or buffered line would
//! misrepresent the interleaving it is supposed to expose.

use std::io::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Local;

use crate::identity::WorkerIdentity;
use crate::threads;

/// Message column width. Messages are padded or truncated to exactly
/// this many characters so the thread descriptors line up.
const MESSAGE_WIDTH: usize = 40;

/// Destination for finished log lines. Implementations must make each
/// `write_line` call atomic with respect to concurrent callers.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to stdout under the stream lock.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

/// A line captured by [`MemorySink`], stamped with a monotonic instant
/// taken under the sink lock so capture order matches stamp order.
#[derive(Debug, Clone)]
pub struct CapturedLine {
    pub at: Instant,
    pub line: String,
}

/// Collects lines in memory. Used by the ordering tests, which need
/// monotonic timestamps rather than a terminal.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything captured so far, in emission order.
    pub fn captured(&self) -> Vec<CapturedLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Just the line texts, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.captured().into_iter().map(|c| c.line).collect()
    }

    /// The capture instant of the first line containing `needle`.
    pub fn instant_of(&self, needle: &str) -> Option<Instant> {
        self.captured()
            .into_iter()
            .find(|c| c.line.contains(needle))
            .map(|c| c.at)
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        let mut lines = self.lines.lock().unwrap();
        lines.push(CapturedLine {
            at: Instant::now(),
            line: line.to_string(),
        });
    }
}

/// Logger bound to one [`WorkerIdentity`].
///
/// Cheap to clone; clones share the sink and keep the identity.
#[derive(Clone)]
pub struct Logger {
    identity: WorkerIdentity,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(identity: WorkerIdentity, sink: Arc<dyn LogSink>) -> Self {
        Self { identity, sink }
    }

    /// Convenience constructor for stdout logging with a raw id.
    pub fn to_stdout(id: usize) -> Self {
        Self::new(WorkerIdentity::new(id), Arc::new(StdoutSink))
    }

    pub fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    pub fn sink(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.sink)
    }

    /// Emit one complete line for `message`, stamped with wall-clock
    /// time and the executing thread's descriptor.
    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format(":%S:%3f");
        let line = format!(
            "{}  {}    {:2}: {} - Thread: {}",
            self.identity.symbol(),
            timestamp,
            self.identity.id(),
            pad(message),
            threads::descriptor(),
        );
        self.sink.write_line(&line);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Pad or truncate to [`MESSAGE_WIDTH`] characters. Width attributes in
/// `format!` count bytes, not characters, so emoji-bearing messages are
/// padded by hand.
fn pad(message: &str) -> String {
    let mut out: String = message.chars().take(MESSAGE_WIDTH).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(MESSAGE_WIDTH - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_fills_short_messages() {
        let padded = pad("hi");
        assert_eq!(padded.chars().count(), MESSAGE_WIDTH);
        assert!(padded.starts_with("hi "));
    }

    #[test]
    fn pad_truncates_long_messages() {
        let long = "x".repeat(MESSAGE_WIDTH + 10);
        assert_eq!(pad(&long).chars().count(), MESSAGE_WIDTH);
    }

    #[test]
    fn line_carries_symbol_id_and_thread() {
        let sink = MemorySink::new();
        let logger = Logger::new(WorkerIdentity::new(2), sink.clone());
        logger.log("hello");

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.starts_with(WorkerIdentity::new(2).symbol()));
        assert!(line.contains(" 2: hello"));
        assert!(line.contains(" - Thread: "));
    }

    #[test]
    fn concurrent_writers_never_interleave_lines() {
        const THREADS: usize = 8;
        const LINES: usize = 50;

        let sink = MemorySink::new();
        let handles: Vec<_> = (0..THREADS)
            .map(|id| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    let logger = Logger::new(WorkerIdentity::new(id), sink);
                    for i in 0..LINES {
                        logger.log(&format!("worker {id} line {i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), THREADS * LINES);
        for line in &lines {
            // Every line is complete: one symbol prefix, one thread
            // descriptor, exactly one "worker" message in between.
            assert_eq!(line.matches(" - Thread: ").count(), 1, "garbled: {line}");
            assert_eq!(line.matches("worker ").count(), 1, "garbled: {line}");
        }
    }
}
