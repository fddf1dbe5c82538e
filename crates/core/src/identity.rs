//! Worker identity: a sequential id plus deterministically derived
//! display glyphs used to tell concurrent log streams apart at a glance.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Color glyphs prefixing every log line, selected by `id % len`.
pub const SYMBOLS: &[&str] = &[
    "🟧", "🟨", "🟦", "🟪", "⬛️", "⬜️", "🟫", "🔶", "🔷", "💔", "🧡", "💛", "💚",
    "💙", "💜", "🖤", "🤍", "🤎", "🟠", "🟡", "🔵", "🟣", "⚫️", "⚪️", "🟤",
];

/// Animal glyphs identifying executing threads, selected by
/// `(thread_number - 1) % len`. Thread 1 gets 🚨 instead (see
/// [`crate::threads`]).
pub const PERSONALITIES: &[&str] = &[
    "🐶", "🐱", "🐰", "🦊", "🐼", "🐨", "🐷", "🐸", "🐵", "🐔", "🦆", "🦉", "🦄",
    "🐝", "🐛", "🦋", "🐌", "🐞", "🐜", "🪰", "🦖", "🐙", "🦞", "🐠", "🦚", "🦩",
    "🦫", "🦨",
];

/// Identity of one logical worker: an integer id and its derived symbol.
///
/// Created once per worker instance and immutable afterwards. Ids are
/// handed out sequentially by the driver's [`IdSequence`]; nothing here
/// is process-global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerIdentity {
    id: usize,
}

impl WorkerIdentity {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// The color glyph for this identity.
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.id % SYMBOLS.len()]
    }
}

/// Sequential id allocator owned by the driver.
///
/// Ids are never reused within a driver's lifetime, so two distinct
/// workers in the same run can never collide.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: AtomicUsize,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the sequence at a given id (the driver reserves 0 for
    /// marker tasks and starts workers at 1).
    pub fn starting_at(first: usize) -> Self {
        Self {
            next: AtomicUsize::new(first),
        }
    }

    pub fn next(&self) -> WorkerIdentity {
        WorkerIdentity::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_deterministic_in_id() {
        let a = WorkerIdentity::new(3);
        let b = WorkerIdentity::new(3 + SYMBOLS.len());
        assert_eq!(a.symbol(), b.symbol());
        assert_eq!(a.symbol(), SYMBOLS[3]);
    }

    #[test]
    fn sequence_hands_out_distinct_ids() {
        let seq = IdSequence::starting_at(1);
        assert_eq!(seq.next().id(), 1);
        assert_eq!(seq.next().id(), 2);
        assert_eq!(seq.next().id(), 3);
    }
}
