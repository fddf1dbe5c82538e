//! Per-thread registry behind the log line's thread descriptor.
//!
//! Every thread that ever logs gets a small sequential number on first
//! use, a personality glyph derived from that number, and a QoS label
//! that pool threads set when they start. The registry is explicit so
//! the descriptor never depends on platform thread-id formats.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::identity::PERSONALITIES;

static NEXT_NUMBER: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static NUMBER: Cell<Option<usize>> = const { Cell::new(None) };
    static QOS_LABEL: RefCell<&'static str> = const { RefCell::new(".default") };
}

/// The calling thread's registry number, assigned on first use.
pub fn number() -> usize {
    NUMBER.with(|n| match n.get() {
        Some(num) => num,
        None => {
            let num = NEXT_NUMBER.fetch_add(1, Ordering::Relaxed);
            n.set(Some(num));
            num
        }
    })
}

/// Claim a number for the main thread. Call this before anything else
/// logs so the main thread shows up as thread 1 with the 🚨 glyph.
pub fn register_main() {
    number();
}

/// Set the QoS label the descriptor reports for the calling thread.
/// Pool threads call this from their start handler; everything else
/// stays at `.default`.
pub fn set_qos_label(label: &'static str) {
    QOS_LABEL.with(|q| *q.borrow_mut() = label);
}

fn personality(num: usize) -> &'static str {
    if num == 1 {
        "🚨"
    } else {
        PERSONALITIES[(num - 1) % PERSONALITIES.len()]
    }
}

/// Human-readable descriptor of the calling thread:
/// `<number> <personality> <qos>[ main]`.
pub fn descriptor() -> String {
    let num = number();
    let qos = QOS_LABEL.with(|q| *q.borrow());
    let mut result = format!("{:2} {} {}", num, personality(num), qos);
    if std::thread::current().name() == Some("main") {
        result.push_str(" main");
    }
    result
}
