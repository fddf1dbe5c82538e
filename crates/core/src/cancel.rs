//! Cooperative cancellation token.
//!
//! One token per experiment launch. Suspending operations race against
//! [`CancelToken::cancelled`]; the busy-compute workload deliberately
//! does not check it mid-loop.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Flag-plus-wakeup cancellation signal shared by all tasks of a launch.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Idempotent; wakes every suspended waiter.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the token is tripped. Registers for notification
    /// before re-checking the flag so a cancel between the check and
    /// the await cannot be missed.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let token = Arc::new(CancelToken::new());
        let waiter = {
            let token = Arc::clone(&token);
            tokio::spawn(async move { token.cancelled().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_tripped() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("already-tripped token should not block");
    }
}
