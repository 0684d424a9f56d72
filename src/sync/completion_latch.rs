use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Barrier released after exactly `count` completion signals.
///
/// Signals may come from runtime tasks or plain OS threads; waiting is async.
#[derive(Debug)]
pub struct CompletionLatch {
    remaining: AtomicUsize,
    released: Notify
}

impl CompletionLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            released: Notify::new()
        }
    }

    /// Records one completion. Extra signals past zero are ignored.
    pub fn count_down(&self) {
        let previous = self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| remaining.checked_sub(1));

        if previous == Ok(1) {
            self.released.notify_waiters();
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Waits until every expected completion has been signalled.
    pub async fn wait(&self) {
        loop {
            let released = self.released.notified();
            tokio::pin!(released);

            //NOTE: Register interest before checking the counter, otherwise the final signal can slip in between
            released.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }

            released.await;
        }
    }

    /// Hands out a guard that signals completion when dropped, including during unwinding.
    pub fn signal(self: &Arc<Self>) -> CompletionSignal {
        CompletionSignal {
            latch: Arc::clone(self)
        }
    }
}

pub struct CompletionSignal {
    latch: Arc<CompletionLatch>
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
