//! One-shot completion handoff.
//!
//! Async negotiations finish on a worker thread, but their outcomes must be
//! applied by whoever owns the rooms (typically a UI loop). Workers post
//! completions through a [`CompletionSender`]; the owner drains them from its
//! [`CompletionQueue`] on its own thread, one at a time. Completions never run
//! concurrently with each other or with anything else the owner does between
//! drains.

use tokio::sync::mpsc;

use crate::ServiceError;

/// Work posted back to the owning context.
type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Create a connected sender/queue pair.
pub fn completion_channel() -> (CompletionSender, CompletionQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSender { tx }, CompletionQueue { rx })
}

/// Cloneable handle workers use to post completions.
#[derive(Clone)]
pub struct CompletionSender {
    tx: mpsc::UnboundedSender<Completion>,
}

impl CompletionSender {
    /// Post `completion` to the owning context.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ContextClosed`] if the queue was dropped. The
    /// completion is dropped without running.
    pub fn post(&self, completion: impl FnOnce() + Send + 'static) -> Result<(), ServiceError> {
        self.tx.send(Box::new(completion)).map_err(|_| ServiceError::ContextClosed)
    }

    /// Whether the owning queue is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner side of the handoff. Runs completions on the caller's thread.
pub struct CompletionQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl CompletionQueue {
    /// Wait for the next completion and run it.
    ///
    /// Returns `false` once every sender is gone and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                completion();
                true
            },
            None => false,
        }
    }

    /// Run every completion already posted, without waiting.
    ///
    /// Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.rx.try_recv() {
            completion();
            ran += 1;
        }
        ran
    }
}
