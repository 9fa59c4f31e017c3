//! Completion groups: counters of outstanding tasks that can be waited on.
//!
//! A group is created with the number of expected completions before any
//! task is spawned; it cannot grow afterwards. Each task owns a
//! [`CompletionGuard`] which signals the group exactly once when it is
//! dropped, so the signal fires on every exit path including unwinding.
//!
//! Two flavors share the [`Completion`] trait:
//! - [`CompletionGroup`] is awaited from tokio tasks.
//! - [`BlockingCompletionGroup`] parks an OS thread.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use tokio::sync::watch;

/// Something that can be told one of its tasks has finished.
pub trait Completion: Send + Sync + 'static {
    /// Marks one expected completion as done.
    fn done(&self);
}

/// Drop guard that calls [`Completion::done`] once.
#[must_use = "the completion is signalled when the guard is dropped"]
pub struct CompletionGuard<G: Completion> {
    group: Arc<G>,
}

impl<G: Completion> CompletionGuard<G> {
    pub fn new(group: &Arc<G>) -> Self {
        Self {
            group: Arc::clone(group),
        }
    }
}

impl<G: Completion> Drop for CompletionGuard<G> {
    fn drop(&mut self) {
        self.group.done();
    }
}

/// Completion group awaited from async code.
pub struct CompletionGroup {
    pending: watch::Sender<usize>,
}

impl CompletionGroup {
    /// Creates a group already expecting `n` completions.
    pub fn with_pending(n: usize) -> Arc<Self> {
        let (pending, _) = watch::channel(n);
        Arc::new(Self { pending })
    }

    /// Waits until every registered completion has been signalled.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn wait(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives as long as `self`, so this only returns on zero.
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        *self.pending.borrow()
    }
}

impl Completion for CompletionGroup {
    fn done(&self) {
        self.pending.send_modify(|pending| {
            debug_assert!(*pending > 0, "more completions than the group expects");
            *pending = pending.saturating_sub(1);
        });
    }
}

/// Completion group that blocks the calling thread.
pub struct BlockingCompletionGroup {
    pending: Mutex<usize>,
    zero: Condvar,
}

impl BlockingCompletionGroup {
    /// Creates a group already expecting `n` completions.
    pub fn with_pending(n: usize) -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(n),
            zero: Condvar::new(),
        })
    }

    /// Parks the current thread until the counter reaches zero.
    pub fn wait(&self) {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let _pending = self
            .zero
            .wait_while(pending, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Completion for BlockingCompletionGroup {
    fn done(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(*pending > 0, "more completions than the group expects");
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.zero.notify_all();
        }
    }
}
