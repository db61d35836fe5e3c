//! The reusable cursor wrapping a [`Feed`].
//!
//! [`FeedIterator`] is the one synchronization point of the streaming model.
//! It binds a feed to a caller-supplied cancellation scope, enforces the
//! not-yet-advanced → ready → closed state machine, serializes access through
//! a single async reader-writer lock, auto-closes on exhaustion or error, and
//! makes close idempotent.
//!
//! # Lifecycle
//!
//! An iterator is created from a cancellation scope and a feed. Construction
//! derives a child scope and launches a watcher task that closes the iterator
//! if the scope is cancelled; closing the iterator cancels the child scope,
//! so the watcher always terminates. The feed is released exactly once, on
//! whichever of explicit close, auto-close, cancellation, or drop comes
//! first.
//!
//! # Concurrency
//!
//! `next` and `close` take the lock exclusively; `err` and
//! [`with_current`](FeedIterator::with_current) take it shared. Callers must
//! not race `next` against itself; doing so is a programming error, but the
//! exclusive lock guarantees the worst outcome is a lost element or a
//! premature close, never a violated invariant.

use std::sync::Arc;

use mea::rwlock::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::feed::Feed;

struct IterState<F: Feed> {
    feed: F,
    cur_val: F::Item,
    /// Set once the first advance attempt has completed.
    ready: bool,
    closed: bool,
    /// The terminal error, set at most once and preserved across closes.
    last_err: Option<Error>,
}

/// A cancellation-aware cursor over a [`Feed`].
///
/// Typed facades such as [`DbUpdates`](crate::updates::DbUpdates) wrap this
/// core and delegate `next`/`close`/`err` to it. The iterator must be
/// constructed inside a Tokio runtime; it spawns one watcher task per
/// instance.
pub struct FeedIterator<F: Feed> {
    state: Arc<RwLock<IterState<F>>>,
    /// Child token of the caller's scope; cancelled on close so the watcher
    /// exits.
    cancel: CancellationToken,
}

impl<F: Feed> FeedIterator<F> {
    /// Wraps `feed` in a new, not-yet-advanced iterator bound to `scope`.
    ///
    /// A child token of `scope` is derived and watched by a background task;
    /// cancelling `scope` closes the iterator with
    /// [`Error::Cancelled`] as its terminal error.
    pub fn new(scope: &CancellationToken, feed: F) -> Self {
        let cur_val = feed.zero();
        let state = Arc::new(RwLock::new(IterState {
            feed,
            cur_val,
            ready: false,
            closed: false,
            last_err: None,
        }));
        let cancel = scope.child_token();

        let watcher_state = Arc::clone(&state);
        let watcher_token = cancel.clone();
        tokio::spawn(async move {
            watcher_token.cancelled().await;
            tracing::trace!("iterator scope done, closing feed");
            let _ = Self::close_with(&watcher_state, &watcher_token, Some(Error::Cancelled)).await;
        });

        Self { state, cancel }
    }

    /// Prepares the next result value for reading.
    ///
    /// Returns `true` on success, or `false` if there is no next result or an
    /// error occurred while preparing it; consult [`err`](Self::err) to
    /// distinguish the two. On a `false` return the iterator has auto-closed
    /// and further calls keep returning `false` without touching the feed.
    pub async fn next(&self) -> bool {
        let advanced = {
            let mut state = self.state.write().await;
            if state.closed {
                return false;
            }
            state.ready = true;
            let IterState { feed, cur_val, last_err, .. } = &mut *state;
            match feed.advance(cur_val).await {
                Ok(()) => true,
                Err(err) => {
                    *last_err = Some(err);
                    false
                }
            }
        };
        if !advanced {
            let _ = self.close().await;
        }
        advanced
    }

    /// Closes the iterator, preventing further enumeration and releasing the
    /// feed's resources.
    ///
    /// Idempotent: only the first call releases the feed, and only that call
    /// can return the feed's close error. Closing does not affect the result
    /// of [`err`](Self::err).
    pub async fn close(&self) -> Result<()> {
        Self::close_with(&self.state, &self.cancel, None).await
    }

    async fn close_with(
        state: &Arc<RwLock<IterState<F>>>,
        cancel: &CancellationToken,
        cause: Option<Error>,
    ) -> Result<()> {
        let mut state = state.write().await;
        if state.closed {
            return Ok(());
        }
        state.closed = true;

        // The first terminal error wins; an explicit close records nothing.
        if state.last_err.is_none() {
            state.last_err = cause;
        }

        let released = state.feed.close().await;
        cancel.cancel();
        released
    }

    /// Returns the error, if any, encountered during iteration.
    ///
    /// End-of-stream is not an error: an iterator that ran to exhaustion
    /// reports `None` here, before and after any number of close calls.
    pub async fn err(&self) -> Option<Error> {
        let state = self.state.read().await;
        match &state.last_err {
            Some(Error::EndOfStream) => None,
            other => other.clone(),
        }
    }

    /// Invokes `f` with read-only access to the current value, under the
    /// shared lock.
    ///
    /// Fails with [`Error::IteratorClosed`] after close and with
    /// [`Error::IteratorNotReady`] before the first advance. Typed facades
    /// build their total accessors on top of this by defaulting the error
    /// cases to zero values.
    pub async fn with_current<R>(&self, f: impl FnOnce(&F::Item) -> R) -> Result<R> {
        let state = self.state.read().await;
        if state.closed {
            return Err(Error::IteratorClosed);
        }
        if !state.ready {
            return Err(Error::IteratorNotReady);
        }
        Ok(f(&state.cur_val))
    }

    #[cfg(test)]
    pub(crate) async fn set_ready(&self, ready: bool) {
        self.state.write().await.ready = ready;
    }
}

impl<F: Feed> Drop for FeedIterator<F> {
    fn drop(&mut self) {
        // An un-closed iterator hands the feed release to its watcher.
        self.cancel.cancel();
    }
}
