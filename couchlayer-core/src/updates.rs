//! The database-updates feed: typed facade and client entry point.
//!
//! [`Client::db_updates`] probes the driver for the
//! [`DbUpdater`](crate::driver::DbUpdater) capability, opens a driver feed,
//! and wraps it with the iterator core bound to the caller's cancellation
//! scope. The returned [`DbUpdates`] facade exposes total accessors for the
//! current record: before the first successful advance (and after close)
//! they return empty strings rather than failing.
//!
//! # Example
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//!
//! let scope = CancellationToken::new();
//! let updates = client.db_updates(&scope).await?;
//! while updates.next().await {
//!     println!("{} was {}", updates.db_name().await, updates.update_type().await);
//! }
//! updates.close().await?;
//! # Ok::<(), couchlayer_core::error::Error>(())
//! ```

use async_trait::async_trait;
use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::driver::{DbUpdate, DbUpdatesFeed};
use crate::error::{Error, Result};
use crate::feed::Feed;
use crate::iterator::FeedIterator;

/// Adapts the driver-level updates stream to the generic feed contract.
struct UpdatesFeed {
    feed: Box<dyn DbUpdatesFeed>,
}

#[async_trait]
impl Feed for UpdatesFeed {
    type Item = DbUpdate;

    fn zero(&self) -> DbUpdate {
        DbUpdate::default()
    }

    async fn advance(&mut self, slot: &mut DbUpdate) -> Result<()> {
        self.feed.next(slot).await
    }

    async fn close(&mut self) -> Result<()> {
        self.feed.close().await
    }
}

/// An iterator over a backend's database-updates feed.
pub struct DbUpdates {
    iter: FeedIterator<UpdatesFeed>,
}

impl DbUpdates {
    fn new(scope: &CancellationToken, feed: Box<dyn DbUpdatesFeed>) -> Self {
        Self {
            iter: FeedIterator::new(scope, UpdatesFeed { feed }),
        }
    }

    /// Prepares the next update for reading; see
    /// [`FeedIterator::next`](crate::iterator::FeedIterator::next).
    pub async fn next(&self) -> bool {
        self.iter.next().await
    }

    /// Closes the feed; see
    /// [`FeedIterator::close`](crate::iterator::FeedIterator::close).
    pub async fn close(&self) -> Result<()> {
        self.iter.close().await
    }

    /// Returns the error, if any, encountered during iteration.
    pub async fn err(&self) -> Option<Error> {
        self.iter.err().await
    }

    /// Returns a copy of the current update record.
    ///
    /// # Errors
    ///
    /// Fails with an iterator-state error before the first advance or after
    /// close.
    pub async fn current(&self) -> Result<DbUpdate> {
        self.iter.with_current(Clone::clone).await
    }

    /// Name of the database the current event concerns, or `""` when no
    /// record is ready.
    pub async fn db_name(&self) -> String {
        self.iter
            .with_current(|update| update.db_name.clone())
            .await
            .unwrap_or_default()
    }

    /// Kind of the current event (`"created"`, `"updated"`, `"deleted"`),
    /// or `""` when no record is ready.
    pub async fn update_type(&self) -> String {
        self.iter
            .with_current(|update| update.kind.clone())
            .await
            .unwrap_or_default()
    }

    /// Update sequence of the current event, or `""` when no record is
    /// ready.
    pub async fn seq(&self) -> String {
        self.iter
            .with_current(|update| update.seq.clone())
            .await
            .unwrap_or_default()
    }

    /// Converts this iterator into a [`Stream`] of update records.
    ///
    /// The stream yields `Ok` for each record, then either ends (clean
    /// exhaustion) or yields one final `Err` and ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<DbUpdate>> {
        futures::stream::unfold((self, false), |(updates, done)| async move {
            if done {
                return None;
            }
            if updates.next().await {
                match updates.current().await {
                    Ok(update) => Some((Ok(update), (updates, false))),
                    Err(err) => Some((Err(err), (updates, true))),
                }
            } else {
                updates.err().await.map(|err| (Err(err), (updates, true)))
            }
        })
    }

    #[cfg(test)]
    pub(crate) async fn set_ready(&self, ready: bool) {
        self.iter.set_ready(ready).await;
    }
}

impl Client {
    /// Opens the backend's database-updates feed as an iterator bound to
    /// `scope`.
    ///
    /// Cancelling `scope` closes the iterator with
    /// [`Error::Cancelled`] as its terminal error.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-capability error (status 501) if the driver
    /// does not implement the updates feed. A driver failure while opening
    /// the feed is returned synchronously; no iterator is constructed.
    pub async fn db_updates(&self, scope: &CancellationToken) -> Result<DbUpdates> {
        let Some(updater) = self.driver().db_updater() else {
            return Err(Error::unsupported("driver does not implement DBUpdater"));
        };
        let feed = updater.db_updates().await?;
        tracing::debug!("opened database-updates feed");
        Ok(DbUpdates::new(scope, feed))
    }
}
