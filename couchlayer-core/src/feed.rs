//! The low-level streaming contract between a backend driver and the
//! iterator core.
//!
//! A [`Feed`] is a single-consumer producer of stream elements: it can mint a
//! zero value of its element type, advance into a caller-supplied slot, and
//! release its transport resources. Feeds carry no cancellation logic of
//! their own; the [`FeedIterator`](crate::iterator::FeedIterator) that wraps
//! a feed owns it exclusively and handles cancellation through its bound
//! scope.

use async_trait::async_trait;

use crate::error::Result;

/// A value-producer backing one iterator.
///
/// Implementations are typically thin adapters over a driver-level stream
/// (an HTTP response body, a broadcast receiver, a scripted test fake).
///
/// # Contract
///
/// - [`zero`](Feed::zero) is called once, at iterator construction, to
///   allocate the slot the iterator will repeatedly fill.
/// - [`advance`](Feed::advance) fills the slot with the next element. It
///   returns `Ok(())` on success, [`Error::EndOfStream`](crate::error::Error)
///   when the stream is exhausted cleanly, or a transport/decoding error.
///   After any `Err` return the feed is spent and `advance` is not called
///   again.
/// - [`close`](Feed::close) releases all resources. The iterator core calls
///   it at most once, and may call it after a failed advance.
#[async_trait]
pub trait Feed: Send + 'static {
    /// The element type this feed produces.
    type Item: Send + Sync + 'static;

    /// Returns a fresh zero value of the element type.
    fn zero(&self) -> Self::Item;

    /// Fills `slot` with the next element. May block on I/O.
    async fn advance(&mut self, slot: &mut Self::Item) -> Result<()>;

    /// Releases all transport resources held by this feed.
    async fn close(&mut self) -> Result<()>;
}
