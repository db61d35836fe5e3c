//! Error types and result types for client operations.
//!
//! This module provides the single error surface for the whole client layer.
//! Use [`Result<T>`] as the return type for fallible operations.
//!
//! Every error maps to an HTTP-style status through [`Error::status`]: a
//! missing capability reports `501 Not Implemented`, a driver error reports
//! whatever status the driver supplied (or `500 Internal Server Error` when
//! it supplied none), and everything else defaults to `500`.

use thiserror::Error;

/// Represents all possible errors that can occur when talking to a
/// CouchDB-family backend through the client layer.
///
/// Variants carry plain string payloads so errors stay cheap to clone; an
/// iterator records its terminal error once and hands out copies on demand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The backend driver does not implement the requested capability.
    /// The payload is the stable, documented message for that capability.
    #[error("{0}")]
    Unsupported(&'static str),
    /// The backend driver returned an error. `status` is the HTTP status the
    /// driver supplied, if any.
    #[error("{message}")]
    Driver {
        /// HTTP status supplied by the driver, if it supplied one.
        status: Option<u16>,
        /// Human-readable driver message.
        message: String,
    },
    /// An accessor was invoked on an iterator that has already been closed.
    #[error("Iterator is closed")]
    IteratorClosed,
    /// An accessor was invoked on an iterator before its first advance.
    #[error("Iterator access before calling Next")]
    IteratorNotReady,
    /// The distinguished terminal signal of a feed: the stream is exhausted
    /// cleanly. Never surfaced by [`err`](crate::iterator::FeedIterator::err);
    /// an exhausted iterator reports success.
    #[error("end of stream")]
    EndOfStream,
    /// Sentinel for a raw scan destination with no storage behind it.
    #[error("nil pointer")]
    NilPointer,
    /// The cancellation scope an iterator was bound to has been cancelled.
    #[error("iterator scope cancelled")]
    Cancelled,
    /// Serialization/deserialization error when decoding a raw JSON payload.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for client-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an unsupported-capability error carrying a stable message.
    pub fn unsupported(message: &'static str) -> Self {
        Error::Unsupported(message)
    }

    /// Creates a driver error with no explicit status (reported as 500).
    pub fn driver(message: impl Into<String>) -> Self {
        Error::Driver { status: None, message: message.into() }
    }

    /// Creates a driver error carrying an explicit HTTP status.
    pub fn driver_status(status: u16, message: impl Into<String>) -> Self {
        Error::Driver { status: Some(status), message: message.into() }
    }

    /// Returns the HTTP status this error reports at the library boundary.
    pub fn status(&self) -> u16 {
        match self {
            Error::Unsupported(_) => 501,
            Error::Driver { status, .. } => status.unwrap_or(500),
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
