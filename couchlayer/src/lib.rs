//! Main couchlayer crate providing a unified client for CouchDB-family
//! document stores.
//!
//! This crate is the primary entry point for users of the couchlayer
//! framework. It re-exports the core types and functionality from various
//! sub-crates and provides convenient access to the bundled backends.
//!
//! # Features
//!
//! - **Driver-agnostic client** - One API over remote servers, in-process
//!   engines, and test fakes, with per-capability probing
//! - **Cancellation-aware feeds** - Every streaming operation is bound to a
//!   caller-supplied cancellation scope and cleans up after itself
//! - **Total accessors** - Reading a typed iterator in the wrong state
//!   yields empty values, never a fault
//!
//! # Quick Start
//!
//! ```ignore
//! use couchlayer::{prelude::*, memory::MemoryDriver};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(MemoryDriver::new());
//!
//!     // Open the updates feed, bound to a cancellation scope.
//!     let scope = CancellationToken::new();
//!     let updates = client.db_updates(&scope).await?;
//!
//!     client.create_db("inventory").await?;
//!
//!     while updates.next().await {
//!         println!(
//!             "{} was {} at seq {}",
//!             updates.db_name().await,
//!             updates.update_type().await,
//!             updates.seq().await,
//!         );
//!     }
//!     updates.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a backend
//!
//! A backend implements [`Driver`](driver::Driver) plus whichever capability
//! traits it supports, and advertises them by overriding the probe methods:
//!
//! ```ignore
//! use couchlayer::driver::{ClusterOps, Driver};
//!
//! #[derive(Debug)]
//! struct HttpDriver { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl Driver for HttpDriver {
//!     // ...base operations...
//!
//!     fn cluster(&self) -> Option<&dyn ClusterOps> {
//!         Some(self)
//!     }
//! }
//! ```
//!
//! Capabilities a driver does not advertise surface to callers as stable
//! `501 Not Implemented` errors.
//!
//! # Backends
//!
//! - [`memory`] - Fast in-process engine for development and testing

pub mod prelude;

pub use couchlayer_core::{
    client, cluster, driver, error, feed, iterator, replication, scan, updates,
};

// Re-export the cancellation scope type for convenience
pub use tokio_util::sync::CancellationToken;

/// In-process backend implementations.
pub mod memory {
    pub use couchlayer_memory::{MemoryDriver, MemoryDriverBuilder};
}
