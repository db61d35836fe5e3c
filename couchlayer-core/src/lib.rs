//! A driver-agnostic client layer for CouchDB-family document stores.
//!
//! This crate is the core of the couchlayer project and provides:
//!
//! - **Driver contract** ([`driver`]) - Traits a backend implements, plus the
//!   optional capability set it can advertise
//! - **Client facade** ([`client`]) - The application-facing entry point that
//!   probes capabilities and forwards operations
//! - **Feed contract** ([`feed`]) - The low-level streaming contract between
//!   a driver and the iterator core
//! - **Iterator core** ([`iterator`]) - The cancellation-aware, auto-closing
//!   cursor shared by every streaming operation
//! - **Typed facades** ([`updates`]) - Per-payload views over the iterator
//!   with total accessors
//! - **Cluster and replication pass-throughs** ([`cluster`], [`replication`])
//! - **Scan primitive** ([`scan`]) - Copying raw JSON payloads into caller
//!   destinations
//! - **Error handling** ([`error`]) - The single error surface with
//!   HTTP-style statuses
//!
//! # Example
//!
//! ```ignore
//! use couchlayer_core::client::Client;
//! use tokio_util::sync::CancellationToken;
//!
//! let client = Client::new(my_driver);
//! let scope = CancellationToken::new();
//! let updates = client.db_updates(&scope).await?;
//! while updates.next().await {
//!     println!("{}: {}", updates.db_name().await, updates.update_type().await);
//! }
//! updates.close().await?;
//! # Ok::<(), couchlayer_core::error::Error>(())
//! ```

pub mod client;
pub mod cluster;
pub mod driver;
pub mod error;
pub mod feed;
pub mod iterator;
pub mod replication;
pub mod scan;
pub mod updates;

#[cfg(test)]
pub(crate) mod mock;
