//! In-memory backend for couchlayer.
//!
//! This crate provides a thread-safe, in-process implementation of the
//! `Driver` contract. It uses async-aware read-write locks for concurrent
//! access and is ideal for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an
//!   async-aware RwLock
//! - **Live updates feed** - Database creations and deletions are broadcast
//!   to every open `DbUpdates` iterator
//! - **Single-node cluster surface** - Membership and cluster-status answers
//!   matching a standalone node
//!
//! # Quick Start
//!
//! ```ignore
//! use couchlayer_core::client::Client;
//! use couchlayer_memory::MemoryDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(MemoryDriver::new());
//!     client.create_db("inventory").await?;
//!     assert!(client.db_exists("inventory").await?);
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{MemoryDriver, MemoryDriverBuilder};
