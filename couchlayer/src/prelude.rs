//! Convenient re-exports of commonly used types from couchlayer.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use couchlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client facade and its option set
//! - Driver and capability traits for backend implementers
//! - The feed contract and iterator core
//! - Typed records and facades
//! - Error types

pub use couchlayer_core::{
    client::{Client, Options},
    cluster::ClusterMembership,
    driver::{
        ClusterOps, DbUpdate, DbUpdater, DbUpdatesFeed, Driver, DriverBuilder, Membership,
        Replicator, ServerVersion,
    },
    error::{Error, Result},
    feed::Feed,
    iterator::FeedIterator,
    replication::Replication,
    scan::scan,
    updates::DbUpdates,
};
