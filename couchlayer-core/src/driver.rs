//! Driver contract for pluggable storage backends.
//!
//! This module defines the traits a backend must implement to plug into the
//! client layer, whether it is a remote HTTP server, an in-process engine, or
//! a test fake.
//!
//! # Overview
//!
//! [`Driver`] is the base contract every backend implements: the handful of
//! operations any CouchDB-family store supports. Everything beyond that is an
//! optional *capability*: a narrow trait ([`ClusterOps`], [`Membership`],
//! [`DbUpdater`], [`Replicator`]) a backend advertises through the probe
//! methods on `Driver`. A probe returning `None` means the capability is
//! absent, and the client facade reports it with a stable
//! `501 Not Implemented` error instead of calling through.
//!
//! # Traits
//!
//! - [`Driver`]: base operations plus capability probes
//! - [`DriverBuilder`]: factory trait for constructing driver instances
//! - [`ClusterOps`] / [`Membership`] / [`DbUpdater`] / [`Replicator`]:
//!   optional capability contracts
//! - [`DbUpdatesFeed`]: the driver-level stream of database updates

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::client::Options;
use crate::error::Result;

/// Abstract interface to a CouchDB-family backend.
///
/// Implementations must be thread-safe and support concurrent access from
/// multiple async tasks. All methods are async and may block on I/O; the
/// caller cancels them by dropping the future, so drivers should avoid
/// holding non-async locks across await points.
///
/// # Capability probes
///
/// The probe methods default to `None`. A backend that supports a capability
/// overrides the probe to return its operation set, typically `Some(self)`.
/// Probes are synchronous and cheap; the client facade consults them on
/// every call.
#[async_trait]
pub trait Driver: Send + Sync + Debug + 'static {
    /// Reports the server version and vendor.
    async fn version(&self) -> Result<ServerVersion>;

    /// Lists the names of all databases on the backend.
    async fn all_dbs(&self) -> Result<Vec<String>>;

    /// Reports whether a database with the given name exists.
    async fn db_exists(&self, name: &str) -> Result<bool>;

    /// Creates a new database with the given name.
    async fn create_db(&self, name: &str) -> Result<()>;

    /// Permanently deletes a database and all its documents.
    async fn destroy_db(&self, name: &str) -> Result<()>;

    /// Probes for cluster status and setup operations.
    fn cluster(&self) -> Option<&dyn ClusterOps> {
        None
    }

    /// Probes for the `/_membership` endpoint.
    fn membership(&self) -> Option<&dyn Membership> {
        None
    }

    /// Probes for the database-updates feed.
    fn db_updater(&self) -> Option<&dyn DbUpdater> {
        None
    }

    /// Probes for replication support.
    fn replicator(&self) -> Option<&dyn Replicator> {
        None
    }
}

/// Factory trait for creating driver instances.
#[async_trait]
pub trait DriverBuilder {
    /// The driver type this builder produces.
    type Driver: Driver;

    /// Builds and returns a new driver instance.
    async fn build(self) -> Result<Self::Driver>;
}

/// Cluster status and setup operations (`/_cluster_setup`).
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Reports the cluster state, e.g. `"cluster_finished"` or
    /// `"single_node_enabled"`.
    async fn cluster_status(&self, options: &Options) -> Result<String>;

    /// Executes a cluster setup action.
    async fn cluster_setup(&self, action: Value) -> Result<()>;
}

/// The `/_membership` endpoint: node lists of a clustered backend.
#[async_trait]
pub trait Membership: Send + Sync {
    /// Reports the nodes known to, and participating in, the cluster.
    async fn membership(&self) -> Result<ClusterMembership>;
}

/// The database-updates capability: a feed of database lifecycle events.
#[async_trait]
pub trait DbUpdater: Send + Sync {
    /// Opens a new updates feed.
    ///
    /// A failure here surfaces synchronously from the client facade; no
    /// iterator is constructed around a feed that never opened.
    async fn db_updates(&self) -> Result<Box<dyn DbUpdatesFeed>>;
}

/// The driver-level stream of [`DbUpdate`] records.
///
/// The client facade adapts this into the generic
/// [`Feed`](crate::feed::Feed) contract and hands ownership to the iterator
/// core; driver authors only implement produce-next and close.
#[async_trait]
pub trait DbUpdatesFeed: Send {
    /// Fills `update` with the next event, or returns
    /// [`Error::EndOfStream`](crate::error::Error) when the feed ends.
    async fn next(&mut self, update: &mut DbUpdate) -> Result<()>;

    /// Releases the transport resources behind this feed.
    async fn close(&mut self) -> Result<()>;
}

/// Replication support: trigger a replication between two endpoints.
#[async_trait]
pub trait Replicator: Send + Sync {
    /// Starts replicating `source` into `target`.
    async fn replicate(
        &self,
        target: &str,
        source: &str,
        options: &Options,
    ) -> Result<Replication>;
}

/// Server version metadata, as reported by the backend's welcome response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    /// The version string, e.g. `"3.3.3"`.
    pub version: String,
    /// The vendor name.
    pub vendor: String,
}

/// Node lists reported by the `/_membership` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMembership {
    /// All nodes known to the queried node, clustered or not.
    pub all_nodes: Vec<String>,
    /// The nodes participating in the cluster.
    pub cluster_nodes: Vec<String>,
}

/// One event on a database-updates feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbUpdate {
    /// Name of the database the event concerns.
    pub db_name: String,
    /// Event kind, e.g. `"created"`, `"updated"` or `"deleted"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Update sequence at which the event occurred.
    pub seq: String,
}

/// The driver-level record describing a triggered replication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replication {
    /// Identifier assigned to the replication by the backend.
    pub replication_id: String,
    /// Source endpoint.
    pub source: String,
    /// Target endpoint.
    pub target: String,
    /// When the backend started the replication, if it reports that.
    pub start_time: Option<DateTime<Utc>>,
}
