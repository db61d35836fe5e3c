//! In-process driver implementation.
//!
//! This module provides a simple but complete backend that keeps its
//! database set in memory behind an async-safe read-write lock and
//! broadcasts lifecycle events to every open updates feed.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;

use couchlayer_core::client::Options;
use couchlayer_core::driver::{
    ClusterMembership, ClusterOps, DbUpdate, DbUpdater, DbUpdatesFeed, Driver, DriverBuilder,
    Membership, ServerVersion,
};
use couchlayer_core::error::{Error, Result};

/// The node name a standalone engine reports from `/_membership`.
const LOCAL_NODE: &str = "nonode@nohost";

/// Default capacity of the updates broadcast channel. Feeds that fall more
/// than this many events behind observe a lag error and terminate.
const DEFAULT_UPDATES_CAPACITY: usize = 1024;

#[derive(Debug)]
struct EngineState {
    dbs: BTreeSet<String>,
    /// Monotone update sequence, bumped on every lifecycle event.
    seq: u64,
    /// `None` once the engine has been shut down; open feeds then drain and
    /// end cleanly.
    updates: Option<broadcast::Sender<DbUpdate>>,
}

/// Thread-safe in-memory backend driver.
///
/// `MemoryDriver` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of
/// the same instance share the same database set and updates channel.
///
/// Beyond the base driver operations it advertises the cluster-status,
/// membership and database-updates capabilities, answering as a standalone
/// single node. Replication is not supported.
///
/// # Example
///
/// ```ignore
/// use couchlayer_core::client::Client;
/// use couchlayer_memory::MemoryDriver;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> couchlayer_core::error::Result<()> {
/// let client = Client::new(MemoryDriver::new());
/// let updates = client.db_updates(&CancellationToken::new()).await?;
/// client.create_db("inventory").await?;
/// assert!(updates.next().await);
/// assert_eq!(updates.update_type().await, "created");
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDriver {
    state: Arc<RwLock<EngineState>>,
}

impl MemoryDriver {
    /// Creates a new empty engine with default settings.
    pub fn new() -> Self {
        Self::with_updates_capacity(DEFAULT_UPDATES_CAPACITY)
    }

    fn with_updates_capacity(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            state: Arc::new(RwLock::new(EngineState {
                dbs: BTreeSet::new(),
                seq: 0,
                updates: Some(updates),
            })),
        }
    }

    /// Creates a builder for constructing a `MemoryDriver` with custom
    /// options.
    pub fn builder() -> MemoryDriverBuilder {
        MemoryDriverBuilder::default()
    }

    /// Shuts the engine down.
    ///
    /// The database set stays readable, but the updates channel is torn
    /// down: open feeds drain any buffered events and then end cleanly, and
    /// new feeds can no longer be opened.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        state.updates = None;
        tracing::debug!("memory engine shut down");
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a database name against the CouchDB naming rules: a lowercase
/// letter followed by lowercase letters, digits, or `_ $ ( ) + - /`.
fn valid_db_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c))
}

fn emit(state: &mut EngineState, db_name: &str, kind: &str) {
    state.seq += 1;
    if let Some(updates) = &state.updates {
        // A send error only means no feed is currently listening.
        let _ = updates.send(DbUpdate {
            db_name: db_name.to_string(),
            kind: kind.to_string(),
            seq: state.seq.to_string(),
        });
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn version(&self) -> Result<ServerVersion> {
        Ok(ServerVersion {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vendor: "couchlayer-memory".to_string(),
        })
    }

    async fn all_dbs(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.dbs.iter().cloned().collect())
    }

    async fn db_exists(&self, name: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.dbs.contains(name))
    }

    async fn create_db(&self, name: &str) -> Result<()> {
        if !valid_db_name(name) {
            return Err(Error::driver_status(
                400,
                format!("illegal database name \"{name}\""),
            ));
        }
        let mut state = self.state.write().await;
        if !state.dbs.insert(name.to_string()) {
            return Err(Error::driver_status(
                412,
                format!("database \"{name}\" already exists"),
            ));
        }
        tracing::debug!(db = name, "database created");
        emit(&mut state, name, "created");
        Ok(())
    }

    async fn destroy_db(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.dbs.remove(name) {
            return Err(Error::driver_status(
                404,
                format!("database \"{name}\" not found"),
            ));
        }
        tracing::debug!(db = name, "database destroyed");
        emit(&mut state, name, "deleted");
        Ok(())
    }

    fn cluster(&self) -> Option<&dyn ClusterOps> {
        Some(self)
    }

    fn membership(&self) -> Option<&dyn Membership> {
        Some(self)
    }

    fn db_updater(&self) -> Option<&dyn DbUpdater> {
        Some(self)
    }
}

#[async_trait]
impl ClusterOps for MemoryDriver {
    async fn cluster_status(&self, _options: &Options) -> Result<String> {
        Ok("single_node_enabled".to_string())
    }

    async fn cluster_setup(&self, action: Value) -> Result<()> {
        match action.get("action").and_then(Value::as_str) {
            Some("enable_single_node") | Some("finish_cluster") => Ok(()),
            Some(other) => Err(Error::driver_status(
                400,
                format!("unsupported cluster setup action \"{other}\""),
            )),
            None => Err(Error::driver_status(400, "missing cluster setup action")),
        }
    }
}

#[async_trait]
impl Membership for MemoryDriver {
    async fn membership(&self) -> Result<ClusterMembership> {
        Ok(ClusterMembership {
            all_nodes: vec![LOCAL_NODE.to_string()],
            cluster_nodes: vec![LOCAL_NODE.to_string()],
        })
    }
}

#[async_trait]
impl DbUpdater for MemoryDriver {
    async fn db_updates(&self) -> Result<Box<dyn DbUpdatesFeed>> {
        let state = self.state.read().await;
        let Some(updates) = &state.updates else {
            return Err(Error::driver("store is shut down"));
        };
        Ok(Box::new(MemoryUpdatesFeed { rx: updates.subscribe() }))
    }
}

/// A feed over the engine's broadcast channel.
///
/// Receives every event emitted after the feed was opened. Channel teardown
/// (engine shutdown) is reported as clean end-of-stream; falling behind the
/// channel capacity is a feed error.
struct MemoryUpdatesFeed {
    rx: broadcast::Receiver<DbUpdate>,
}

#[async_trait]
impl DbUpdatesFeed for MemoryUpdatesFeed {
    async fn next(&mut self, update: &mut DbUpdate) -> Result<()> {
        match self.rx.recv().await {
            Ok(event) => {
                *update = event;
                Ok(())
            }
            Err(broadcast::error::RecvError::Closed) => Err(Error::EndOfStream),
            Err(broadcast::error::RecvError::Lagged(skipped)) => Err(Error::driver(format!(
                "updates feed lagged by {skipped} events"
            ))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Builder for constructing [`MemoryDriver`] instances.
///
/// # Example
///
/// ```ignore
/// use couchlayer_core::driver::DriverBuilder;
/// use couchlayer_memory::MemoryDriver;
///
/// # async fn example() -> couchlayer_core::error::Result<()> {
/// let driver = MemoryDriver::builder()
///     .updates_capacity(64)
///     .build()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Default)]
pub struct MemoryDriverBuilder {
    updates_capacity: Option<usize>,
}

impl MemoryDriverBuilder {
    /// Sets the capacity of the updates broadcast channel.
    pub fn updates_capacity(mut self, capacity: usize) -> Self {
        self.updates_capacity = Some(capacity);
        self
    }
}

#[async_trait]
impl DriverBuilder for MemoryDriverBuilder {
    type Driver = MemoryDriver;

    /// Builds and returns a new [`MemoryDriver`] instance.
    async fn build(self) -> Result<Self::Driver> {
        Ok(MemoryDriver::with_updates_capacity(
            self.updates_capacity.unwrap_or(DEFAULT_UPDATES_CAPACITY),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use couchlayer_core::client::Client;
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[tokio::test]
    async fn create_destroy_and_list_databases() {
        let client = Client::new(MemoryDriver::new());

        client.create_db("widgets").await.unwrap();
        client.create_db("accounts").await.unwrap();
        assert_eq!(
            client.all_dbs().await.unwrap(),
            vec!["accounts".to_string(), "widgets".to_string()]
        );
        assert!(client.db_exists("widgets").await.unwrap());

        client.destroy_db("widgets").await.unwrap();
        assert!(!client.db_exists("widgets").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_create_reports_precondition_failed() {
        let client = Client::new(MemoryDriver::new());
        client.create_db("widgets").await.unwrap();
        let err = client.create_db("widgets").await.unwrap_err();
        assert_eq!(err.status(), 412);
    }

    #[tokio::test]
    async fn destroying_a_missing_database_reports_not_found() {
        let client = Client::new(MemoryDriver::new());
        let err = client.destroy_db("nothing").await.unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn illegal_database_names_are_rejected() {
        let client = Client::new(MemoryDriver::new());
        for name in ["", "_users-from-outside", "Widgets", "9lives"] {
            let err = client.create_db(name).await.unwrap_err();
            assert_eq!(err.status(), 400, "name {name:?} should be rejected");
        }
        client.create_db("a-z0/9_$()+").await.unwrap();
    }

    #[tokio::test]
    async fn updates_feed_observes_lifecycle_events_in_order() {
        let client = Client::new(MemoryDriver::new());
        let scope = CancellationToken::new();
        let updates = client.db_updates(&scope).await.unwrap();

        client.create_db("foo").await.unwrap();
        client.destroy_db("foo").await.unwrap();

        assert!(updates.next().await);
        assert_eq!(updates.db_name().await, "foo");
        assert_eq!(updates.update_type().await, "created");
        assert_eq!(updates.seq().await, "1");

        assert!(updates.next().await);
        assert_eq!(updates.update_type().await, "deleted");
        assert_eq!(updates.seq().await, "2");

        updates.close().await.unwrap();
        assert_eq!(updates.err().await, None);
    }

    #[tokio::test]
    async fn cancelling_the_scope_terminates_the_feed() {
        let client = Client::new(MemoryDriver::new());
        let scope = CancellationToken::new();
        let updates = client.db_updates(&scope).await.unwrap();

        client.create_db("foo").await.unwrap();
        assert!(updates.next().await);

        scope.cancel();
        // Give the watcher a chance to run before observing the close.
        for _ in 0..100 {
            if updates.err().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(!updates.next().await);
        assert_eq!(updates.err().await, Some(Error::Cancelled));
    }

    #[tokio::test]
    async fn shutdown_drains_feeds_to_a_clean_end() {
        let driver = MemoryDriver::new();
        let client = Client::new(driver.clone());
        let scope = CancellationToken::new();
        let updates = client.db_updates(&scope).await.unwrap();

        client.create_db("foo").await.unwrap();
        driver.shutdown().await;

        // Buffered events still arrive, then the feed ends without error.
        assert!(updates.next().await);
        assert_eq!(updates.db_name().await, "foo");
        assert!(!updates.next().await);
        assert_eq!(updates.err().await, None);

        let err = client.db_updates(&scope).await.unwrap_err();
        assert_eq!(err.to_string(), "store is shut down");
    }

    #[tokio::test]
    async fn lagging_feeds_fail_with_a_driver_error() {
        let driver = MemoryDriver::builder()
            .updates_capacity(1)
            .build()
            .await
            .unwrap();
        let client = Client::new(driver);
        let scope = CancellationToken::new();
        let updates = client.db_updates(&scope).await.unwrap();

        client.create_db("one").await.unwrap();
        client.create_db("two").await.unwrap();
        client.create_db("three").await.unwrap();

        assert!(!updates.next().await);
        let err = updates.err().await.unwrap();
        assert!(err.to_string().contains("lagged"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn answers_as_a_standalone_single_node() {
        let client = Client::new(MemoryDriver::new());

        let membership = client.membership().await.unwrap();
        assert_eq!(membership.all_nodes, vec![LOCAL_NODE.to_string()]);
        assert_eq!(membership.cluster_nodes, vec![LOCAL_NODE.to_string()]);

        let status = client.cluster_status(&Options::new()).await.unwrap();
        assert_eq!(status, "single_node_enabled");

        client
            .cluster_setup(serde_json::json!({"action": "enable_single_node"}))
            .await
            .unwrap();
        let err = client
            .cluster_setup(serde_json::json!({"action": "relocate_shards"}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[tokio::test]
    async fn replication_is_not_supported() {
        let client = Client::new(MemoryDriver::new());
        let err = client
            .replicate("target", "source", &Options::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "driver does not support replication");
        assert_eq!(err.status(), 501);
    }

    #[tokio::test]
    async fn reports_its_version() {
        let client = Client::new(MemoryDriver::new());
        let version = client.version().await.unwrap();
        assert_eq!(version.vendor, "couchlayer-memory");
        assert!(!version.version.is_empty());
    }
}
