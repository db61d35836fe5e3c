//! The client facade: the entry point for applications.
//!
//! A [`Client`] holds a reference to one backend driver and forwards
//! operations to it. Base operations forward unconditionally; capability
//! operations (cluster, membership, updates feed, replication, in the
//! sibling modules) first probe the driver and return a stable
//! `501 Not Implemented` error when the capability is absent.
//!
//! # Example
//!
//! ```ignore
//! use couchlayer_core::client::Client;
//!
//! let client = Client::new(my_driver);
//! client.create_db("inventory").await?;
//! let dbs = client.all_dbs().await?;
//! # Ok::<(), couchlayer_core::error::Error>(())
//! ```

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::driver::{Driver, ServerVersion};
use crate::error::Result;

/// Optional parameters passed through to driver operations.
///
/// Options are an open set of JSON values keyed by name, mirroring the query
/// parameters of the HTTP interface. Drivers ignore keys they do not
/// understand.
///
/// # Example
///
/// ```ignore
/// use couchlayer_core::client::Options;
///
/// let options = Options::new().param("ensure_dbs_exist", ["_users", "_replicator"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, returning the updated option set.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up a parameter by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reports whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A client for one CouchDB-family backend.
///
/// Cloning a `Client` is cheap; clones share the same driver.
#[derive(Debug, Clone)]
pub struct Client {
    driver: Arc<dyn Driver>,
}

impl Client {
    /// Creates a client over the given backend driver.
    pub fn new(driver: impl Driver) -> Self {
        Self { driver: Arc::new(driver) }
    }

    /// Returns the driver this client forwards to.
    pub(crate) fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    /// Reports the server version and vendor.
    pub async fn version(&self) -> Result<ServerVersion> {
        self.driver.version().await
    }

    /// Lists the names of all databases on the backend.
    pub async fn all_dbs(&self) -> Result<Vec<String>> {
        self.driver.all_dbs().await
    }

    /// Reports whether a database with the given name exists.
    pub async fn db_exists(&self, name: &str) -> Result<bool> {
        self.driver.db_exists(name).await
    }

    /// Creates a new database with the given name.
    pub async fn create_db(&self, name: &str) -> Result<()> {
        tracing::debug!(db = name, "creating database");
        self.driver.create_db(name).await
    }

    /// Permanently deletes a database and all its documents.
    pub async fn destroy_db(&self, name: &str) -> Result<()> {
        tracing::debug!(db = name, "destroying database");
        self.driver.destroy_db(name).await
    }
}
