//! Replication triggering on the client facade.
//!
//! A thin pass-through to the [`Replicator`](crate::driver::Replicator)
//! capability. Orchestrating and monitoring replications is the backend's
//! business; the client only forwards the request and mirrors the resulting
//! record.

use chrono::{DateTime, Utc};

use crate::client::{Client, Options};
use crate::driver;
use crate::error::{Error, Result};

/// A triggered replication, mirroring the driver record exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
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

impl From<driver::Replication> for Replication {
    fn from(replication: driver::Replication) -> Self {
        Self {
            replication_id: replication.replication_id,
            source: replication.source,
            target: replication.target,
            start_time: replication.start_time,
        }
    }
}

impl Client {
    /// Starts replicating `source` into `target`.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-capability error (status 501) if the driver
    /// does not support replication, or the driver's own error otherwise.
    pub async fn replicate(
        &self,
        target: &str,
        source: &str,
        options: &Options,
    ) -> Result<Replication> {
        let Some(replicator) = self.driver().replicator() else {
            return Err(Error::unsupported("driver does not support replication"));
        };
        tracing::debug!(source, target, "triggering replication");
        replicator
            .replicate(target, source, options)
            .await
            .map(Into::into)
    }
}
