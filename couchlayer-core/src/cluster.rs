//! Cluster operations on the client facade.
//!
//! Thin pass-throughs to the [`ClusterOps`](crate::driver::ClusterOps) and
//! [`Membership`](crate::driver::Membership) capabilities. A backend that
//! does not advertise the capability yields a stable
//! `501 Not Implemented` error instead.

use serde_json::Value;

use crate::client::{Client, Options};
use crate::driver;
use crate::error::{Error, Result};

/// Node lists of a clustered backend, mirroring the driver record exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMembership {
    /// All nodes known to the queried node, clustered or not.
    pub all_nodes: Vec<String>,
    /// The nodes participating in the cluster.
    pub cluster_nodes: Vec<String>,
}

impl From<driver::ClusterMembership> for ClusterMembership {
    fn from(membership: driver::ClusterMembership) -> Self {
        Self {
            all_nodes: membership.all_nodes,
            cluster_nodes: membership.cluster_nodes,
        }
    }
}

impl Client {
    /// Reports the cluster state, e.g. `"cluster_finished"`.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-capability error (status 501) if the driver
    /// lacks cluster operations, or the driver's own error otherwise.
    pub async fn cluster_status(&self, options: &Options) -> Result<String> {
        let Some(cluster) = self.driver().cluster() else {
            return Err(Error::unsupported("driver does not support cluster operations"));
        };
        cluster.cluster_status(options).await
    }

    /// Executes a cluster setup action, such as `"enable_single_node"`.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-capability error (status 501) if the driver
    /// lacks cluster operations, or the driver's own error otherwise.
    pub async fn cluster_setup(&self, action: Value) -> Result<()> {
        let Some(cluster) = self.driver().cluster() else {
            return Err(Error::unsupported("driver does not support cluster operations"));
        };
        cluster.cluster_setup(action).await
    }

    /// Queries the `/_membership` endpoint of the backend.
    ///
    /// # Errors
    ///
    /// Returns an unsupported-capability error (status 501) if the driver
    /// does not expose membership, or the driver's own error otherwise.
    pub async fn membership(&self) -> Result<ClusterMembership> {
        let Some(membership) = self.driver().membership() else {
            return Err(Error::unsupported(
                "driver does not support the /_membership endpoint",
            ));
        };
        membership.membership().await.map(Into::into)
    }
}
