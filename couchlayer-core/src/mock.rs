//! Test fakes for the driver contract.
//!
//! [`MockDriver`] starts with no capabilities; tests attach the ones they
//! need with the `with_*` builders. Capability behavior is scripted through
//! closure fields, one per operation, so each test states exactly what its
//! driver does.

use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::Options;
use crate::driver::{
    ClusterMembership, ClusterOps, DbUpdate, DbUpdater, DbUpdatesFeed, Driver, Membership,
    Replication, Replicator, ServerVersion,
};
use crate::error::{Error, Result};

type ClusterStatusFn = Box<dyn Fn(&Options) -> Result<String> + Send + Sync>;
type ClusterSetupFn = Box<dyn Fn(Value) -> Result<()> + Send + Sync>;
type MembershipFn = Box<dyn Fn() -> Result<ClusterMembership> + Send + Sync>;
type UpdatesFn = Box<dyn Fn() -> Result<Box<dyn DbUpdatesFeed>> + Send + Sync>;
type ReplicateFn = Box<dyn Fn(&str, &str) -> Result<Replication> + Send + Sync>;

/// A driver with a configurable capability set and a fixed database list.
#[derive(Default)]
pub(crate) struct MockDriver {
    dbs: Vec<String>,
    cluster: Option<MockCluster>,
    membership: Option<MockMembership>,
    updater: Option<MockUpdater>,
    replicator: Option<MockReplicator>,
}

impl MockDriver {
    pub(crate) fn with_dbs<S: Into<String>>(
        mut self,
        dbs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.dbs = dbs.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn with_cluster(mut self, cluster: MockCluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    pub(crate) fn with_membership(mut self, membership: MockMembership) -> Self {
        self.membership = Some(membership);
        self
    }

    pub(crate) fn with_updater(mut self, updater: MockUpdater) -> Self {
        self.updater = Some(updater);
        self
    }

    pub(crate) fn with_replicator(mut self, replicator: MockReplicator) -> Self {
        self.replicator = Some(replicator);
        self
    }
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("dbs", &self.dbs)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn version(&self) -> Result<ServerVersion> {
        Ok(ServerVersion {
            version: "0.0.0".into(),
            vendor: "mock".into(),
        })
    }

    async fn all_dbs(&self) -> Result<Vec<String>> {
        Ok(self.dbs.clone())
    }

    async fn db_exists(&self, name: &str) -> Result<bool> {
        Ok(self.dbs.iter().any(|db| db == name))
    }

    async fn create_db(&self, name: &str) -> Result<()> {
        Err(Error::driver(format!("mock cannot create {name}")))
    }

    async fn destroy_db(&self, name: &str) -> Result<()> {
        Err(Error::driver(format!("mock cannot destroy {name}")))
    }

    fn cluster(&self) -> Option<&dyn ClusterOps> {
        self.cluster.as_ref().map(|c| c as &dyn ClusterOps)
    }

    fn membership(&self) -> Option<&dyn Membership> {
        self.membership.as_ref().map(|m| m as &dyn Membership)
    }

    fn db_updater(&self) -> Option<&dyn DbUpdater> {
        self.updater.as_ref().map(|u| u as &dyn DbUpdater)
    }

    fn replicator(&self) -> Option<&dyn Replicator> {
        self.replicator.as_ref().map(|r| r as &dyn Replicator)
    }
}

pub(crate) struct MockCluster {
    pub(crate) status_fn: Option<ClusterStatusFn>,
    pub(crate) setup_fn: Option<ClusterSetupFn>,
}

#[async_trait]
impl ClusterOps for MockCluster {
    async fn cluster_status(&self, options: &Options) -> Result<String> {
        (self.status_fn.as_ref().expect("cluster_status not scripted"))(options)
    }

    async fn cluster_setup(&self, action: Value) -> Result<()> {
        (self.setup_fn.as_ref().expect("cluster_setup not scripted"))(action)
    }
}

pub(crate) struct MockMembership {
    pub(crate) membership_fn: Option<MembershipFn>,
}

#[async_trait]
impl Membership for MockMembership {
    async fn membership(&self) -> Result<ClusterMembership> {
        (self.membership_fn.as_ref().expect("membership not scripted"))()
    }
}

pub(crate) struct MockUpdater {
    pub(crate) updates_fn: Option<UpdatesFn>,
}

#[async_trait]
impl DbUpdater for MockUpdater {
    async fn db_updates(&self) -> Result<Box<dyn DbUpdatesFeed>> {
        (self.updates_fn.as_ref().expect("db_updates not scripted"))()
    }
}

pub(crate) struct MockReplicator {
    pub(crate) replicate_fn: Option<ReplicateFn>,
}

#[async_trait]
impl Replicator for MockReplicator {
    async fn replicate(
        &self,
        target: &str,
        source: &str,
        _options: &Options,
    ) -> Result<Replication> {
        (self.replicate_fn.as_ref().expect("replicate not scripted"))(target, source)
    }
}

/// A driver-level updates feed that replays a fixed script, then ends.
pub(crate) struct ScriptedUpdatesFeed {
    steps: VecDeque<Result<DbUpdate>>,
    close_result: Result<()>,
}

impl ScriptedUpdatesFeed {
    pub(crate) fn boxed(steps: Vec<Result<DbUpdate>>) -> Box<dyn DbUpdatesFeed> {
        Box::new(Self { steps: steps.into(), close_result: Ok(()) })
    }

    pub(crate) fn failing_close(
        steps: Vec<Result<DbUpdate>>,
        close_error: Error,
    ) -> Box<dyn DbUpdatesFeed> {
        Box::new(Self { steps: steps.into(), close_result: Err(close_error) })
    }
}

#[async_trait]
impl DbUpdatesFeed for ScriptedUpdatesFeed {
    async fn next(&mut self, update: &mut DbUpdate) -> Result<()> {
        match self.steps.pop_front() {
            Some(Ok(next)) => {
                *update = next;
                Ok(())
            }
            Some(Err(err)) => Err(err),
            None => Err(Error::EndOfStream),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.close_result.clone()
    }
}
