//! Cluster API trait definition

use crate::error::Result;
use crate::types::{Cluster, CreateCluster, UpdateCluster};
use async_trait::async_trait;

/// Cluster management operations of the remote API
///
/// Every call is scoped by organisation slug and environment slug. The
/// backend executes mutations asynchronously: a returned cluster reflects the
/// state at acceptance time, usually a transient status.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create a cluster in the given environment
    async fn create_cluster(
        &self,
        organisation: &str,
        environment: &str,
        request: &CreateCluster,
    ) -> Result<Cluster>;

    /// Fetch a cluster by slug; `Ok(None)` means it does not exist
    async fn get_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
    ) -> Result<Option<Cluster>>;

    /// Apply a partial update; `Ok(None)` when the API answers without a body
    async fn update_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> Result<Option<Cluster>>;

    /// Request deletion of a cluster
    async fn delete_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> Result<()>;
}
