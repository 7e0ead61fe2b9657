//! Cluster resource lifecycle
//!
//! Every mutation is a single API call. The backend applies it
//! asynchronously, so create and update then wait until the cluster reports
//! the desired steady status. Delete does not wait.

use crate::addons::{self, AddonConfig};
use crate::attributes::{resolve_environment, resolve_organisation};
use crate::config::ConfiguredProvider;
use crate::error::{ProviderError, Result};
use crate::poller::{PollDeadline, Probe};
use crate::resource::{ManagedResource, ResourceData};
use crate::transition::{ClusterLifecycle, ClusterStatus};
use acloud_api::{ApiError, Cluster, CreateCluster, UpdateCluster};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_WAIT_SECONDS: u64 = 600;

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const SLUG: &str = "slug";
pub const CLOUD_PROVIDER: &str = "cloud_provider";
pub const REGION: &str = "region";
pub const VERSION: &str = "version";
pub const CLOUD_ACCOUNT_IDENTITY: &str = "cloud_account_identity";
pub const UPDATE_CHANNEL: &str = "update_channel";
pub const MULTI_AZ: &str = "enable_multi_availability_zones";
pub const HA_CONTROL_PLANE: &str = "enable_high_available_control_plane";
pub const PRIVATE_CLUSTER: &str = "enable_private_cluster";
pub const NETWORK_ENCRYPTION: &str = "enable_network_encryption";
pub const STATUS: &str = "status";
pub const STOPPED: &str = "stopped";
pub const WAIT_SECONDS: &str = "cluster_state_wait_seconds";
pub const ADDONS: &str = "addons";

/// The `acloud_cluster` resource
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterResource;

/// Organisation, environment and slug of one cluster
struct Scope {
    organisation: String,
    environment: String,
    slug: String,
}

impl Scope {
    fn resolve(provider: &ConfiguredProvider, data: &ResourceData) -> Result<Self> {
        Ok(Self {
            organisation: resolve_organisation(data, provider.organisation())?,
            environment: resolve_environment(data)?,
            slug: data.get_str(SLUG).to_string(),
        })
    }

    fn operation_error(&self, operation: &'static str) -> impl FnOnce(ApiError) -> ProviderError {
        let organisation = self.organisation.clone();
        let environment = self.environment.clone();
        let slug = self.slug.clone();
        move |source| ProviderError::Operation {
            operation,
            organisation,
            environment,
            slug,
            source,
        }
    }
}

impl ClusterResource {
    pub fn new() -> Self {
        Self
    }

    /// Lifecycle state recorded in `data`
    pub fn lifecycle(data: &ResourceData) -> ClusterLifecycle {
        if !data.is_tracked() {
            return ClusterLifecycle::Absent;
        }
        ClusterLifecycle::observe(&ClusterStatus::from(data.get_str(STATUS)))
    }

    /// Defaults overlaid with the configured add-ons
    fn configured_addons(data: &ResourceData) -> Option<AddonConfig> {
        let overrides = addons::expand(data.get_list(ADDONS)).unwrap_or_default();
        addons::merge(&addons::default_addons(), &overrides)
    }

    fn create_request(data: &ResourceData) -> CreateCluster {
        CreateCluster {
            name: data.get_str(NAME).to_string(),
            version: data.get_str(VERSION).to_string(),
            region: data.get_str(REGION).to_string(),
            cloud_account_identity: data.get_str(CLOUD_ACCOUNT_IDENTITY).to_string(),
            enable_multi_availability_zones: data.get_bool(MULTI_AZ, true),
            enable_high_availability: data.get_bool(HA_CONTROL_PLANE, false),
            enable_nat_gateway: data.get_bool(PRIVATE_CLUSTER, false),
            enable_network_encryption: data.get_bool(NETWORK_ENCRYPTION, true),
            sla: "none".to_string(),
            node_pools: Vec::new(),
            addons: Self::configured_addons(data),
        }
    }

    fn update_request(data: &ResourceData) -> UpdateCluster {
        let non_empty = |key: &str| Some(data.get_str(key).to_string()).filter(|v| !v.is_empty());

        UpdateCluster {
            status: None,
            version: non_empty(VERSION),
            update_channel: non_empty(UPDATE_CHANNEL),
            enable_network_encryption: Some(data.get_bool(NETWORK_ENCRYPTION, true)),
            enable_high_availability: Some(data.get_bool(HA_CONTROL_PLANE, false)),
            addons: Self::configured_addons(data),
        }
    }

    /// Copy the remote cluster into `data`
    fn apply(data: &mut ResourceData, cluster: &Cluster) {
        data.set_id(&cluster.identity);
        data.set(NAME, cluster.name.as_str());
        data.set(DESCRIPTION, cluster.description.as_str());
        data.set(SLUG, cluster.slug.as_str());
        data.set(CLOUD_PROVIDER, cluster.cloud_provider.as_str());
        data.set(REGION, cluster.region.as_str());
        data.set(VERSION, cluster.version.as_str());
        data.set(UPDATE_CHANNEL, cluster.update_channel.as_str());
        data.set(MULTI_AZ, cluster.enable_multi_availability_zones);
        data.set(HA_CONTROL_PLANE, cluster.highly_available);
        data.set(PRIVATE_CLUSTER, cluster.enable_nat_gateway);
        data.set(NETWORK_ENCRYPTION, cluster.enable_network_encryption);
        data.set(STATUS, cluster.status.as_str());

        match addons::flatten(&cluster.addons) {
            Some(records) => data.set(ADDONS, Value::Array(records)),
            None => {
                data.remove(ADDONS);
            }
        }
    }

    fn wait_timeout(data: &ResourceData) -> Duration {
        Duration::from_secs(data.get_u64(WAIT_SECONDS, DEFAULT_WAIT_SECONDS))
    }

    /// Block until `cluster` reports `desired`
    ///
    /// Returns immediately when the cluster already has the desired status.
    pub async fn wait_for_status(
        provider: &ConfiguredProvider,
        organisation: &str,
        cluster: &Cluster,
        desired: &ClusterStatus,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if *desired == *cluster.status {
            return Ok(());
        }

        tracing::info!(
            cluster = %cluster.slug,
            from = %cluster.status,
            to = %desired,
            "Waiting up to {}s for cluster to converge",
            timeout.as_secs()
        );

        let client = provider.client();
        let environment = cluster.environment_slug.as_str();
        let slug = cluster.slug.as_str();

        provider
            .poller()
            .await_condition(PollDeadline::after(timeout), cancel, move || async move {
                let probe = match client.get_cluster(organisation, environment, slug).await? {
                    Some(current) if *desired == *current.status => Probe::Satisfied,
                    Some(current) => Probe::not_yet(current.status),
                    None => Probe::not_yet("not found"),
                };
                Ok::<_, ApiError>(probe)
            })
            .await
    }

    /// Read the cluster, forgetting it when it no longer exists remotely
    ///
    /// Returns `false` when the identity was cleared so the runtime plans a
    /// re-creation.
    pub async fn refresh(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        match self.read(provider, data, cancel).await {
            Ok(()) => Ok(true),
            Err(ProviderError::NotFound(what)) => {
                tracing::warn!("{} no longer exists, removing from state", what);
                data.clear_id();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ManagedResource for ClusterResource {
    fn type_name(&self) -> &str {
        "acloud_cluster"
    }

    async fn create(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut scope = Scope::resolve(provider, data)?;
        let request = Self::create_request(data);
        scope.slug = request.name.clone();

        tracing::info!(
            "Creating cluster {} in {}/{}",
            request.name,
            scope.organisation,
            scope.environment
        );

        let mut cluster = provider
            .client()
            .create_cluster(&scope.organisation, &scope.environment, &request)
            .await
            .map_err(scope.operation_error("create"))?;

        // Track the new cluster before waiting so a failed wait leaves no orphan
        data.set_id(&cluster.identity);
        data.set(SLUG, cluster.slug.as_str());
        data.set(CLOUD_PROVIDER, cluster.cloud_provider.as_str());
        data.set(STATUS, cluster.status.as_str());

        tracing::info!(
            cluster = %cluster.slug,
            identity = %cluster.identity,
            lifecycle = %Self::lifecycle(data),
            "Created cluster"
        );

        if cluster.environment_slug.is_empty() {
            cluster.environment_slug = scope.environment.clone();
        }

        let desired = ClusterStatus::Running;
        Self::wait_for_status(
            provider,
            &scope.organisation,
            &cluster,
            &desired,
            Self::wait_timeout(data),
            cancel,
        )
        .await
        .map_err(|e| {
            tracing::warn!(
                cluster = %cluster.slug,
                lifecycle = %ClusterLifecycle::Failed,
                "Cluster did not converge: {}",
                e
            );
            ProviderError::Convergence {
                slug: cluster.slug.clone(),
                source: Box::new(e),
            }
        })?;

        data.set(STATUS, desired.as_str());
        Ok(())
    }

    async fn read(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        let scope = Scope::resolve(provider, data)?;

        let cluster = provider
            .client()
            .get_cluster(&scope.organisation, &scope.environment, &scope.slug)
            .await
            .map_err(scope.operation_error("read"))?
            .ok_or_else(|| {
                ProviderError::NotFound(format!(
                    "cluster {} in org {} and env {}",
                    scope.slug, scope.organisation, scope.environment
                ))
            })?;

        Self::apply(data, &cluster);
        Ok(())
    }

    async fn update(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let scope = Scope::resolve(provider, data)?;

        // Built from configuration before the read overwrites it with remote values
        let mut request = Self::update_request(data);
        let desired = ClusterStatus::desired(data.get_bool(STOPPED, false));
        let timeout = Self::wait_timeout(data);

        self.read(provider, data, cancel).await?;

        let current = ClusterStatus::from(data.get_str(STATUS));
        if desired != current {
            let verb = desired.transition_verb();
            tracing::info!(
                cluster = %scope.slug,
                from = %current,
                to = %desired,
                "Requesting status {}",
                verb
            );
            request.status = Some(verb.into());
        }

        let updated = provider
            .client()
            .update_cluster(&scope.organisation, &scope.environment, &scope.slug, &request)
            .await
            .map_err(scope.operation_error("update"))?;

        if let Some(mut cluster) = updated {
            if cluster.environment_slug.is_empty() {
                cluster.environment_slug = scope.environment.clone();
            }
            if cluster.slug.is_empty() {
                cluster.slug = scope.slug.clone();
            }

            Self::wait_for_status(
                provider,
                &scope.organisation,
                &cluster,
                &desired,
                timeout,
                cancel,
            )
            .await
            .map_err(|e| ProviderError::Convergence {
                slug: scope.slug.clone(),
                source: Box::new(e),
            })?;
        }

        self.read(provider, data, cancel).await
    }

    async fn delete(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        let scope = Scope::resolve(provider, data)?;
        let request = UpdateCluster::with_status(ClusterStatus::Deleting);

        tracing::info!("Deleting cluster {}", scope.slug);

        provider
            .client()
            .delete_cluster(&scope.organisation, &scope.environment, &scope.slug, &request)
            .await
            .map_err(scope.operation_error("delete"))?;

        data.clear_id();
        tracing::info!(
            cluster = %scope.slug,
            lifecycle = %ClusterLifecycle::Deleted,
            "Deletion requested"
        );
        Ok(())
    }
}
