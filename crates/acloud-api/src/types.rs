//! Request and response payloads for the cluster API

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Decode `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Managed Kubernetes cluster as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    /// Opaque identity, stable for the lifetime of the cluster
    #[serde(deserialize_with = "null_as_default")]
    pub identity: String,

    /// Human key, unique within organisation and environment
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Lifecycle status (e.g. "running", "stopping")
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(deserialize_with = "null_as_default")]
    pub organisation_slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub environment_slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cloud_provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub update_channel: String,

    #[serde(deserialize_with = "null_as_default")]
    pub enable_multi_availability_zones: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub highly_available: bool,
    #[serde(rename = "enableNATGateway", deserialize_with = "null_as_default")]
    pub enable_nat_gateway: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_network_encryption: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub addons: HashMap<String, Addon>,
}

/// Cluster add-on toggle with free-form string settings
///
/// An empty `custom_values` map is never put on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub custom_values: HashMap<String, String>,
}

impl Addon {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            custom_values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_values.insert(key.into(), value.into());
        self
    }
}

/// Node pool definition sent along with a new cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub name: String,
    pub node_size: String,
    pub min_size: u32,
    pub max_size: u32,
}

/// Payload for creating a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCluster {
    pub name: String,
    pub version: String,
    pub region: String,
    pub cloud_account_identity: String,
    pub enable_multi_availability_zones: bool,
    pub enable_high_availability: bool,
    #[serde(rename = "enableNATGateway")]
    pub enable_nat_gateway: bool,
    pub enable_network_encryption: bool,
    pub sla: String,
    pub node_pools: Vec<NodePool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<HashMap<String, Addon>>,
}

/// Payload for updating (or deleting) a cluster
///
/// Every field is optional; absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_network_encryption: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_high_availability: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<HashMap<String, Addon>>,
}

impl UpdateCluster {
    /// Payload that only requests a status transition
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }
}
