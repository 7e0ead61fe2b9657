//! Resource data bag
//!
//! Holds the attribute values of a single managed resource as exchanged with
//! the hosting runtime: configuration going in, computed state coming out.

use crate::config::ConfiguredProvider;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Lifecycle handlers of one managed resource type
///
/// Each call owns `data` for its duration. `cancel` aborts any wait for
/// remote convergence.
#[async_trait]
pub trait ManagedResource: Send + Sync {
    /// Resource type name (e.g. "acloud_cluster")
    fn type_name(&self) -> &str;

    async fn create(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn read(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn update(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn delete(
        &self,
        provider: &ConfiguredProvider,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Attributes of one resource instance, keyed by schema attribute name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Identity tracked by the runtime; empty when the resource is untracked
    #[serde(default)]
    id: String,

    #[serde(default)]
    attributes: HashMap<String, serde_json::Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of attributes
    pub fn from_attributes(attributes: serde_json::Value) -> Self {
        let attributes = match attributes {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self {
            id: String::new(),
            attributes,
        }
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Stop tracking the resource
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_tracked(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.attributes.remove(key)
    }

    /// String attribute; absent and non-string values read as empty
    pub fn get_str(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.attributes
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.attributes
            .get(key)
            .and_then(|v| v.as_u64())
            .unwrap_or(default)
    }

    /// List attribute; absent and non-list values read as empty
    pub fn get_list(&self, key: &str) -> &[serde_json::Value] {
        self.attributes
            .get(key)
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
