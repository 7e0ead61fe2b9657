//! Cluster add-on configuration
//!
//! Add-ons travel in two shapes: the typed [`AddonConfig`] sent to the API,
//! and a list of loosely-typed records kept in resource state:
//!
//! ```text
//! [{ "name": "kured", "enabled": true, "custom_values": { "timeZone": "UTC" } }]
//! ```
//!
//! [`expand`] is the only place that inspects those records.

use acloud_api::Addon;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub type AddonConfig = HashMap<String, Addon>;

/// Baseline add-on set applied to every cluster
pub fn default_addons() -> AddonConfig {
    let disabled = [
        "fluxOperator",
        "sealedSecrets",
        "amePool",
        "certManager",
        "cloudNativePG",
        "logging",
        "nfs",
        "monitoring",
        "gpu",
    ];

    let mut addons: AddonConfig = disabled
        .into_iter()
        .map(|name| (name.to_string(), Addon::new(false)))
        .collect();

    addons.insert(
        "ingressController".to_string(),
        Addon::new(false).with_value("type", "ingress-nginx"),
    );
    addons.insert("defaultNetworkPolicies".to_string(), Addon::new(true));
    addons.insert(
        "kured".to_string(),
        Addon::new(true)
            .with_value("endTime", "06:00")
            .with_value("timeZone", "UTC")
            .with_value("startTime", "0:00")
            .with_value("rebootDays", "sun,mon,tue,wed,thu,fri,sat")
            .with_value("forceReboot", "false"),
    );

    addons
}

/// Overlay `overrides` onto `base`, replacing whole entries per key
pub fn merge(base: &AddonConfig, overrides: &AddonConfig) -> Option<AddonConfig> {
    if base.is_empty() && overrides.is_empty() {
        return None;
    }

    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    Some(merged)
}

/// Decode add-on records from resource state
///
/// Records without a non-empty `name` are skipped.
pub fn expand(raw: &[Value]) -> Option<AddonConfig> {
    let addons: AddonConfig = raw.iter().filter_map(decode_record).collect();

    if addons.is_empty() {
        return None;
    }
    Some(addons)
}

fn decode_record(value: &Value) -> Option<(String, Addon)> {
    let record = value.as_object()?;

    let name = record.get("name").and_then(Value::as_str)?;
    if name.is_empty() {
        return None;
    }

    let enabled = record
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let custom_values = record
        .get("custom_values")
        .and_then(Value::as_object)
        .map(stringify_values)
        .unwrap_or_default();

    Some((
        name.to_string(),
        Addon {
            enabled,
            custom_values,
        },
    ))
}

/// Convert every non-null value to its textual form
fn stringify_values(values: &Map<String, Value>) -> HashMap<String, String> {
    values
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Encode add-ons as resource state records
pub fn flatten(config: &AddonConfig) -> Option<Vec<Value>> {
    if config.is_empty() {
        return None;
    }

    let records = config
        .iter()
        .map(|(name, addon)| {
            let mut record = Map::new();
            record.insert("name".to_string(), json!(name));
            record.insert("enabled".to_string(), json!(addon.enabled));
            if !addon.custom_values.is_empty() {
                record.insert("custom_values".to_string(), json!(addon.custom_values));
            }
            Value::Object(record)
        })
        .collect();

    Some(records)
}
