//! Attribute resolution across current and deprecated attribute names

use crate::error::{ProviderError, Result};
use crate::resource::ResourceData;

pub const ORGANISATION_ATTRIBUTES: [&str; 2] = ["organisation", "organisation_slug"];
pub const ENVIRONMENT_ATTRIBUTES: [&str; 2] = ["environment", "environment_slug"];

/// Resolve a string attribute by scanning `names` in order
///
/// Every non-empty value overwrites the previous match, so the last
/// non-empty name in the list wins.
pub fn resolve_with_aliases(data: &ResourceData, names: &[&str]) -> String {
    let mut resolved = "";
    for name in names {
        let value = data.get_str(name);
        if !value.is_empty() {
            resolved = value;
        }
    }
    resolved.to_string()
}

/// Resolve the organisation slug, falling back to the provider default
pub fn resolve_organisation(data: &ResourceData, provider_default: Option<&str>) -> Result<String> {
    let organisation = resolve_with_aliases(data, &ORGANISATION_ATTRIBUTES);
    if !organisation.is_empty() {
        return Ok(organisation);
    }

    match provider_default {
        Some(default) if !default.is_empty() => Ok(default.to_string()),
        _ => Err(ProviderError::Configuration(
            "organisation is not set".to_string(),
        )),
    }
}

pub fn resolve_environment(data: &ResourceData) -> Result<String> {
    let environment = resolve_with_aliases(data, &ENVIRONMENT_ATTRIBUTES);
    if environment.is_empty() {
        return Err(ProviderError::Configuration(
            "environment is not set".to_string(),
        ));
    }
    Ok(environment)
}
