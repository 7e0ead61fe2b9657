//! Provider configuration and the configured provider handle

use crate::error::{ProviderError, Result};
use crate::poller::Poller;
use acloud_api::{AcloudClient, ClusterApi, DEFAULT_API_ENDPOINT};
use std::sync::Arc;

pub const TOKEN_ENV: &str = "ACLOUD_PERSONAL_ACCESS_TOKEN";
pub const API_ENDPOINT_ENV: &str = "ACLOUD_API_ENDPOINT";
pub const ORGANISATION_ENV: &str = "ACLOUD_ORGANISATION";

/// Provider-level settings
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub token: String,
    pub api_endpoint: String,
    pub organisation: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("token", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("organisation", &self.organisation)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            organisation: None,
        }
    }

    pub fn with_api_endpoint(mut self, api_endpoint: impl Into<String>) -> Self {
        self.api_endpoint = api_endpoint.into();
        self
    }

    pub fn with_organisation(mut self, organisation: impl Into<String>) -> Self {
        let organisation = organisation.into();
        self.organisation = (!organisation.is_empty()).then_some(organisation);
        self
    }

    /// Create ProviderConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Configuration(format!("{} is not set", TOKEN_ENV)))?;

        let mut config = Self::new(token);
        if let Some(endpoint) = std::env::var(API_ENDPOINT_ENV).ok().filter(|e| !e.is_empty()) {
            config = config.with_api_endpoint(endpoint);
        }
        if let Ok(organisation) = std::env::var(ORGANISATION_ENV) {
            config = config.with_organisation(organisation);
        }

        Ok(config)
    }
}

/// Handle passed to every resource operation
#[derive(Clone)]
pub struct ConfiguredProvider {
    client: Arc<dyn ClusterApi>,
    organisation: Option<String>,
    poller: Poller,
}

impl ConfiguredProvider {
    /// Build the HTTP client for `config`
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        let client = AcloudClient::new(&config.api_endpoint, &config.token)?;
        tracing::debug!("Configured provider for {}", client.base_url());

        Ok(Self {
            client: Arc::new(client),
            organisation: config.organisation.clone(),
            poller: Poller::default(),
        })
    }

    /// Wrap an existing client
    pub fn with_client(client: Arc<dyn ClusterApi>, organisation: Option<String>) -> Self {
        Self {
            client,
            organisation,
            poller: Poller::default(),
        }
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    pub fn client(&self) -> &dyn ClusterApi {
        self.client.as_ref()
    }

    /// Provider-level default organisation
    pub fn organisation(&self) -> Option<&str> {
        self.organisation.as_deref()
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }
}

impl std::fmt::Debug for ConfiguredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredProvider")
            .field("organisation", &self.organisation)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}
