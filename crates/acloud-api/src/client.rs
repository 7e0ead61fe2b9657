//! Avisi Cloud REST client
//!
//! Direct API implementation of [`ClusterApi`] using bearer
//! personal-access-token authentication.

use crate::api::ClusterApi;
use crate::error::{ApiError, Result};
use crate::types::{Cluster, CreateCluster, UpdateCluster};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.avisi.cloud";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Avisi Cloud API client
#[derive(Debug, Clone)]
pub struct AcloudClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AcloudClient {
    /// Create a new client for the given API endpoint
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Get the API endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn clusters_url(&self, organisation: &str, environment: &str) -> String {
        format!(
            "{}/api/orgs/{}/environments/{}/clusters",
            self.base_url, organisation, environment
        )
    }

    fn cluster_url(&self, organisation: &str, environment: &str, slug: &str) -> String {
        format!("{}/{}", self.clusters_url(organisation, environment), slug)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.with_auth(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ApiError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Extract a human readable message from an error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json["message"]
            .as_str()
            .or_else(|| json["error"].as_str())
            .unwrap_or(body)
            .to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl ClusterApi for AcloudClient {
    async fn create_cluster(
        &self,
        organisation: &str,
        environment: &str,
        request: &CreateCluster,
    ) -> Result<Cluster> {
        let url = self.clusters_url(organisation, environment);
        tracing::debug!("POST {}", url);

        let response = self.send(self.client.post(&url).json(request)).await?;
        let status = response.status().as_u16();

        Self::json_body(response).await?.ok_or_else(|| ApiError::Api {
            status,
            message: "create cluster returned an empty body".to_string(),
        })
    }

    async fn get_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
    ) -> Result<Option<Cluster>> {
        let url = self.cluster_url(organisation, environment, slug);
        tracing::debug!("GET {}", url);

        match self.send(self.client.get(&url)).await {
            Ok(response) => Self::json_body(response).await,
            Err(ApiError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> Result<Option<Cluster>> {
        let url = self.cluster_url(organisation, environment, slug);
        tracing::debug!("PATCH {}", url);

        let response = self.send(self.client.patch(&url).json(request)).await?;
        Self::json_body(response).await
    }

    async fn delete_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> Result<()> {
        let url = self.cluster_url(organisation, environment, slug);
        tracing::debug!("DELETE {}", url);

        self.send(self.client.delete(&url).json(request)).await?;
        Ok(())
    }
}
