//! Avisi Cloud API client
//!
//! This crate provides the cluster-management surface of the Avisi Cloud
//! REST API, used by the provider core to create, read, update and delete
//! managed Kubernetes clusters.
//!
//! # Features
//!
//! - Typed request/response payloads (`Cluster`, `CreateCluster`, `UpdateCluster`)
//! - `ClusterApi` trait so callers can swap the transport in tests
//! - `AcloudClient`, a reqwest implementation with personal access token auth
//!
//! # Example
//!
//! ```ignore
//! use acloud_api::{AcloudClient, ClusterApi};
//!
//! let client = AcloudClient::new("https://api.avisi.cloud", "my-token")?;
//!
//! // A missing cluster is reported as `None`, not as an error
//! if let Some(cluster) = client.get_cluster("my-org", "prod", "main").await? {
//!     println!("{} is {}", cluster.slug, cluster.status);
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::ClusterApi;
pub use client::{AcloudClient, DEFAULT_API_ENDPOINT};
pub use error::{ApiError, Result};
pub use types::{Addon, Cluster, CreateCluster, NodePool, UpdateCluster};
