//! Avisi Cloud provider core
//!
//! This crate drives the lifecycle of Avisi Cloud resources on behalf of a
//! declarative runtime: it turns resource configuration into API calls and
//! waits for the asynchronously applied changes to converge.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Hosting runtime (plugin)            │
//! │         create / read / update / delete          │
//! └─────────────────┬───────────────────────────────┘
//!                   │ ResourceData + ConfiguredProvider
//! ┌─────────────────▼───────────────────────────────┐
//! │                acloud-provider                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   ClusterResource (lifecycle)             │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────┐ ┌────────────┐ ┌──────────────┐   │
//! │  │  addons  │ │ attributes │ │  transition  │   │
//! │  └──────────┘ └────────────┘ └──────────────┘   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   Poller (deadline, cancellation)         │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait ClusterApi
//! ┌─────────────────▼───────────────────────────────┐
//! │                  acloud-api                      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod addons;
pub mod attributes;
pub mod cluster;
pub mod config;
pub mod error;
pub mod poller;
pub mod resource;
pub mod transition;

// Re-exports
pub use addons::AddonConfig;
pub use attributes::{resolve_environment, resolve_organisation, resolve_with_aliases};
pub use cluster::ClusterResource;
pub use config::{ConfiguredProvider, ProviderConfig};
pub use error::{ProviderError, Result};
pub use poller::{
    ErrorClassifier, ErrorDisposition, FailFastOnClientErrors, POLL_INTERVAL, PollDeadline,
    Poller, Probe, RetryAll,
};
pub use resource::{ManagedResource, ResourceData};
pub use transition::{ClusterLifecycle, ClusterStatus, transition_verb};
