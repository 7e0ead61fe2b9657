//! Cluster status values and the desired-state transition policy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster status as reported by the API
///
/// The set is open: unrecognised values are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClusterStatus {
    Running,
    Stopped,
    Starting,
    Stopping,
    Deleting,
    Other(String),
}

impl ClusterStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClusterStatus::Running => "running",
            ClusterStatus::Stopped => "stopped",
            ClusterStatus::Starting => "starting",
            ClusterStatus::Stopping => "stopping",
            ClusterStatus::Deleting => "deleting",
            ClusterStatus::Other(s) => s,
        }
    }

    /// Steady status for the `stopped` flag of a cluster
    pub fn desired(stopped: bool) -> Self {
        if stopped {
            ClusterStatus::Stopped
        } else {
            ClusterStatus::Running
        }
    }

    /// Status value the backend expects when asked to reach `self`
    pub fn transition_verb(&self) -> ClusterStatus {
        match self {
            ClusterStatus::Running => ClusterStatus::Starting,
            ClusterStatus::Stopped => ClusterStatus::Stopping,
            other => other.clone(),
        }
    }
}

/// Transient verb for a desired steady state given as a raw status string
pub fn transition_verb(desired: &str) -> String {
    ClusterStatus::from(desired).transition_verb().into()
}

impl From<&str> for ClusterStatus {
    fn from(value: &str) -> Self {
        match value {
            "running" => ClusterStatus::Running,
            "stopped" => ClusterStatus::Stopped,
            "starting" => ClusterStatus::Starting,
            "stopping" => ClusterStatus::Stopping,
            "deleting" => ClusterStatus::Deleting,
            other => ClusterStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ClusterStatus {
    fn from(value: String) -> Self {
        ClusterStatus::from(value.as_str())
    }
}

impl From<ClusterStatus> for String {
    fn from(status: ClusterStatus) -> Self {
        status.as_str().to_string()
    }
}

impl PartialEq<str> for ClusterStatus {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a managed cluster within one reconciliation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLifecycle {
    Absent,
    Creating,
    Running,
    Starting,
    Stopping,
    Stopped,
    Deleting,
    Deleted,
    Failed,
}

impl ClusterLifecycle {
    /// Lifecycle state reflected by an observed status
    ///
    /// Unknown statuses right after creation count as `Creating`.
    pub fn observe(status: &ClusterStatus) -> Self {
        match status {
            ClusterStatus::Running => ClusterLifecycle::Running,
            ClusterStatus::Stopped => ClusterLifecycle::Stopped,
            ClusterStatus::Starting => ClusterLifecycle::Starting,
            ClusterStatus::Stopping => ClusterLifecycle::Stopping,
            ClusterStatus::Deleting => ClusterLifecycle::Deleting,
            ClusterStatus::Other(_) => ClusterLifecycle::Creating,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClusterLifecycle::Deleted | ClusterLifecycle::Failed)
    }
}

impl fmt::Display for ClusterLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClusterLifecycle::Absent => "absent",
            ClusterLifecycle::Creating => "creating",
            ClusterLifecycle::Running => "running",
            ClusterLifecycle::Starting => "starting",
            ClusterLifecycle::Stopping => "stopping",
            ClusterLifecycle::Stopped => "stopped",
            ClusterLifecycle::Deleting => "deleting",
            ClusterLifecycle::Deleted => "deleted",
            ClusterLifecycle::Failed => "failed",
        };
        f.write_str(name)
    }
}
