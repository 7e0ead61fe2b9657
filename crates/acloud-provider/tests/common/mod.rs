use acloud_api::{ApiError, Cluster, ClusterApi, CreateCluster, UpdateCluster};
use acloud_provider::{ConfiguredProvider, ResourceData};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted answer of the fake API
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(u16),
}

impl<T> Reply<T> {
    fn into_result(self) -> acloud_api::Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Fail(status) => Err(ApiError::Api {
                status,
                message: format!("scripted failure {status}"),
            }),
        }
    }
}

/// In-memory `ClusterApi` that replays scripted responses
///
/// The last scripted `get_cluster` reply repeats once the queue is drained.
#[derive(Default)]
pub struct FakeClusterApi {
    create_reply: Mutex<Option<Reply<Cluster>>>,
    update_reply: Mutex<Option<Reply<Option<Cluster>>>>,
    delete_reply: Mutex<Option<Reply<()>>>,
    get_replies: Mutex<VecDeque<Reply<Option<Cluster>>>>,

    pub creates: Mutex<Vec<(String, String, CreateCluster)>>,
    pub updates: Mutex<Vec<(String, String, String, UpdateCluster)>>,
    pub deletes: Mutex<Vec<(String, String, String, UpdateCluster)>>,
    pub gets: AtomicUsize,
}

impl FakeClusterApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_create(self: &Arc<Self>, reply: Reply<Cluster>) -> Arc<Self> {
        *self.create_reply.lock().unwrap() = Some(reply);
        self.clone()
    }

    pub fn on_update(self: &Arc<Self>, reply: Reply<Option<Cluster>>) -> Arc<Self> {
        *self.update_reply.lock().unwrap() = Some(reply);
        self.clone()
    }

    pub fn on_delete(self: &Arc<Self>, reply: Reply<()>) -> Arc<Self> {
        *self.delete_reply.lock().unwrap() = Some(reply);
        self.clone()
    }

    pub fn on_get(self: &Arc<Self>, replies: Vec<Reply<Option<Cluster>>>) -> Arc<Self> {
        self.get_replies.lock().unwrap().extend(replies);
        self.clone()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterApi for FakeClusterApi {
    async fn create_cluster(
        &self,
        organisation: &str,
        environment: &str,
        request: &CreateCluster,
    ) -> acloud_api::Result<Cluster> {
        self.creates.lock().unwrap().push((
            organisation.to_string(),
            environment.to_string(),
            request.clone(),
        ));
        self.create_reply
            .lock()
            .unwrap()
            .clone()
            .expect("create_cluster not scripted")
            .into_result()
    }

    async fn get_cluster(
        &self,
        _organisation: &str,
        _environment: &str,
        _slug: &str,
    ) -> acloud_api::Result<Option<Cluster>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.get_replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or(Reply::Ok(None)).into_result()
    }

    async fn update_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> acloud_api::Result<Option<Cluster>> {
        self.updates.lock().unwrap().push((
            organisation.to_string(),
            environment.to_string(),
            slug.to_string(),
            request.clone(),
        ));
        self.update_reply
            .lock()
            .unwrap()
            .clone()
            .expect("update_cluster not scripted")
            .into_result()
    }

    async fn delete_cluster(
        &self,
        organisation: &str,
        environment: &str,
        slug: &str,
        request: &UpdateCluster,
    ) -> acloud_api::Result<()> {
        self.deletes.lock().unwrap().push((
            organisation.to_string(),
            environment.to_string(),
            slug.to_string(),
            request.clone(),
        ));
        self.delete_reply
            .lock()
            .unwrap()
            .clone()
            .expect("delete_cluster not scripted")
            .into_result()
    }
}

pub fn cluster(status: &str) -> Cluster {
    Cluster {
        identity: "c-123".to_string(),
        slug: "main".to_string(),
        name: "main".to_string(),
        status: status.to_string(),
        organisation_slug: "avisi".to_string(),
        environment_slug: "prod".to_string(),
        cloud_provider: "aws".to_string(),
        region: "eu-west-1".to_string(),
        version: "1.30".to_string(),
        ..Default::default()
    }
}

pub fn found(status: &str) -> Reply<Option<Cluster>> {
    Reply::Ok(Some(cluster(status)))
}

pub fn provider(api: &Arc<FakeClusterApi>, organisation: Option<&str>) -> ConfiguredProvider {
    ConfiguredProvider::with_client(api.clone(), organisation.map(str::to_string))
}

/// Configuration of a new cluster
pub fn new_cluster_data() -> ResourceData {
    ResourceData::from_attributes(json!({
        "name": "main",
        "organisation": "avisi",
        "environment": "prod",
        "version": "1.30",
        "region": "eu-west-1",
        "cloud_account_identity": "ca-1"
    }))
}

/// State of a cluster that is already tracked
pub fn tracked_cluster_data() -> ResourceData {
    let mut data = new_cluster_data().with_attribute("slug", "main");
    data.set_id("c-123");
    data
}
