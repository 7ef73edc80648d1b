//! In-process async handle for the cluster worker
//!
//! [`WorkerHandle`] owns a worker and pairs every request with its response
//! by correlation id, so callers can issue overlapping requests from many
//! tasks.

use crate::config::WorkerConfig;
use crate::handler::ClusterService;
use crate::protocol::{
    ClusterRef, ClustersPayload, Empty, InitPayload, LeavesPayload, OptionOverrides, Request,
    RequestId, Response,
};
use crate::worker::spawn_worker;
use geocluster_types::bbox::BBox;
use geocluster_types::feature::Feature;
use geocluster_types::point::PointRecord;
use geocluster_types::stats::IndexStats;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker has shut down")]
    Closed,
    #[error("Worker rejected request: {0}")]
    Rejected(String),
    #[error("Unexpected {0} response")]
    UnexpectedResponse(&'static str),
}

pub type Result<T> = std::result::Result<T, WorkerError>;

type Pending = Arc<Mutex<FxHashMap<u64, oneshot::Sender<Response>>>>;

pub struct WorkerHandle {
    requests: mpsc::Sender<Request>,
    pending: Pending,
    next_id: AtomicU64,
}

impl WorkerHandle {
    /// Start a worker on the current tokio runtime.
    pub fn spawn(config: &WorkerConfig) -> Self {
        let service = ClusterService::new(config.options);
        let (responses_tx, mut responses_rx) = mpsc::channel(config.queue_capacity.max(1));
        let (requests, _dispatcher) = spawn_worker(service, config.queue_capacity, responses_tx);

        let pending: Pending = Arc::default();
        let router = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(response) = responses_rx.recv().await {
                let &RequestId::Number(id) = response.id() else {
                    tracing::warn!("Dropping response with foreign id {}", response.id());
                    continue;
                };
                match router.lock().remove(&id) {
                    Some(waiter) => {
                        let _ = waiter.send(response);
                    }
                    None => tracing::warn!("No caller waiting for response {}", id),
                }
            }
        });

        Self {
            requests,
            pending,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, build: impl FnOnce(RequestId) -> Request) -> Result<Response> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        if self.requests.send(build(RequestId::Number(id))).await.is_err() {
            self.pending.lock().remove(&id);
            return Err(WorkerError::Closed);
        }

        match rx.await.map_err(|_| WorkerError::Closed)? {
            Response::Error { payload, .. } => Err(WorkerError::Rejected(payload.message)),
            response => Ok(response),
        }
    }

    /// Build a new index. Missing options come from the worker's defaults.
    pub async fn init(&self, markers: Vec<PointRecord>, options: OptionOverrides) -> Result<()> {
        let payload = InitPayload { markers, options };
        match self.call(|id| Request::Init { id, payload }).await? {
            Response::InitComplete { .. } => Ok(()),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn clusters(&self, zoom: f64, bounds: Option<BBox>) -> Result<Vec<Feature>> {
        let payload = ClustersPayload { zoom, bounds };
        match self.call(|id| Request::GetClusters { id, payload }).await? {
            Response::Clusters { payload, .. } => Ok(payload),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn expansion_zoom(&self, cluster_id: u64) -> Result<u8> {
        let payload = ClusterRef { cluster_id };
        match self.call(|id| Request::GetExpansionZoom { id, payload }).await? {
            Response::ExpansionZoom { payload, .. } => Ok(payload),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn children(&self, cluster_id: u64) -> Result<Vec<Feature>> {
        let payload = ClusterRef { cluster_id };
        match self.call(|id| Request::GetChildren { id, payload }).await? {
            Response::Children { payload, .. } => Ok(payload),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn leaves(&self, cluster_id: u64, limit: usize, offset: usize) -> Result<Vec<Feature>> {
        let payload = LeavesPayload {
            cluster_id,
            limit,
            offset,
        };
        match self.call(|id| Request::GetLeaves { id, payload }).await? {
            Response::Leaves { payload, .. } => Ok(payload),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }

    pub async fn stats(&self) -> Result<IndexStats> {
        match self
            .call(|id| Request::GetStats {
                id,
                payload: Empty {},
            })
            .await?
        {
            Response::Stats { payload, .. } => Ok(payload),
            other => Err(WorkerError::UnexpectedResponse(other.kind())),
        }
    }
}
