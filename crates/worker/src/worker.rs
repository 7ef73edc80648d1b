use crate::handler::ClusterService;
use crate::protocol::{Request, Response};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawn the request dispatcher.
///
/// Requests are handled on tokio's blocking pool and answered on `responses`.
/// `INIT` is a barrier: the dispatcher waits for the build to finish before
/// taking the next request, so later queries see the new index. Queries run
/// concurrently and may answer out of order; the echoed id is the only
/// correlation. The dispatcher exits once every request sender is dropped.
pub fn spawn_worker(
    service: ClusterService,
    queue_capacity: usize,
    responses: mpsc::Sender<Response>,
) -> (mpsc::Sender<Request>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Request>(queue_capacity.max(1));

    let dispatcher = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let barrier = matches!(request, Request::Init { .. });
            let task = dispatch(service.clone(), request, responses.clone());
            if barrier {
                task.await;
            } else {
                tokio::spawn(task);
            }
        }
        tracing::info!("Request queue closed, worker shutting down");
    });

    (tx, dispatcher)
}

async fn dispatch(service: ClusterService, request: Request, responses: mpsc::Sender<Response>) {
    let id = request.id().cloned();
    let kind = request.kind();

    let response = match tokio::task::spawn_blocking(move || service.handle(request)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("{} handler failed: {}", kind, e);
            id.map(|id| Response::error(id, format!("Internal error: {}", e)))
        }
    };

    if let Some(response) = response {
        if responses.send(response).await.is_err() {
            tracing::debug!("Response channel closed, dropping {} reply", kind);
        }
    }
}
