//! Request handling for the cluster worker

use crate::protocol::{Empty, Request, Response};
use geocluster::{ClusterEngine, ClusterIndex, ClusterOptions};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared, cloneable front for one [`ClusterEngine`].
///
/// `handle` is synchronous and may run on any blocking thread. Builds happen
/// outside the lock; queries take a snapshot of the engine and release the
/// lock before doing any work.
#[derive(Clone)]
pub struct ClusterService {
    engine: Arc<RwLock<ClusterEngine>>,
    defaults: ClusterOptions,
}

impl ClusterService {
    /// `defaults` fill in any option an `INIT` leaves out.
    pub fn new(defaults: ClusterOptions) -> Self {
        Self {
            engine: Arc::new(RwLock::new(ClusterEngine::with_options(defaults))),
            defaults,
        }
    }

    pub fn defaults(&self) -> &ClusterOptions {
        &self.defaults
    }

    /// Current engine state; cheap, holds the index by `Arc`.
    pub fn engine(&self) -> ClusterEngine {
        self.engine.read().clone()
    }

    /// Answer one request. `None` for messages that get no reply.
    pub fn handle(&self, request: Request) -> Option<Response> {
        let span = tracing::debug_span!(
            "request",
            kind = request.kind(),
            id = %request.id().map(ToString::to_string).unwrap_or_default()
        );
        let _enter = span.enter();

        let response = match request {
            Request::Init { id, payload } => {
                let options = payload.options.apply(self.defaults);
                let count = payload.markers.len();
                match ClusterIndex::build(payload.markers, options) {
                    Ok(index) => {
                        self.engine.write().install(Arc::new(index));
                        info!("Index ready: {} markers, maxZoom {}", count, options.max_zoom);
                        Response::InitComplete {
                            id,
                            payload: Empty {},
                        }
                    }
                    Err(e) => {
                        warn!("INIT rejected, keeping previous index: {}", e);
                        Response::error(id, e.to_string())
                    }
                }
            }
            Request::GetClusters { id, payload } => {
                let features = self
                    .engine()
                    .visible_features(payload.zoom, payload.bounds.as_ref());
                debug!("{} features at zoom {}", features.len(), payload.zoom);
                Response::Clusters {
                    id,
                    payload: features,
                }
            }
            Request::GetExpansionZoom { id, payload } => Response::ExpansionZoom {
                id,
                payload: self.engine().expansion_zoom(payload.cluster_id),
            },
            Request::GetChildren { id, payload } => Response::Children {
                id,
                payload: self.engine().children(payload.cluster_id),
            },
            Request::GetLeaves { id, payload } => Response::Leaves {
                id,
                payload: self
                    .engine()
                    .leaves(payload.cluster_id, payload.limit, payload.offset),
            },
            Request::GetStats { id, .. } => Response::Stats {
                id,
                payload: self.engine().stats(),
            },
            Request::Unknown => {
                warn!("Ignoring message with unknown type");
                return None;
            }
        };

        Some(response)
    }
}

impl Default for ClusterService {
    fn default() -> Self {
        Self::new(ClusterOptions::default())
    }
}
