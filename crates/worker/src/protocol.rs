//! Message protocol for the cluster worker
//!
//! Every message is a JSON object discriminated by `type`, carrying an opaque
//! `id` that the worker echoes on the matching response and a `payload`.

use geocluster::ClusterOptions;
use geocluster_types::bbox::BBox;
use geocluster_types::feature::Feature;
use geocluster_types::point::PointRecord;
use geocluster_types::stats::IndexStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request type tags this worker understands.
pub const REQUEST_TYPES: [&str; 6] = [
    "INIT",
    "GET_CLUSTERS",
    "GET_EXPANSION_ZOOM",
    "GET_CHILDREN",
    "GET_LEAVES",
    "GET_STATS",
];

/// Correlation id chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        RequestId::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::Text(id.to_string())
    }
}

/// Partial clustering options sent with `INIT`.
///
/// Missing fields fall back to the worker's configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<f64>,
}

impl OptionOverrides {
    pub fn apply(&self, base: ClusterOptions) -> ClusterOptions {
        ClusterOptions {
            radius: self.radius.unwrap_or(base.radius),
            min_zoom: self.min_zoom.unwrap_or(base.min_zoom),
            max_zoom: self.max_zoom.unwrap_or(base.max_zoom),
            min_points: self.min_points.unwrap_or(base.min_points),
            extent: self.extent.unwrap_or(base.extent),
        }
    }
}

impl From<ClusterOptions> for OptionOverrides {
    fn from(options: ClusterOptions) -> Self {
        Self {
            radius: Some(options.radius),
            min_zoom: Some(options.min_zoom),
            max_zoom: Some(options.max_zoom),
            min_points: Some(options.min_points),
            extent: Some(options.extent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitPayload {
    pub markers: Vec<PointRecord>,
    #[serde(default)]
    pub options: OptionOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClustersPayload {
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRef {
    pub cluster_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavesPayload {
    pub cluster_id: u64,
    #[serde(default = "LeavesPayload::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl LeavesPayload {
    const fn default_limit() -> usize {
        10
    }
}

/// Payload for messages that carry no data; serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Init {
        id: RequestId,
        payload: InitPayload,
    },
    GetClusters {
        id: RequestId,
        payload: ClustersPayload,
    },
    GetExpansionZoom {
        id: RequestId,
        payload: ClusterRef,
    },
    GetChildren {
        id: RequestId,
        payload: ClusterRef,
    },
    GetLeaves {
        id: RequestId,
        payload: LeavesPayload,
    },
    GetStats {
        id: RequestId,
        #[serde(default)]
        payload: Empty,
    },
    /// Any other `type`; logged and dropped without a response
    #[serde(other)]
    Unknown,
}

impl Request {
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Request::Init { id, .. }
            | Request::GetClusters { id, .. }
            | Request::GetExpansionZoom { id, .. }
            | Request::GetChildren { id, .. }
            | Request::GetLeaves { id, .. }
            | Request::GetStats { id, .. } => Some(id),
            Request::Unknown => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::Init { .. } => "INIT",
            Request::GetClusters { .. } => "GET_CLUSTERS",
            Request::GetExpansionZoom { .. } => "GET_EXPANSION_ZOOM",
            Request::GetChildren { .. } => "GET_CHILDREN",
            Request::GetLeaves { .. } => "GET_LEAVES",
            Request::GetStats { .. } => "GET_STATS",
            Request::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    InitComplete {
        id: RequestId,
        #[serde(default)]
        payload: Empty,
    },
    Clusters {
        id: RequestId,
        payload: Vec<Feature>,
    },
    ExpansionZoom {
        id: RequestId,
        payload: u8,
    },
    Children {
        id: RequestId,
        payload: Vec<Feature>,
    },
    Leaves {
        id: RequestId,
        payload: Vec<Feature>,
    },
    Stats {
        id: RequestId,
        payload: IndexStats,
    },
    Error {
        id: RequestId,
        payload: ErrorPayload,
    },
}

impl Response {
    pub fn error(id: RequestId, message: impl Into<String>) -> Self {
        Response::Error {
            id,
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }

    pub fn id(&self) -> &RequestId {
        match self {
            Response::InitComplete { id, .. }
            | Response::Clusters { id, .. }
            | Response::ExpansionZoom { id, .. }
            | Response::Children { id, .. }
            | Response::Leaves { id, .. }
            | Response::Stats { id, .. }
            | Response::Error { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Response::InitComplete { .. } => "INIT_COMPLETE",
            Response::Clusters { .. } => "CLUSTERS",
            Response::ExpansionZoom { .. } => "EXPANSION_ZOOM",
            Response::Children { .. } => "CHILDREN",
            Response::Leaves { .. } => "LEAVES",
            Response::Stats { .. } => "STATS",
            Response::Error { .. } => "ERROR",
        }
    }
}

/// A line that could not be turned into a [`Request`].
///
/// `id` is recovered when the message names a known request type, so the
/// caller can still be answered with an `ERROR`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    pub id: Option<RequestId>,
    pub message: String,
}

/// Decode one JSON message.
pub fn decode_request(line: &str) -> Result<Request, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| DecodeError {
        id: None,
        message: format!("Malformed JSON: {}", e),
    })?;

    let known = value
        .get("type")
        .and_then(|t| t.as_str())
        .is_some_and(|t| REQUEST_TYPES.contains(&t));
    let id = if known {
        value
            .get("id")
            .and_then(|id| RequestId::deserialize(id).ok())
    } else {
        None
    };

    Request::deserialize(value).map_err(|e| DecodeError {
        id,
        message: format!("Invalid request: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::point::Status;
    use serde_json::json;

    #[test]
    fn test_decode_init() {
        let line = json!({
            "type": "INIT",
            "id": 1,
            "payload": {
                "markers": [
                    {"id": "a", "coordinates": [1.0, 2.0], "status": "visited", "sport": "golf"}
                ],
                "options": {"radius": 40, "maxZoom": 14}
            }
        })
        .to_string();

        let Request::Init { id, payload } = decode_request(&line).unwrap() else {
            panic!("expected INIT");
        };
        assert_eq!(id, RequestId::Number(1));
        assert_eq!(payload.markers.len(), 1);
        assert_eq!(payload.markers[0].status, Status::Visited);
        assert_eq!(payload.options.radius, Some(40.0));
        assert_eq!(payload.options.max_zoom, Some(14));
        assert_eq!(payload.options.min_points, None);

        let options = payload.options.apply(ClusterOptions::default());
        assert_eq!(options.radius, 40.0);
        assert_eq!(options.max_zoom, 14);
        assert_eq!(options.min_points, 2);
    }

    #[test]
    fn test_decode_queries() {
        let clusters = decode_request(
            r#"{"type":"GET_CLUSTERS","id":"q1","payload":{"zoom":3.5,"bounds":[-10,-10,10,10]}}"#,
        )
        .unwrap();
        assert_eq!(
            clusters,
            Request::GetClusters {
                id: "q1".into(),
                payload: ClustersPayload {
                    zoom: 3.5,
                    bounds: Some(BBox::new(-10.0, -10.0, 10.0, 10.0)),
                },
            }
        );

        let leaves =
            decode_request(r#"{"type":"GET_LEAVES","id":2,"payload":{"clusterId":99}}"#).unwrap();
        assert_eq!(
            leaves,
            Request::GetLeaves {
                id: RequestId::Number(2),
                payload: LeavesPayload {
                    cluster_id: 99,
                    limit: 10,
                    offset: 0,
                },
            }
        );

        let stats = decode_request(r#"{"type":"GET_STATS","id":3}"#).unwrap();
        assert_eq!(stats.kind(), "GET_STATS");
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let request = decode_request(r#"{"type":"PING","id":1,"payload":{}}"#).unwrap();
        assert_eq!(request, Request::Unknown);
        assert!(request.id().is_none());
    }

    #[test]
    fn test_decode_errors_keep_id_for_known_types() {
        let err = decode_request(r#"{"type":"GET_EXPANSION_ZOOM","id":7,"payload":{}}"#)
            .unwrap_err();
        assert_eq!(err.id, Some(RequestId::Number(7)));

        let err = decode_request(r#"{"type":"INIT","id":"x","payload":{"markers":[{"id":"a","coordinates":[0,0],"status":"been-there"}]}}"#)
            .unwrap_err();
        assert_eq!(err.id, Some(RequestId::Text("x".into())));

        let err = decode_request("{not json").unwrap_err();
        assert!(err.id.is_none());
    }

    #[test]
    fn test_response_wire_shape() {
        let response = Response::ExpansionZoom {
            id: RequestId::Number(5),
            payload: 12,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"type": "EXPANSION_ZOOM", "id": 5, "payload": 12})
        );

        let done = Response::InitComplete {
            id: "init".into(),
            payload: Empty {},
        };
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            json!({"type": "INIT_COMPLETE", "id": "init", "payload": {}})
        );

        let error = Response::error(RequestId::Number(9), "bad radius");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"type": "ERROR", "id": 9, "payload": {"message": "bad radius"}})
        );
        assert_eq!(error.kind(), "ERROR");
        assert_eq!(error.id(), &RequestId::Number(9));
    }
}
