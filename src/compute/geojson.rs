//! GeoJSON interop for cluster features and point records.

use crate::error::{ClusterError, Result};
use geocluster_types::feature::Feature;
use geocluster_types::point::{PointRecord, Status};
use geojson::{FeatureCollection, Geometry, Value};
use serde_json::Map;

/// Converts a cluster or point feature into a `geojson::Feature`.
pub fn feature_to_geojson(feature: &Feature) -> Result<geojson::Feature> {
    let geom = Geometry::new(Value::Point(vec![feature.lng(), feature.lat()]));

    let props = match serde_json::to_value(&feature.properties)? {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(ClusterError::InvalidInput(format!(
                "Feature properties did not serialize to an object: {}",
                other
            )));
        }
    };

    Ok(geojson::Feature {
        bbox: None,
        geometry: Some(geom),
        id: None,
        properties: Some(props),
        foreign_members: None,
    })
}

/// Wraps query results into a `FeatureCollection`.
pub fn features_to_collection(features: &[Feature]) -> Result<FeatureCollection> {
    let features = features
        .iter()
        .map(feature_to_geojson)
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Serializes query results as a GeoJSON FeatureCollection string.
pub fn features_to_geojson_string(features: &[Feature]) -> Result<String> {
    let collection = features_to_collection(features)?;
    Ok(serde_json::to_string(&collection)?)
}

/// Parses a GeoJSON FeatureCollection of points into records.
///
/// The record id comes from `properties.id`, falling back to the feature id.
/// `status` defaults to `unvisited`; `sport` and `parkType` are carried over.
pub fn records_from_geojson(geojson: &str) -> Result<Vec<PointRecord>> {
    let collection: FeatureCollection = serde_json::from_str(geojson)
        .map_err(|e| ClusterError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    collection
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| record_from_feature(i, feature))
        .collect()
}

fn record_from_feature(index: usize, feature: &geojson::Feature) -> Result<PointRecord> {
    let coords = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => coords,
        Some(Value::Point(_)) => {
            return Err(ClusterError::InvalidInput(format!(
                "Feature {} point must have at least 2 coordinates",
                index
            )));
        }
        _ => {
            return Err(ClusterError::InvalidInput(format!(
                "Feature {} geometry is not a Point",
                index
            )));
        }
    };

    let empty = Map::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    let id = props
        .get("id")
        .and_then(json_to_id)
        .or_else(|| match &feature.id {
            Some(geojson::feature::Id::String(s)) => Some(s.clone()),
            Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
            None => None,
        })
        .ok_or_else(|| ClusterError::InvalidInput(format!("Feature {} has no id", index)))?;

    let status = match props.get("status") {
        Some(value) => serde_json::from_value::<Status>(value.clone()).map_err(|e| {
            ClusterError::InvalidInput(format!("Feature '{}' has invalid status: {}", id, e))
        })?,
        None => Status::Unvisited,
    };

    let mut record = PointRecord::new(id, coords[0], coords[1], status);
    record.sport = props.get("sport").and_then(|v| v.as_str()).map(String::from);
    record.park_type = props
        .get("parkType")
        .and_then(|v| v.as_str())
        .map(String::from);
    Ok(record)
}

fn json_to_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
