//! GeoJSON-shaped map features returned by cluster queries.
//!
//! A [`Feature`] is either an aggregate cluster or a single input point that
//! was not absorbed at the queried zoom. Both share the GeoJSON envelope
//! `{ type: "Feature", geometry: { type: "Point", coordinates }, properties }`.

use crate::point::{PointRecord, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
}

/// GeoJSON point geometry, `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [lng, lat],
        }
    }
}

/// Short, human readable member count: `950`, `"1.5k"`, `"12k"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbbreviatedCount {
    Exact(usize),
    Short(String),
}

impl AbbreviatedCount {
    /// Abbreviate a member count.
    ///
    /// ```
    /// use geocluster_types::feature::AbbreviatedCount;
    ///
    /// assert_eq!(AbbreviatedCount::from_count(999), AbbreviatedCount::Exact(999));
    /// assert_eq!(AbbreviatedCount::from_count(1_540).to_string(), "1.5k");
    /// assert_eq!(AbbreviatedCount::from_count(2_000).to_string(), "2k");
    /// assert_eq!(AbbreviatedCount::from_count(12_345).to_string(), "12k");
    /// ```
    pub fn from_count(count: usize) -> Self {
        if count >= 10_000 {
            let thousands = (count as f64 / 1000.0).round() as u64;
            Self::Short(format!("{thousands}k"))
        } else if count >= 1_000 {
            let tenths = (count as f64 / 100.0).round() as u64;
            if tenths % 10 == 0 {
                Self::Short(format!("{}k", tenths / 10))
            } else {
                Self::Short(format!("{}.{}k", tenths / 10, tenths % 10))
            }
        } else {
            Self::Exact(count)
        }
    }
}

impl std::fmt::Display for AbbreviatedCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Short(s) => f.write_str(s),
        }
    }
}

/// Properties of an aggregate cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProperties {
    pub cluster: bool,
    pub cluster_id: u64,
    pub point_count: usize,
    pub point_count_abbreviated: AbbreviatedCount,
    #[serde(rename = "visitedCount")]
    pub visited_count: usize,
    #[serde(rename = "bucketListCount")]
    pub bucket_list_count: usize,
    #[serde(rename = "dominantStatus")]
    pub dominant_status: Status,
}

/// Properties of a single, unclustered record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointProperties {
    pub cluster: bool,
    pub id: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub park_type: Option<String>,
}

impl From<&PointRecord> for PointProperties {
    fn from(record: &PointRecord) -> Self {
        Self {
            cluster: false,
            id: record.id.clone(),
            status: record.status,
            sport: record.sport.clone(),
            park_type: record.park_type.clone(),
        }
    }
}

// Cluster must stay first: point properties lack `cluster_id` and fall through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureProperties {
    Cluster(ClusterProperties),
    Point(PointProperties),
}

/// A renderable map feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

impl Feature {
    /// Build a cluster feature at `[lng, lat]`.
    pub fn cluster(lng: f64, lat: f64, properties: ClusterProperties) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: PointGeometry::new(lng, lat),
            properties: FeatureProperties::Cluster(properties),
        }
    }

    /// Build a point feature from the original record.
    pub fn point(record: &PointRecord) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: PointGeometry::new(record.lng(), record.lat()),
            properties: FeatureProperties::Point(record.into()),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self.properties, FeatureProperties::Cluster(_))
    }

    pub fn as_cluster(&self) -> Option<&ClusterProperties> {
        match &self.properties {
            FeatureProperties::Cluster(props) => Some(props),
            FeatureProperties::Point(_) => None,
        }
    }

    pub fn as_point(&self) -> Option<&PointProperties> {
        match &self.properties {
            FeatureProperties::Point(props) => Some(props),
            FeatureProperties::Cluster(_) => None,
        }
    }

    pub fn cluster_id(&self) -> Option<u64> {
        self.as_cluster().map(|c| c.cluster_id)
    }

    /// Number of input records this feature stands for.
    pub fn point_count(&self) -> usize {
        match &self.properties {
            FeatureProperties::Cluster(props) => props.point_count,
            FeatureProperties::Point(_) => 1,
        }
    }

    /// Status shown on the map: the dominant status for clusters, the record status otherwise.
    pub fn status(&self) -> Status {
        match &self.properties {
            FeatureProperties::Cluster(props) => props.dominant_status,
            FeatureProperties::Point(props) => props.status,
        }
    }

    pub fn lng(&self) -> f64 {
        self.geometry.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.geometry.coordinates[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_cluster() -> Feature {
        Feature::cluster(
            10.0,
            20.0,
            ClusterProperties {
                cluster: true,
                cluster_id: 97,
                point_count: 3,
                point_count_abbreviated: AbbreviatedCount::from_count(3),
                visited_count: 2,
                bucket_list_count: 1,
                dominant_status: Status::Visited,
            },
        )
    }

    #[test]
    fn test_cluster_wire_shape() {
        let value = serde_json::to_value(sample_cluster()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [10.0, 20.0] },
                "properties": {
                    "cluster": true,
                    "cluster_id": 97,
                    "point_count": 3,
                    "point_count_abbreviated": 3,
                    "visitedCount": 2,
                    "bucketListCount": 1,
                    "dominantStatus": "visited"
                }
            })
        );
    }

    #[test]
    fn test_point_wire_shape() {
        let record = PointRecord::new("p1", 1.5, -2.5, Status::BucketList).with_park_type("national");
        let value = serde_json::to_value(Feature::point(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [1.5, -2.5] },
                "properties": {
                    "cluster": false,
                    "id": "p1",
                    "status": "bucketList",
                    "parkType": "national"
                }
            })
        );
    }

    #[test]
    fn test_untagged_properties_parse() {
        let cluster: Feature =
            serde_json::from_value(serde_json::to_value(sample_cluster()).unwrap()).unwrap();
        assert!(cluster.is_cluster());
        assert_eq!(cluster.cluster_id(), Some(97));

        let record = PointRecord::new("p1", 0.0, 0.0, Status::Visited);
        let point: Feature =
            serde_json::from_value(serde_json::to_value(Feature::point(&record)).unwrap()).unwrap();
        assert!(!point.is_cluster());
        assert_eq!(point.as_point().map(|p| p.id.as_str()), Some("p1"));
        assert_eq!(point.point_count(), 1);
    }

    #[test]
    fn test_abbreviation_boundaries() {
        assert_eq!(AbbreviatedCount::from_count(0), AbbreviatedCount::Exact(0));
        assert_eq!(AbbreviatedCount::from_count(1_000).to_string(), "1k");
        assert_eq!(AbbreviatedCount::from_count(1_050).to_string(), "1.1k");
        assert_eq!(AbbreviatedCount::from_count(9_960).to_string(), "10k");
        assert_eq!(AbbreviatedCount::from_count(10_000).to_string(), "10k");
        assert_eq!(AbbreviatedCount::from_count(125_600).to_string(), "126k");
        assert_eq!(
            serde_json::to_value(AbbreviatedCount::from_count(1_540)).unwrap(),
            json!("1.5k")
        );
    }
}
