use geo::Point;
use serde::{Deserialize, Serialize};

/// Visit status of a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Visited,
    BucketList,
    #[default]
    Unvisited,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::BucketList => "bucketList",
            Self::Unvisited => "unvisited",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geotagged place submitted for clustering.
///
/// Coordinates are `[lng, lat]` in WGS84 degrees. The `sport` and `park_type`
/// tags are opaque to clustering and are handed back unchanged on point features.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::{PointRecord, Status};
///
/// let fenway = PointRecord::new("fenway", -71.0972, 42.3467, Status::BucketList)
///     .with_sport("baseball");
/// assert_eq!(fenway.lng(), -71.0972);
/// assert_eq!(fenway.sport.as_deref(), Some("baseball"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub id: String,
    pub coordinates: [f64; 2],
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub park_type: Option<String>,
}

impl PointRecord {
    pub fn new(id: impl Into<String>, lng: f64, lat: f64, status: Status) -> Self {
        Self {
            id: id.into(),
            coordinates: [lng, lat],
            status,
            sport: None,
            park_type: None,
        }
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn with_park_type(mut self, park_type: impl Into<String>) -> Self {
        self.park_type = Some(park_type.into());
        self
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    /// The record's location as a `geo::Point` (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lng(), self.lat())
    }
}
