use serde::{Deserialize, Serialize};

/// A geographic viewport in WGS84 degrees.
///
/// Serialized as a flat `[minLng, minLat, maxLng, maxLat]` array. `min_lng` may
/// be greater than `max_lng` when the viewport crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BBox {
    /// Create a new bounding box from its corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::bbox::BBox;
    ///
    /// let bay_area = BBox::new(-123.0, 37.0, -121.5, 38.5);
    /// assert!(bay_area.contains(-122.4, 37.8));
    /// ```
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// The whole world, `[-180, -90, 180, 90]`.
    pub const fn world() -> Self {
        Self {
            min_lng: -180.0,
            min_lat: -90.0,
            max_lng: 180.0,
            max_lat: 90.0,
        }
    }

    /// True if every corner is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
            .iter()
            .all(|v| v.is_finite())
    }

    /// True if the box wraps across the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Check whether a coordinate lies inside the box, honouring antimeridian wrap.
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }
        if self.crosses_antimeridian() {
            lng >= self.min_lng || lng <= self.max_lng
        } else {
            lng >= self.min_lng && lng <= self.max_lng
        }
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::world()
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.min_lng, b.min_lat, b.max_lng, b.max_lat]
    }
}
