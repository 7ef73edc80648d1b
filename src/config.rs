//! Clustering options.
//!
//! Options arrive from callers as partial JSON (`{radius?, maxZoom?, minPoints?}`),
//! so every field carries a serde default and unknown keys are tolerated.
use serde::de::Error;

/// Highest `max_zoom` the index accepts. Cluster ids reserve five bits for the
/// origin zoom and tile resolution runs out well before this.
pub const MAX_ZOOM_LIMIT: u8 = 24;

/// Options controlling how aggressively points merge.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    /// Cluster radius in pixels at the reference tile `extent`
    #[serde(default = "ClusterOptions::default_radius")]
    pub radius: f64,

    /// Lowest zoom level that gets its own clustering pass
    #[serde(default)]
    pub min_zoom: u8,

    /// Zoom at and beyond which every point renders individually
    #[serde(default = "ClusterOptions::default_max_zoom")]
    pub max_zoom: u8,

    /// Minimum number of points needed to form a cluster
    #[serde(default = "ClusterOptions::default_min_points")]
    pub min_points: usize,

    /// Tile extent in pixels that `radius` is measured against
    #[serde(default = "ClusterOptions::default_extent")]
    pub extent: f64,
}

impl ClusterOptions {
    const fn default_radius() -> f64 {
        60.0
    }

    const fn default_max_zoom() -> u8 {
        16
    }

    const fn default_min_points() -> usize {
        2
    }

    const fn default_extent() -> f64 {
        512.0
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    /// Search radius at `zoom` in normalized Web Mercator units (the world spans `0..1`).
    pub fn radius_at(&self, zoom: u8) -> f64 {
        self.radius / (self.extent * 2f64.powi(i32::from(zoom)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(format!(
                "radius must be a positive finite number, got: {}",
                self.radius
            ));
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(format!(
                "extent must be a positive finite number, got: {}",
                self.extent
            ));
        }

        if self.min_points == 0 {
            return Err("minPoints must be at least 1".to_string());
        }

        if self.max_zoom > MAX_ZOOM_LIMIT {
            return Err(format!(
                "maxZoom must not exceed {}, got: {}",
                MAX_ZOOM_LIMIT, self.max_zoom
            ));
        }

        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "minZoom ({}) must not exceed maxZoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let options: ClusterOptions = serde_json::from_str(json)?;
        if let Err(e) = options.validate() {
            return Err(Error::custom(e));
        }
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let options: ClusterOptions = toml::from_str(toml_str)?;
        if let Err(e) = options.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(options)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            extent: Self::default_extent(),
        }
    }
}
