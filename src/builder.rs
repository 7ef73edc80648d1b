//! Index builder for fluent configuration.
//!
//! This module provides a builder pattern over [`ClusterOptions`] for callers
//! that prefer chaining to constructing the options struct directly.

use crate::config::ClusterOptions;
use crate::error::Result;
use crate::index::ClusterIndex;
use geocluster_types::point::PointRecord;

/// Builder for a [`ClusterIndex`].
#[derive(Debug, Clone, Default)]
pub struct ClusterIndexBuilder {
    options: ClusterOptions,
}

impl ClusterIndexBuilder {
    /// Create a new builder with default options (radius 60, zoom 0..=16, min 2 points).
    pub fn new() -> Self {
        Self::default()
    }

    /// Cluster radius in pixels at the reference tile extent.
    pub fn radius(mut self, radius: f64) -> Self {
        self.options.radius = radius;
        self
    }

    pub fn min_zoom(mut self, zoom: u8) -> Self {
        self.options.min_zoom = zoom;
        self
    }

    /// Zoom at and beyond which points render unclustered.
    pub fn max_zoom(mut self, zoom: u8) -> Self {
        self.options.max_zoom = zoom;
        self
    }

    pub fn min_points(mut self, min_points: usize) -> Self {
        self.options.min_points = min_points;
        self
    }

    pub fn extent(mut self, extent: f64) -> Self {
        self.options.extent = extent;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the options and build the index over `records`.
    pub fn build(self, records: impl AsRef<[PointRecord]>) -> Result<ClusterIndex> {
        ClusterIndex::build(records, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use geocluster_types::point::Status;

    #[test]
    fn test_builder_default() {
        let builder = ClusterIndexBuilder::new();
        assert_eq!(builder.options, ClusterOptions::default());
    }

    #[test]
    fn test_builder_chaining() {
        let index = ClusterIndex::builder()
            .radius(40.0)
            .min_zoom(1)
            .max_zoom(12)
            .min_points(3)
            .extent(256.0)
            .build(vec![PointRecord::new("a", 0.0, 0.0, Status::Visited)])
            .unwrap();

        let options = index.options();
        assert_eq!(options.radius, 40.0);
        assert_eq!(options.min_zoom, 1);
        assert_eq!(options.max_zoom, 12);
        assert_eq!(options.min_points, 3);
        assert_eq!(options.extent, 256.0);
    }

    #[test]
    fn test_builder_validates() {
        let result = ClusterIndexBuilder::new()
            .radius(-1.0)
            .build(Vec::<PointRecord>::new());
        assert!(matches!(result, Err(ClusterError::InvalidOptions(_))));
    }

    #[test]
    fn test_builder_with_options() {
        let options = ClusterOptions::default().with_max_zoom(8);
        let index = ClusterIndexBuilder::new()
            .options(options)
            .build(Vec::<PointRecord>::new())
            .unwrap();
        assert_eq!(index.options().max_zoom, 8);
    }

    #[test]
    fn test_builder_borrows_records() {
        let records = vec![
            PointRecord::new("a", 0.0, 0.0, Status::Visited),
            PointRecord::new("b", 5.0, 5.0, Status::Unvisited),
        ];
        let index = ClusterIndexBuilder::new().max_zoom(6).build(&records).unwrap();
        assert_eq!(index.len(), records.len());
    }
}
