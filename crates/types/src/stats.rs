use serde::{Deserialize, Serialize};

/// Shape of a built cluster index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Number of input records
    pub point_count: usize,
    /// Total number of clusters formed across all zoom levels
    pub cluster_count: usize,
    /// Lowest zoom level held by the index
    pub min_zoom: u8,
    /// Zoom level at and beyond which points are returned unclustered
    pub max_zoom: u8,
    /// Features (points plus clusters) per zoom level, starting at `min_zoom`
    pub features_per_zoom: Vec<usize>,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feature count at a given zoom, if the zoom is covered.
    pub fn features_at(&self, zoom: u8) -> Option<usize> {
        let offset = zoom.checked_sub(self.min_zoom)?;
        self.features_per_zoom.get(offset as usize).copied()
    }
}
