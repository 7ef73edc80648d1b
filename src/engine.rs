//! Owned clustering engine with safe fallbacks.
//!
//! [`ClusterEngine`] holds the current index behind an `Arc` so a rebuild can
//! replace it while readers keep answering from the snapshot they took. Query
//! methods here never fail: unknown clusters and bad viewports are logged and
//! answered with an empty list or the configured `max_zoom`.

use crate::config::ClusterOptions;
use crate::error::Result;
use crate::index::ClusterIndex;
use geocluster_types::bbox::BBox;
use geocluster_types::feature::Feature;
use geocluster_types::point::PointRecord;
use geocluster_types::stats::IndexStats;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    options: ClusterOptions,
    index: Option<Arc<ClusterIndex>>,
}

impl ClusterEngine {
    /// Engine with default options and no index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with `options` used as the fallback until the first load.
    pub fn with_options(options: ClusterOptions) -> Self {
        Self {
            options,
            index: None,
        }
    }

    /// Build a new index and make it current.
    ///
    /// On failure the previous index, if any, stays in place.
    pub fn load(
        &mut self,
        records: impl AsRef<[PointRecord]>,
        options: ClusterOptions,
    ) -> Result<Arc<ClusterIndex>> {
        let index = Arc::new(ClusterIndex::build(records, options)?);
        self.install(Arc::clone(&index));
        Ok(index)
    }

    /// Replace the current index with one built elsewhere.
    pub fn install(&mut self, index: Arc<ClusterIndex>) {
        log::debug!("Installing cluster index with {} points", index.len());
        self.options = *index.options();
        self.index = Some(index);
    }

    /// The current index, if one has been loaded.
    pub fn snapshot(&self) -> Option<Arc<ClusterIndex>> {
        self.index.clone()
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    /// Features visible at `zoom` inside `bounds` (whole world when `None`).
    pub fn visible_features(&self, zoom: f64, bounds: Option<&BBox>) -> Vec<Feature> {
        let Some(index) = &self.index else {
            return Vec::new();
        };
        let world = BBox::world();
        let bbox = bounds.unwrap_or(&world);

        match index.get_clusters(bbox, zoom) {
            Ok(features) => features,
            Err(e) => {
                log::warn!("Rejected viewport {:?}: {}", bbox, e);
                Vec::new()
            }
        }
    }

    /// Zoom at which `cluster_id` splits, or `max_zoom` when the id is unknown.
    pub fn expansion_zoom(&self, cluster_id: u64) -> u8 {
        let fallback = self.options.max_zoom;
        let Some(index) = &self.index else {
            return fallback;
        };

        index
            .get_cluster_expansion_zoom(cluster_id)
            .unwrap_or_else(|e| {
                log::warn!("Expansion zoom fallback to {}: {}", fallback, e);
                fallback
            })
    }

    pub fn children(&self, cluster_id: u64) -> Vec<Feature> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        index.get_children(cluster_id).unwrap_or_else(|e| {
            log::warn!("No children returned: {}", e);
            Vec::new()
        })
    }

    pub fn leaves(&self, cluster_id: u64, limit: usize, offset: usize) -> Vec<Feature> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        index
            .get_leaves(cluster_id, limit, offset)
            .unwrap_or_else(|e| {
                log::warn!("No leaves returned: {}", e);
                Vec::new()
            })
    }

    pub fn stats(&self) -> IndexStats {
        match &self.index {
            Some(index) => index.stats(),
            None => IndexStats {
                min_zoom: self.options.min_zoom,
                max_zoom: self.options.max_zoom,
                ..IndexStats::default()
            },
        }
    }
}
