//! Hierarchical cluster index.
//!
//! The index keeps one level per integer zoom in
//! `min_zoom..=max_zoom`. The `max_zoom` level holds every record as-is; each
//! coarser level is produced from the one above it by a greedy radius merge,
//! so the number of features never grows as zoom decreases and every record
//! is represented exactly once per level.
//!
//! Build cost is `O(n log n)` per level. Once built the index is immutable and
//! safe to share between threads for concurrent reads.

mod level;
mod query;

use crate::config::ClusterOptions;
use crate::error::{ClusterError, Result};
use geocluster_types::point::PointRecord;
use geocluster_types::stats::IndexStats;
use level::{Level, Node};
use std::time::Instant;

pub struct ClusterIndex {
    options: ClusterOptions,
    records: Vec<PointRecord>,
    /// `levels[z - min_zoom]` for every `z` in `min_zoom..=max_zoom`
    levels: Vec<Level>,
    cluster_count: usize,
}

impl ClusterIndex {
    /// Build an index over `records`.
    ///
    /// Options and records are validated first; an empty record set yields a
    /// valid, empty index.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster::{ClusterIndex, ClusterOptions};
    /// use geocluster_types::point::{PointRecord, Status};
    ///
    /// let records = vec![
    ///     PointRecord::new("a", 0.0, 0.0, Status::Visited),
    ///     PointRecord::new("b", 0.0001, 0.0001, Status::BucketList),
    /// ];
    /// let index = ClusterIndex::build(&records, ClusterOptions::default())?;
    /// assert_eq!(index.len(), 2);
    /// # Ok::<(), geocluster::ClusterError>(())
    /// ```
    pub fn build(records: impl AsRef<[PointRecord]>, options: ClusterOptions) -> Result<Self> {
        options.validate().map_err(ClusterError::InvalidOptions)?;
        let records = records.as_ref();
        crate::compute::validation::validate_records(records)?;

        let started = Instant::now();
        let point_count = records.len();

        let leaves: Vec<Node> = records
            .iter()
            .enumerate()
            .map(|(i, record)| Node::leaf(i, record))
            .collect();

        let depth = usize::from(options.max_zoom - options.min_zoom) + 1;
        let mut levels = Vec::with_capacity(depth);
        let mut current = Level::new(options.max_zoom, leaves);
        let mut cluster_count = 0;

        for zoom in (options.min_zoom..options.max_zoom).rev() {
            let (nodes, formed) = current.cluster(zoom, &options, point_count);
            log::trace!(
                "zoom {}: {} features ({} new clusters)",
                zoom,
                nodes.len(),
                formed
            );
            cluster_count += formed;
            levels.push(current);
            current = Level::new(zoom, nodes);
        }
        levels.push(current);
        levels.reverse();

        log::debug!(
            "Built cluster index: {} points, {} clusters, zoom {}..={} in {:?}",
            point_count,
            cluster_count,
            options.min_zoom,
            options.max_zoom,
            started.elapsed()
        );

        Ok(Self {
            options,
            records: records.to_vec(),
            levels,
            cluster_count,
        })
    }

    pub fn builder() -> crate::builder::ClusterIndexBuilder {
        crate::builder::ClusterIndexBuilder::new()
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            point_count: self.records.len(),
            cluster_count: self.cluster_count,
            min_zoom: self.options.min_zoom,
            max_zoom: self.options.max_zoom,
            features_per_zoom: self.levels.iter().map(Level::len).collect(),
        }
    }

    /// Level for an already clamped zoom.
    fn level(&self, zoom: u8) -> &Level {
        &self.levels[usize::from(zoom - self.options.min_zoom)]
    }
}

impl std::fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("options", &self.options)
            .field("points", &self.records.len())
            .field("clusters", &self.cluster_count)
            .finish()
    }
}
