//! Read-side queries over a built [`ClusterIndex`].

use super::ClusterIndex;
use super::level::{Level, Node, NodeKind, decode_cluster_id};
use crate::compute::projection::{lat_y, lng_x, unproject, wrap_lng};
use crate::compute::validation::validate_bbox;
use crate::error::{ClusterError, Result};
use geocluster_types::bbox::BBox;
use geocluster_types::feature::{AbbreviatedCount, ClusterProperties, Feature};

impl ClusterIndex {
    /// Map a viewport zoom onto an indexed level.
    ///
    /// Fractional zooms are floored (level `n` covers `[n, n + 1)`), then
    /// clamped into `min_zoom..=max_zoom`. `NaN` maps to `min_zoom`.
    pub fn limit_zoom(&self, zoom: f64) -> u8 {
        let min = self.options.min_zoom;
        let max = self.options.max_zoom;
        if zoom.is_nan() {
            return min;
        }
        zoom.floor().clamp(f64::from(min), f64::from(max)) as u8
    }

    /// Features visible in `bbox` at `zoom`.
    ///
    /// Clusters are placed at the weighted centroid of their members; points
    /// keep their original coordinates. Results are ordered by their position
    /// in the level, so repeated calls on the same index return identical
    /// lists.
    pub fn get_clusters(&self, bbox: &BBox, zoom: f64) -> Result<Vec<Feature>> {
        validate_bbox(bbox)?;

        let level = self.level(self.limit_zoom(zoom));
        let ids = visible_ids(level, bbox);

        Ok(ids
            .into_iter()
            .map(|i| self.node_feature(&level.nodes[i]))
            .collect())
    }

    /// Immediate children of a cluster, one zoom level finer.
    pub fn get_children(&self, cluster_id: u64) -> Result<Vec<Feature>> {
        Ok(self
            .child_nodes(cluster_id)?
            .into_iter()
            .map(|node| self.node_feature(node))
            .collect())
    }

    /// Original points inside a cluster, paginated with `limit` and `offset`.
    pub fn get_leaves(&self, cluster_id: u64, limit: usize, offset: usize) -> Result<Vec<Feature>> {
        let mut leaves = Vec::new();
        if limit == 0 {
            // Still reject unknown ids.
            self.resolve(cluster_id)?;
            return Ok(leaves);
        }
        self.append_leaves(&mut leaves, cluster_id, limit, offset, 0)?;
        Ok(leaves)
    }

    /// Smallest zoom at which the cluster breaks into more than one feature.
    pub fn get_cluster_expansion_zoom(&self, cluster_id: u64) -> Result<u8> {
        let (_, origin_zoom) = self.resolve(cluster_id)?;
        let mut expansion = origin_zoom - 1;
        let mut current = cluster_id;

        while expansion < self.options.max_zoom {
            let children = self.child_nodes(current)?;
            expansion += 1;
            match children.as_slice() {
                [only] => match only.kind {
                    NodeKind::Cluster(id) => current = id,
                    NodeKind::Leaf(_) => break,
                },
                _ => break,
            }
        }

        Ok(expansion)
    }

    /// Validate a cluster id against this index, returning its origin node
    /// index and the zoom of the level holding that origin.
    fn resolve(&self, cluster_id: u64) -> Result<(usize, u8)> {
        let unknown = || ClusterError::UnknownCluster(cluster_id);
        let (origin_index, origin_zoom) =
            decode_cluster_id(cluster_id, self.records.len()).ok_or_else(unknown)?;

        if origin_zoom <= self.options.min_zoom || origin_zoom > self.options.max_zoom {
            return Err(unknown());
        }

        let origin = self
            .level(origin_zoom)
            .nodes
            .get(origin_index)
            .ok_or_else(unknown)?;

        if origin.parent_id != Some(cluster_id) {
            return Err(unknown());
        }

        Ok((origin_index, origin_zoom))
    }

    fn child_nodes(&self, cluster_id: u64) -> Result<Vec<&Node>> {
        let (origin_index, origin_zoom) = self.resolve(cluster_id)?;
        let level = self.level(origin_zoom);
        let origin = &level.nodes[origin_index];
        let radius = self.options.radius_at(origin_zoom - 1);

        let children: Vec<&Node> = level
            .within(origin.x, origin.y, radius)
            .into_iter()
            .map(|j| &level.nodes[j])
            .filter(|node| node.parent_id == Some(cluster_id))
            .collect();

        if children.is_empty() {
            return Err(ClusterError::UnknownCluster(cluster_id));
        }
        Ok(children)
    }

    fn append_leaves(
        &self,
        leaves: &mut Vec<Feature>,
        cluster_id: u64,
        limit: usize,
        offset: usize,
        mut skipped: usize,
    ) -> Result<usize> {
        for child in self.child_nodes(cluster_id)? {
            match child.kind {
                NodeKind::Cluster(id) => {
                    if skipped + child.num_points <= offset {
                        skipped += child.num_points;
                    } else {
                        skipped = self.append_leaves(leaves, id, limit, offset, skipped)?;
                    }
                }
                NodeKind::Leaf(i) => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        leaves.push(Feature::point(&self.records[i]));
                    }
                }
            }

            if leaves.len() == limit {
                break;
            }
        }

        Ok(skipped)
    }

    fn node_feature(&self, node: &Node) -> Feature {
        match node.kind {
            NodeKind::Leaf(i) => Feature::point(&self.records[i]),
            NodeKind::Cluster(id) => {
                let [lng, lat] = unproject(node.x, node.y);
                Feature::cluster(
                    lng,
                    lat,
                    ClusterProperties {
                        cluster: true,
                        cluster_id: id,
                        point_count: node.num_points,
                        point_count_abbreviated: AbbreviatedCount::from_count(node.num_points),
                        visited_count: node.tally.visited,
                        bucket_list_count: node.tally.bucket_list,
                        dominant_status: node.tally.dominant(),
                    },
                )
            }
        }
    }
}

/// Node indices inside a geographic viewport, sorted.
///
/// Longitudes wrap; a box spanning 360° or more covers the world and a box
/// whose west edge lies east of its east edge is split at the antimeridian.
fn visible_ids(level: &Level, bbox: &BBox) -> Vec<usize> {
    let min_lat = bbox.min_lat.clamp(-90.0, 90.0);
    let max_lat = bbox.max_lat.clamp(-90.0, 90.0);

    let (min_lng, max_lng) = if bbox.max_lng - bbox.min_lng >= 360.0 {
        (-180.0, 180.0)
    } else {
        let min_lng = wrap_lng(bbox.min_lng);
        let max_lng = if bbox.max_lng == 180.0 {
            180.0
        } else {
            wrap_lng(bbox.max_lng)
        };
        (min_lng, max_lng)
    };

    let range = |west: f64, east: f64| {
        level.range(lng_x(west), lat_y(max_lat), lng_x(east), lat_y(min_lat))
    };

    let mut ids = if min_lng > max_lng {
        log::trace!("Splitting viewport at the antimeridian");
        let mut ids = range(min_lng, 180.0);
        ids.extend(range(-180.0, max_lng));
        ids
    } else {
        range(min_lng, max_lng)
    };

    ids.sort_unstable();
    ids.dedup();
    ids
}
