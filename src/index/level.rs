//! One zoom level of the cluster hierarchy.
//!
//! A level owns its nodes (points and clusters visible at that zoom) and an
//! R*-tree over their projected positions. Clustering level `z` reads level
//! `z + 1`, records each absorbed node's parent id there, and emits the node
//! list for `z`.

use crate::compute::aggregate::StatusTally;
use crate::config::ClusterOptions;
use geocluster_types::point::PointRecord;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use smallvec::SmallVec;

use crate::compute::projection::project;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Index into the record list
    Leaf(usize),
    /// Cluster id, unique within the index
    Cluster(u64),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Projected position (weighted centroid for clusters)
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
    pub num_points: usize,
    pub tally: StatusTally,
    /// Cluster this node was absorbed into one zoom level up (coarser)
    pub parent_id: Option<u64>,
}

impl Node {
    pub fn leaf(index: usize, record: &PointRecord) -> Self {
        let [x, y] = project(record.lng(), record.lat());
        Self {
            x,
            y,
            kind: NodeKind::Leaf(index),
            num_points: 1,
            tally: StatusTally::from_record(record),
            parent_id: None,
        }
    }

    /// Copy carried unchanged into the next coarser level.
    fn carried(&self) -> Self {
        Self {
            parent_id: None,
            ..self.clone()
        }
    }
}

type IndexedNode = GeomWithData<[f64; 2], usize>;

pub(crate) struct Level {
    pub zoom: u8,
    pub nodes: Vec<Node>,
    tree: RTree<IndexedNode>,
}

/// Encode a cluster id from its origin node and the level holding it.
///
/// Ids start at `point_count` so they never collide with record indices.
/// The low five bits carry the origin zoom.
#[inline]
pub(crate) fn encode_cluster_id(origin_index: usize, origin_zoom: u8, point_count: usize) -> u64 {
    ((origin_index as u64) << 5) + u64::from(origin_zoom) + point_count as u64
}

/// Inverse of [`encode_cluster_id`]; `None` for ids below `point_count`.
#[inline]
pub(crate) fn decode_cluster_id(cluster_id: u64, point_count: usize) -> Option<(usize, u8)> {
    let offset = cluster_id.checked_sub(point_count as u64)?;
    let origin_zoom = (offset % 32) as u8;
    let origin_index = usize::try_from(offset >> 5).ok()?;
    Some((origin_index, origin_zoom))
}

impl Level {
    pub fn new(zoom: u8, nodes: Vec<Node>) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GeomWithData::new([node.x, node.y], i))
            .collect();

        Self {
            zoom,
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Node indices within `radius` of `(x, y)`, in ascending order.
    pub fn within(&self, x: f64, y: f64, radius: f64) -> SmallVec<[usize; 16]> {
        let mut ids: SmallVec<[usize; 16]> = self
            .tree
            .locate_within_distance([x, y], radius * radius)
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Node indices inside a projected rectangle.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .collect()
    }

    /// Greedy radius merge producing the nodes for `zoom` (one level coarser).
    ///
    /// Nodes are visited in index order. An unclaimed node claims every
    /// unclaimed neighbor within the zoom's radius; if the group holds at least
    /// `min_points` points it becomes a cluster at the weighted centroid.
    /// Returns the new nodes and the number of clusters formed.
    pub fn cluster(
        &mut self,
        zoom: u8,
        options: &ClusterOptions,
        point_count: usize,
    ) -> (Vec<Node>, usize) {
        debug_assert_eq!(self.zoom, zoom + 1);

        let radius = options.radius_at(zoom);
        let mut claimed = vec![false; self.nodes.len()];
        let mut next = Vec::with_capacity(self.nodes.len());
        let mut formed = 0;

        for i in 0..self.nodes.len() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;

            let (x, y) = (self.nodes[i].x, self.nodes[i].y);
            let neighbors: SmallVec<[usize; 16]> = self
                .within(x, y, radius)
                .into_iter()
                .filter(|&j| !claimed[j])
                .collect();

            let origin_points = self.nodes[i].num_points;
            let num_points = origin_points
                + neighbors
                    .iter()
                    .map(|&j| self.nodes[j].num_points)
                    .sum::<usize>();

            if num_points > origin_points && num_points >= options.min_points {
                let id = encode_cluster_id(i, self.zoom, point_count);
                let mut wx = x * origin_points as f64;
                let mut wy = y * origin_points as f64;
                let mut tally = self.nodes[i].tally;

                for &j in &neighbors {
                    claimed[j] = true;
                    let member = &mut self.nodes[j];
                    wx += member.x * member.num_points as f64;
                    wy += member.y * member.num_points as f64;
                    tally.merge(&member.tally);
                    member.parent_id = Some(id);
                }
                self.nodes[i].parent_id = Some(id);

                next.push(Node {
                    x: wx / num_points as f64,
                    y: wy / num_points as f64,
                    kind: NodeKind::Cluster(id),
                    num_points,
                    tally,
                    parent_id: None,
                });
                formed += 1;
            } else {
                next.push(self.nodes[i].carried());

                // Too few to cluster: the neighbors stay individual, claimed
                // here so they are not reconsidered as origins.
                if num_points > 1 {
                    for &j in &neighbors {
                        claimed[j] = true;
                        next.push(self.nodes[j].carried());
                    }
                }
            }
        }

        (next, formed)
    }
}
