//! Hierarchical marker clustering for map front-ends, with per-cluster
//! visit-status tallies.
//!
//! ```rust
//! use geocluster::{BBox, ClusterIndex, ClusterOptions, PointRecord, Status};
//!
//! let records = vec![
//!     PointRecord::new("a", -73.9857, 40.7484, Status::Visited),
//!     PointRecord::new("b", -73.9856, 40.7485, Status::BucketList),
//! ];
//! let index = ClusterIndex::build(records, ClusterOptions::default())?;
//!
//! let features = index.get_clusters(&BBox::world(), 3.0)?;
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].point_count(), 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;

pub use builder::ClusterIndexBuilder;
pub use config::{ClusterOptions, MAX_ZOOM_LIMIT};
pub use engine::ClusterEngine;
pub use error::{ClusterError, Result};
pub use index::ClusterIndex;

pub use compute::aggregate::StatusTally;
pub use compute::geojson::{features_to_collection, features_to_geojson_string, records_from_geojson};

pub use geo::Point;

pub use geocluster_types::{
    AbbreviatedCount, BBox, ClusterProperties, Feature, FeatureProperties, IndexStats,
    PointGeometry, PointProperties, PointRecord, Status,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterEngine, ClusterError, ClusterIndex, ClusterIndexBuilder, Result};

    pub use crate::{ClusterOptions, StatusTally};

    pub use crate::{BBox, Feature, IndexStats, PointRecord, Status};

    pub use geo::Point;
}
