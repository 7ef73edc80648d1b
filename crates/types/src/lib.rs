//! # geocluster-types
//!
//! Data types shared by the geocluster index and its worker protocol.
//!
//! - **Input**: [`PointRecord`] with a [`Status`] label and optional tags
//! - **Viewport**: [`BBox`] in `[minLng, minLat, maxLng, maxLat]` order
//! - **Output**: [`Feature`] envelopes holding either cluster or point properties
//! - **Introspection**: [`IndexStats`]
//!
//! All types serialize with Serde into the JSON shapes map front-ends expect.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::bbox::BBox;
//! use geocluster_types::point::{PointRecord, Status};
//!
//! let record = PointRecord::new("yosemite", -119.5383, 37.8651, Status::Visited);
//! assert!(BBox::world().contains(record.lng(), record.lat()));
//! ```

pub mod bbox;
pub mod feature;
pub mod point;
pub mod stats;

pub use bbox::BBox;
pub use feature::{
    AbbreviatedCount, ClusterProperties, Feature, FeatureProperties, PointGeometry,
    PointProperties,
};
pub use point::{PointRecord, Status};
pub use stats::IndexStats;
