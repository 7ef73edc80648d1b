//! Clustering math kept apart from the index structure.
//!
//! - Status map/reduce and dominant-status derivation
//! - Web Mercator projection into normalized tile space
//! - Input validation
//! - GeoJSON interop

pub mod aggregate;
pub mod geojson;
pub mod projection;
pub mod validation;
