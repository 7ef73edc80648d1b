//! Spherical Web Mercator projection into the unit square.
//!
//! Clustering runs in normalized tile space where the whole world spans
//! `0.0..=1.0` on both axes, `x` growing east and `y` growing south. In this
//! space a pixel radius at zoom `z` is simply `radius / (extent * 2^z)`.

use std::f64::consts::PI;

/// Longitude in degrees to normalized x.
#[inline]
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude in degrees to normalized y, clamped to the square at the poles.
#[inline]
pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Normalized x back to longitude in degrees.
#[inline]
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Normalized y back to latitude in degrees.
#[inline]
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Project `[lng, lat]` into `[x, y]`.
#[inline]
pub fn project(lng: f64, lat: f64) -> [f64; 2] {
    [lng_x(lng), lat_y(lat)]
}

/// Inverse of [`project`].
#[inline]
pub fn unproject(x: f64, y: f64) -> [f64; 2] {
    [x_lng(x), y_lat(y)]
}

/// Wrap a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}
