//! Spherical Web-Mercator projection onto the unit square.
//!
//! Longitude maps linearly to `x` in `[0, 1]`; latitude maps to `y` in `[0, 1]`
//! with `y = 0` at the northern edge, matching tile coordinates. Latitudes
//! beyond the Mercator limit (about ±85.05°) clamp to the edges.

use std::f64::consts::PI;

pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Wrap a longitude into `[-180, 180)`.
pub fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}
