//! Great-circle geometry on a spherical Earth.
//!
//! Positions are [`LatLng`] pairs in degrees. Bearings are [`Quantity`]
//! angles measured clockwise from true north and normalised to `[0, 360)`
//! degrees; distances are lengths in metres. [`heading`], [`offset`] and
//! [`distance`] use the same sphere and are mutually consistent:
//! `distance(a, offset(a, d, b)) == d` up to rounding for `d` below half the
//! circumference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantity::{Quantity, UnitMismatch, units};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine values this close to 1 count as antipodal.
const ANTIPODAL_EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the spherical helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// Latitude outside `[-90, 90]` or longitude outside `[-180, 180]`.
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Every direction leads from a point to its antipode.
    #[error("heading between antipodal points {from} and {to} is undefined")]
    Antipodal { from: LatLng, to: LatLng },

    /// A distance or bearing argument had the wrong dimension.
    #[error(transparent)]
    Unit(#[from] UnitMismatch),
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are in range. NaN is never valid.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Reject NaN and out-of-range components.
    pub fn validate(&self) -> Result<(), GeoError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    fn radians(&self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lng)
    }
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Wrap an angle in degrees to `[0, 360)`.
pub fn wrap_360(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an angle in degrees to `[-180, 180)`.
pub fn wrap_180(degrees: f64) -> f64 {
    wrap_360(degrees + 180.0) - 180.0
}

/// A bearing quantity normalised to `[0, 360)` degrees.
pub fn bearing_degrees(degrees: f64) -> Quantity {
    Quantity::new(wrap_360(degrees), units::DEGREE)
}

/// Haversine of the central angle between two points, in `[0, 1]`.
fn haversine(a: &LatLng, b: &LatLng) -> f64 {
    let (lat1, lng1) = a.radians();
    let (lat2, lng2) = b.radians();
    let sin_dlat = ((lat2 - lat1) / 2.0).sin();
    let sin_dlng = ((lng2 - lng1) / 2.0).sin();
    (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng).clamp(0.0, 1.0)
}

/// Central angle between two points, in radians.
fn central_angle(a: &LatLng, b: &LatLng) -> f64 {
    2.0 * haversine(a, b).sqrt().asin()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Initial bearing of the shorter great-circle path from `from` to `to`.
///
/// Coincident points have a heading of 0 degrees. Antipodal points have no
/// defined heading and fail with [`GeoError::Antipodal`].
pub fn heading(from: &LatLng, to: &LatLng) -> Result<Quantity, GeoError> {
    from.validate()?;
    to.validate()?;
    if 1.0 - haversine(from, to) < ANTIPODAL_EPSILON {
        return Err(GeoError::Antipodal {
            from: *from,
            to: *to,
        });
    }
    let (lat1, lng1) = from.radians();
    let (lat2, lng2) = to.radians();
    let dlng = lng2 - lng1;
    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    if x == 0.0 && y == 0.0 {
        return Ok(bearing_degrees(0.0));
    }
    Ok(bearing_degrees(y.atan2(x).to_degrees()))
}

/// The point reached by travelling `distance` along the great circle that
/// leaves `origin` at `bearing`.
pub fn offset(origin: &LatLng, distance: &Quantity, bearing: &Quantity) -> Result<LatLng, GeoError> {
    origin.validate()?;
    let metres = distance.value_in(&units::METRE)?;
    let theta = bearing.value_in(&units::RADIAN)?;
    if metres == 0.0 {
        return Ok(*origin);
    }

    let delta = metres / EARTH_RADIUS_M;
    let (lat1, lng1) = origin.radians();
    let sin_lat2 =
        (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lng2 = lng1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    Ok(LatLng::new(lat2.to_degrees(), wrap_180(lng2.to_degrees())))
}

/// Great-circle distance between two points, in metres.
pub fn distance(a: &LatLng, b: &LatLng) -> Result<Quantity, GeoError> {
    a.validate()?;
    b.validate()?;
    Ok(Quantity::new(
        central_angle(a, b) * EARTH_RADIUS_M,
        units::METRE,
    ))
}
