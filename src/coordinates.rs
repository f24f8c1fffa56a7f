// Copyright (c) 2024-2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The coordinates module contains types and functions for converting
//! between Cartesian coordinates on the unit sphere and longitude, latitude
//! pairs in radians.

use crate::{computing, Error, Radians, Validate, Vector3d};
use angle_sc::Angle;
use core::f64::consts::{FRAC_PI_2, TAU};
use unit_sphere::{great_circle, vector};

/// A position on the unit sphere as a longitude, latitude pair in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LonLat {
    /// The longitude, in the range [0, 2π).
    lon: Radians,
    /// The latitude, in the range [-π/2, π/2].
    lat: Radians,
}

impl Validate for LonLat {
    /// Test whether a `LonLat` is valid.
    /// Whether 0 <= `lon` < 2π and |`lat`| <= π/2.
    fn is_valid(&self) -> bool {
        (0.0..TAU).contains(&self.lon.0) && libm::fabs(self.lat.0) <= FRAC_PI_2
    }
}

impl LonLat {
    /// Constructor, the longitude is normalized into the range [0, 2π).
    /// * `lon` - the longitude.
    /// * `lat` - the latitude.
    #[must_use]
    pub fn new(lon: Radians, lat: Radians) -> Self {
        Self {
            lon: Radians(normalize_longitude(lon.0)),
            lat,
        }
    }

    /// The longitude, in the range [0, 2π).
    #[must_use]
    pub const fn lon(&self) -> Radians {
        self.lon
    }

    /// The latitude, in the range [-π/2, π/2].
    #[must_use]
    pub const fn lat(&self) -> Radians {
        self.lat
    }
}

impl From<&Vector3d> for LonLat {
    /// Convert a point on the unit sphere to a `LonLat`.
    /// The point is not normalized, but its z coordinate is clamped to the
    /// range [-1, 1], see `xyz_to_lonlat`.
    fn from(point: &Vector3d) -> Self {
        let point = Vector3d::new(point.x, point.y, point.z.clamp(-1.0, 1.0));
        Self {
            lon: Radians(normalize_longitude(
                Radians::from(vector::longitude(&point)).0,
            )),
            lat: Radians::from(vector::latitude(&point)),
        }
    }
}

impl From<&LonLat> for Vector3d {
    fn from(position: &LonLat) -> Self {
        lonlat_to_xyz(position.lon, position.lat)
    }
}

/// Normalize a longitude into the range [0, 2π).
/// * `lon` - the longitude in radians.
///
/// # Examples
/// ```
/// use gca_geometry::coordinates::normalize_longitude;
/// use core::f64::consts::{FRAC_PI_2, PI};
///
/// assert_eq!(3.0 * FRAC_PI_2, normalize_longitude(-FRAC_PI_2));
/// assert_eq!(0.0, normalize_longitude(2.0 * PI));
/// ```
#[must_use]
pub fn normalize_longitude(lon: f64) -> f64 {
    let lon = libm::fmod(lon, TAU);
    let lon = if lon < 0.0 { lon + TAU } else { lon };
    // a tiny negative longitude rounds up to 2π
    if lon < TAU {
        lon
    } else {
        0.0
    }
}

/// Normalize a vector to unit length.
/// * `x`, `y`, `z` - the Cartesian coordinates.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the vector has zero length or is
/// not finite.
pub fn normalize_xyz(x: f64, y: f64, z: f64) -> Result<Vector3d, Error> {
    let v = Vector3d::new(x, y, z);
    let length = computing::norm(&v);
    if length.is_finite() && 0.0 < length {
        Ok(v.unscale(length))
    } else {
        Err(Error::InvalidArgument("cannot normalize a zero length vector"))
    }
}

/// Convert Cartesian coordinates to a longitude, latitude pair.
/// * `x`, `y`, `z` - the Cartesian coordinates.
/// * `normalize` - whether to normalize the coordinates to the unit sphere
///   first, otherwise they are assumed to be on the unit sphere.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `normalize` is true and the
/// coordinates cannot be normalized.
///
/// # Examples
/// ```
/// use gca_geometry::coordinates::xyz_to_lonlat;
/// use core::f64::consts::FRAC_PI_2;
///
/// let position = xyz_to_lonlat(0.0, -2.0, 0.0, true).unwrap();
/// assert_eq!(3.0 * FRAC_PI_2, position.lon().0);
/// assert_eq!(0.0, position.lat().0);
/// ```
pub fn xyz_to_lonlat(x: f64, y: f64, z: f64, normalize: bool) -> Result<LonLat, Error> {
    let point = if normalize {
        normalize_xyz(x, y, z)?
    } else {
        Vector3d::new(x, y, z)
    };
    Ok(LonLat::from(&point))
}

/// Convert a longitude, latitude pair to a point on the unit sphere.
/// * `lon` - the longitude.
/// * `lat` - the latitude.
#[must_use]
pub fn lonlat_to_xyz(lon: Radians, lat: Radians) -> Vector3d {
    vector::to_point(Angle::from(lat), Angle::from(lon))
}

/// Construct a Cartesian point from a slice of coordinates.
/// * `values` - the x, y and z coordinates.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` unless `values` has exactly three
/// elements.
pub fn cartesian_from_slice(values: &[f64]) -> Result<Vector3d, Error> {
    match values {
        [x, y, z] => Ok(Vector3d::new(*x, *y, *z)),
        _ => Err(Error::InvalidArgument(
            "a Cartesian point must have three coordinates",
        )),
    }
}

/// Calculate the great circle distance between a pair of positions using
/// the haversine formula.
/// * `a`, `b` - the positions.
///
/// returns the distance on the unit sphere in radians.
#[must_use]
pub fn haversine_distance(a: &LonLat, b: &LonLat) -> Radians {
    great_circle::calculate_gc_distance(
        Angle::from(a.lat),
        Angle::from(b.lat),
        Angle::from(Radians(b.lon.0 - a.lon.0)),
    )
}
