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

//! The arcs module contains the `GreatCircleArc` type and functions for
//! testing whether a point lies on a great circle arc and for calculating
//! the extreme latitudes of a great circle arc.
//!
//! A point is tested against an arc in two stages:
//!
//! 1. the point must lie in the plane of the arc's great circle, i.e. it
//!    must be orthogonal to the arc's pole;
//! 2. the arc is classified by its longitudes and latitudes, see `ArcClass`,
//!    and the point's longitude or latitude is tested against the range
//!    of the arc for that class.

use crate::computing::{angle_of_2_vectors, cross, dot, in_between, isclose};
use crate::coordinates::{normalize_xyz, xyz_to_lonlat, LonLat};
use crate::{Error, Radians, Tolerances, Validate, Vector3d, DEFAULT_TOLERANCES};
use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::str::FromStr;

/// The extreme latitude of a great circle arc to calculate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtremeType {
    /// The maximum (most northerly) latitude.
    Max,
    /// The minimum (most southerly) latitude.
    Min,
}

impl FromStr for ExtremeType {
    type Err = Error;

    /// Parse "max" or "min", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(Self::Max)
        } else if s.eq_ignore_ascii_case("min") {
            Ok(Self::Min)
        } else {
            Err(Error::InvalidArgument(
                "extreme_type must be either 'max' or 'min'",
            ))
        }
    }
}

/// The classification of a great circle arc for point membership tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcClass {
    /// Both points have the same longitude.
    Meridian,
    /// The points are 180° of longitude apart or a point is at a pole,
    /// so the arc passes over or ends at a pole.
    PoleCrossing,
    /// The arc crosses the 0°/360° longitude.
    AntimeridianCrossing,
    /// The arc spans the longitudes between its points.
    Direct,
}

/// A great circle arc on the unit sphere between a pair of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreatCircleArc {
    /// The start point.
    a: Vector3d,
    /// The end point.
    b: Vector3d,
}

impl GreatCircleArc {
    /// Constructor.
    /// * `a` - the start point, on the unit sphere.
    /// * `b` - the end point, on the unit sphere.
    #[must_use]
    pub const fn new(a: Vector3d, b: Vector3d) -> Self {
        Self { a, b }
    }

    /// Construct a `GreatCircleArc` between a pair of positions.
    /// * `a` - the start position.
    /// * `b` - the end position.
    #[must_use]
    pub fn between_positions(a: &LonLat, b: &LonLat) -> Self {
        Self::new(Vector3d::from(a), Vector3d::from(b))
    }

    /// The start point of the arc.
    #[must_use]
    pub const fn a(&self) -> Vector3d {
        self.a
    }

    /// The end point of the arc.
    #[must_use]
    pub const fn b(&self) -> Vector3d {
        self.b
    }

    /// The reversed arc, from `b` to `a`.
    #[must_use]
    pub const fn reverse(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// The length of the arc, i.e. the angle between its points.
    #[must_use]
    pub fn length(&self) -> Radians {
        angle_of_2_vectors(&self.a, &self.b)
    }

    /// The (unnormalized) right hand pole of the arc's great circle.
    #[must_use]
    pub fn pole(&self) -> Vector3d {
        cross(&self.a, &self.b)
    }

    /// Whether the arc's points are antipodal, i.e. the arc is 180° long
    /// to within `machine_epsilon` and has no unique great circle.
    #[must_use]
    pub fn is_degenerate(&self, tolerances: &Tolerances) -> bool {
        isclose(self.length().0, PI, 0.0, tolerances.machine_epsilon())
    }

    /// Classify the arc, see `ArcClass`.
    /// * `directed` - whether the arc runs from `a` to `b`, otherwise it is
    ///   the minor arc between them.
    /// * `tolerances` - the comparison tolerances.
    #[must_use]
    pub fn classify(&self, directed: bool, tolerances: &Tolerances) -> ArcClass {
        classify_positions(
            &LonLat::from(&self.a),
            &LonLat::from(&self.b),
            directed,
            tolerances,
        )
    }

    /// Test whether a point lies on the arc.
    /// * `point` - the point, on the unit sphere.
    /// * `directed` - whether the arc runs from `a` to `b`, otherwise it is
    ///   the minor arc between them.
    /// * `tolerances` - the comparison tolerances.
    ///
    /// returns true if the point lies on the arc, false otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the `tolerances` are not valid.
    /// Returns `Error::DegenerateArc` if the arc's points are antipodal.
    /// Returns `Error::ArcTooLong` if `directed` and the arc spans 180° or
    /// more of longitude.
    pub fn contains_point(
        &self,
        point: &Vector3d,
        directed: bool,
        tolerances: &Tolerances,
    ) -> Result<bool, Error> {
        validate_tolerances(tolerances)?;

        if self.is_degenerate(tolerances) {
            tracing::debug!(length = self.length().0, "great circle arc is degenerate");
            return Err(Error::DegenerateArc);
        }

        let machine_epsilon = tolerances.machine_epsilon();
        if !isclose(
            dot(&self.pole(), point),
            0.0,
            machine_epsilon,
            machine_epsilon,
        ) {
            return Ok(false);
        }

        let v0 = LonLat::from(&self.a);
        let v1 = LonLat::from(&self.b);
        let pt = LonLat::from(point);
        let class = classify_positions(&v0, &v1, directed, tolerances);
        tracing::trace!(?class, directed, "classified great circle arc");

        match class {
            ArcClass::Meridian => Ok(meridian_contains(&v0, &v1, &pt, tolerances)),
            ArcClass::PoleCrossing => pole_crossing_contains(&v0, &v1, &pt, directed, tolerances),
            ArcClass::AntimeridianCrossing => {
                antimeridian_crossing_contains(&v0, &v1, &pt, directed)
            }
            ArcClass::Direct => Ok(in_between(v0.lon().0, pt.lon().0, v1.lon().0)),
        }
    }

    /// Test whether each of a sequence of points lies on the arc.
    /// * `points` - the points, on the unit sphere.
    /// * `directed` - whether the arc runs from `a` to `b`.
    /// * `tolerances` - the comparison tolerances.
    ///
    /// returns an iterator over the results of `contains_point` for each point.
    pub fn contains_points<'a, I>(
        &'a self,
        points: I,
        directed: bool,
        tolerances: &'a Tolerances,
    ) -> impl Iterator<Item = Result<bool, Error>> + 'a
    where
        I: IntoIterator<Item = &'a Vector3d>,
        I::IntoIter: 'a,
    {
        points
            .into_iter()
            .map(move |point| self.contains_point(point, directed, tolerances))
    }

    /// Calculate the maximum or minimum latitude reached along the arc.
    ///
    /// The latitude along a great circle arc may exceed the latitudes of
    /// both of its points, so the critical point of z along the arc is
    /// found by solving d/dt z((1 - t) * a + t * b) = 0 for t.
    /// * `extreme_type` - whether to calculate the maximum or minimum.
    /// * `tolerances` - the comparison tolerances.
    ///
    /// returns the extreme latitude in the range [-π/2, π/2].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the `tolerances` are not valid or
    /// a point of the arc cannot be normalized.
    pub fn extreme_latitude(
        &self,
        extreme_type: ExtremeType,
        tolerances: &Tolerances,
    ) -> Result<Radians, Error> {
        validate_tolerances(tolerances)?;

        let (n1, n2) = (&self.a, &self.b);
        let d = dot(n1, n2);
        let t = (n1.z * d - n2.z) / ((n1.z + n2.z) * (d - 1.0));

        let error_tolerance = tolerances.error_tolerance();
        let t = if isclose(t, 0.0, 0.0, error_tolerance) {
            0.0
        } else if isclose(t, 1.0, 0.0, error_tolerance) {
            1.0
        } else {
            t
        };

        let lat1 = xyz_to_lonlat(n1.x, n1.y, n1.z, true)?.lat().0;
        let lat2 = xyz_to_lonlat(n2.x, n2.y, n2.z, true)?.lat().0;

        // t is NaN when the points are coincident or both on the Equator
        let candidate = if 0.0 < t && t < 1.0 {
            let node = n1.scale(1.0 - t) + n2.scale(t);
            let node = normalize_xyz(node.x, node.y, node.z)?;
            libm::asin(node.z.clamp(-1.0, 1.0))
        } else {
            lat1
        };

        let latitude = match extreme_type {
            ExtremeType::Max => candidate.max(lat1).max(lat2),
            ExtremeType::Min => candidate.min(lat1).min(lat2),
        };
        Ok(Radians(latitude))
    }
}

/// Check that `tolerances` satisfy 0 < `machine_epsilon` <= `error_tolerance`.
pub(crate) fn validate_tolerances(tolerances: &Tolerances) -> Result<(), Error> {
    if tolerances.is_valid() {
        Ok(())
    } else {
        tracing::debug!(?tolerances, "invalid tolerances");
        Err(Error::InvalidArgument(
            "tolerances must satisfy 0 < machine_epsilon <= error_tolerance",
        ))
    }
}

/// Whether a latitude is at a pole.
fn is_at_pole(lat: f64, rtol: f64, atol: f64) -> bool {
    isclose(libm::fabs(lat), FRAC_PI_2, rtol, atol)
}

/// The angular distance from `lat1` over the pole on its side of the
/// Equator and on to `lat2`.
fn latitude_extension(lat1: f64, lat2: f64) -> f64 {
    libm::fabs(FRAC_PI_2 - libm::fabs(lat1)) + FRAC_PI_2 + libm::fabs(lat2)
}

/// Decide which pole the minor arc between a pair of latitudes passes
/// nearest, given that the arc spans 180° or more of longitude.
///
/// The path over the North pole is π - (`lat1` + `lat2`) long and the path
/// over the South pole is π + (`lat1` + `lat2`) long, so the minor arc
/// passes over the North pole unless the latitudes sum to less than zero.
/// The decision is symmetric in `lat1` and `lat2`, including when a point is
/// on the Equator.
/// * `lat1`, `lat2` - the latitudes of the arc points.
///
/// returns the latitude of the North pole (π/2) or the South pole (-π/2).
///
/// # Examples
/// ```
/// use gca_geometry::arcs::decide_pole_latitude;
/// use gca_geometry::Radians;
/// use core::f64::consts::FRAC_PI_2;
///
/// let lat1 = Radians(f64::to_radians(60.0));
/// let lat2 = Radians(f64::to_radians(-30.0));
/// assert_eq!(FRAC_PI_2, decide_pole_latitude(lat1, lat2).0);
/// assert_eq!(FRAC_PI_2, decide_pole_latitude(lat2, lat1).0);
///
/// let equator = Radians(0.0);
/// assert_eq!(-FRAC_PI_2, decide_pole_latitude(equator, lat2).0);
/// assert_eq!(-FRAC_PI_2, decide_pole_latitude(lat2, equator).0);
/// ```
#[must_use]
pub fn decide_pole_latitude(lat1: Radians, lat2: Radians) -> Radians {
    if 0.0 <= lat1.0 + lat2.0 {
        Radians(FRAC_PI_2)
    } else {
        Radians(-FRAC_PI_2)
    }
}

/// Classify an arc from the positions of its points.
fn classify_positions(
    v0: &LonLat,
    v1: &LonLat,
    directed: bool,
    tolerances: &Tolerances,
) -> ArcClass {
    let machine_epsilon = tolerances.machine_epsilon();
    let error_tolerance = tolerances.error_tolerance();
    let (lon0, lon1) = (v0.lon().0, v1.lon().0);

    if isclose(lon0, lon1, machine_epsilon, machine_epsilon) {
        return ArcClass::Meridian;
    }

    let delta_lon = libm::fabs(lon1 - lon0);
    if isclose(delta_lon, PI, 0.0, machine_epsilon)
        || is_at_pole(v0.lat().0, error_tolerance, error_tolerance)
        || is_at_pole(v1.lat().0, error_tolerance, error_tolerance)
    {
        ArcClass::PoleCrossing
    } else if (directed && PI < delta_lon) || (!directed && PI <= delta_lon) {
        ArcClass::AntimeridianCrossing
    } else {
        ArcClass::Direct
    }
}

/// Whether a point on the plane of a meridian arc lies on the arc.
fn meridian_contains(v0: &LonLat, v1: &LonLat, pt: &LonLat, tolerances: &Tolerances) -> bool {
    let machine_epsilon = tolerances.machine_epsilon();
    isclose(v0.lon().0, pt.lon().0, machine_epsilon, machine_epsilon)
        && in_between(v0.lat().0, pt.lat().0, v1.lat().0)
}

/// Whether a point on the plane of a pole crossing arc lies on the arc.
///
/// The point's latitude is tested against the latitudes from each arc point
/// to the pole, but not against the meridian of that leg. So a point on the
/// first leg's meridian with a latitude between the second point's latitude
/// and the pole is also reported as on the arc: e.g. (0°, 30°) is reported
/// as on the arc from (0°, 60°) over the North pole to (180°, 30°).
fn pole_crossing_contains(
    v0: &LonLat,
    v1: &LonLat,
    pt: &LonLat,
    directed: bool,
    tolerances: &Tolerances,
) -> Result<bool, Error> {
    let error_tolerance = tolerances.error_tolerance();
    let (lon0, lat0) = (v0.lon().0, v0.lat().0);
    let (lon1, lat1) = (v1.lon().0, v1.lat().0);
    let pt_lat = pt.lat().0;

    let v0_at_pole = is_at_pole(lat0, error_tolerance, 0.0);
    let v1_at_pole = is_at_pole(lat1, error_tolerance, 0.0);
    let non_pole_lon = if !v0_at_pole {
        Some(lon0)
    } else if !v1_at_pole {
        Some(lon1)
    } else {
        None
    };

    // the longitude of a point at a pole is arbitrary
    let pt_lon = if is_at_pole(pt_lat, error_tolerance, error_tolerance) {
        non_pole_lon.unwrap_or(lon0)
    } else {
        pt.lon().0
    };

    if (v0_at_pole || v1_at_pole)
        && non_pole_lon.is_some_and(|lon| !isclose(lon, pt_lon, error_tolerance, 0.0))
    {
        return Ok(false);
    }

    if !isclose(lon0, pt_lon, error_tolerance, 0.0) && !isclose(lon1, pt_lon, error_tolerance, 0.0)
    {
        return Ok(false);
    }

    let same_hemisphere = (0.0 < lat0 && 0.0 < lat1) || (lat0 < 0.0 && lat1 < 0.0);
    let pole_lat = if same_hemisphere {
        if 0.0 < lat0 {
            FRAC_PI_2
        } else {
            -FRAC_PI_2
        }
    } else {
        decide_pole_latitude(Radians(lat0), Radians(lat1)).0
    };

    let lat_extend = latitude_extension(lat0, lat1);
    if directed && PI <= lat_extend {
        tracing::debug!(lat_extend, "directed great circle arc over a pole is too long");
        return Err(Error::ArcTooLong);
    }

    Ok(in_between(lat0, pt_lat, pole_lat) || in_between(pole_lat, pt_lat, lat1))
}

/// Whether a point on the plane of an antimeridian crossing arc lies on the arc.
fn antimeridian_crossing_contains(
    v0: &LonLat,
    v1: &LonLat,
    pt: &LonLat,
    directed: bool,
) -> Result<bool, Error> {
    let (lon0, lon1) = (v0.lon().0, v1.lon().0);
    let pt_lon = pt.lon().0;

    if directed {
        // eastwards from lon0 to lon1 through 180° is longer than 180°
        if lon0 <= PI && PI <= lon1 {
            tracing::debug!(lon0, lon1, "directed great circle arc is too long");
            return Err(Error::ArcTooLong);
        }
        Ok(in_between(lon0, pt_lon, TAU) || in_between(0.0, pt_lon, lon1))
    } else {
        let (lo, hi) = if lon0 <= lon1 {
            (lon0, lon1)
        } else {
            (lon1, lon0)
        };
        Ok(in_between(hi, pt_lon, TAU) || in_between(0.0, pt_lon, lo))
    }
}

/// Test whether a point lies on a great circle arc, using the
/// `DEFAULT_TOLERANCES`.
/// * `point` - the point, on the unit sphere.
/// * `arc` - the great circle arc.
/// * `directed` - whether the arc runs from its start point to its end
///   point, otherwise it is the minor arc between them.
///
/// # Errors
///
/// Returns `Error::DegenerateArc` if the arc's points are antipodal.
/// Returns `Error::ArcTooLong` if `directed` and the arc spans 180° or
/// more of longitude.
///
/// # Examples
/// ```
/// use gca_geometry::{point_within_gca, GreatCircleArc, Vector3d};
///
/// let arc = GreatCircleArc::new(Vector3d::new(1.0, 0.0, 0.0), Vector3d::new(0.0, 1.0, 0.0));
/// let point = Vector3d::new(core::f64::consts::FRAC_1_SQRT_2, core::f64::consts::FRAC_1_SQRT_2, 0.0);
/// assert_eq!(Ok(true), point_within_gca(&point, &arc, false));
/// assert_eq!(Ok(false), point_within_gca(&-point, &arc, false));
/// ```
pub fn point_within_gca(
    point: &Vector3d,
    arc: &GreatCircleArc,
    directed: bool,
) -> Result<bool, Error> {
    arc.contains_point(point, directed, &DEFAULT_TOLERANCES)
}

/// Calculate the maximum or minimum latitude reached along a great circle
/// arc, using the `DEFAULT_TOLERANCES`.
/// * `arc` - the great circle arc.
/// * `extreme_type` - whether to calculate the maximum or minimum.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if a point of the arc cannot be
/// normalized.
pub fn extreme_gca_latitude(arc: &GreatCircleArc, extreme_type: ExtremeType) -> Result<Radians, Error> {
    arc.extreme_latitude(extreme_type, &DEFAULT_TOLERANCES)
}
