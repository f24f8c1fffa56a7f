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

//! The intersections module contains functions for calculating where a
//! great circle arc intersects another great circle arc and where it
//! intersects a circle of constant latitude.
//!
//! The great circles of a pair of arcs intersect at the points along the
//! cross product of their poles. Each point is tested with `contains_point`
//! to determine whether it lies on both arcs.
//!
//! A great circle intersects a circle of constant latitude at up to two
//! points, which are calculated in closed form and then refined with
//! Newton's method.

use crate::arcs::validate_tolerances;
use crate::computing::{allclose, cross, dot, norm};
use crate::{Error, GreatCircleArc, Tolerances, Vector3d, DEFAULT_TOLERANCES};

/// The points where a great circle arc intersects another curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    /// The curves do not intersect.
    None,
    /// The curves intersect at a single point.
    One(Vector3d),
    /// The curves intersect at two points.
    /// For a pair of coincident great circle arcs, they are the ends of the
    /// arc where the arcs overlap.
    Two(Vector3d, Vector3d),
}

impl Intersection {
    /// The number of intersection points.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Two(..) => 2,
        }
    }

    /// Whether there are no intersection points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The first intersection point, if any.
    #[must_use]
    pub fn first(&self) -> Option<Vector3d> {
        match self {
            Self::None => None,
            Self::One(a) | Self::Two(a, _) => Some(*a),
        }
    }

    /// Add a point, unless it is within `tolerance` of an existing point.
    fn with_point(self, point: Vector3d, tolerance: f64) -> Self {
        let is_close = |a: &Vector3d| allclose(a.as_slice(), point.as_slice(), 0.0, tolerance);
        match self {
            Self::None => Self::One(point),
            Self::One(a) if is_close(&a) => self,
            Self::One(a) => Self::Two(a, point),
            Self::Two(..) => self,
        }
    }
}

/// Calculate the intersection of a pair of undirected great circle arcs.
/// * `arc1`, `arc2` - the great circle arcs.
/// * `tolerances` - the comparison tolerances.
///
/// returns the intersection point, if any.
/// If the arcs are on the same great circle, it returns the ends of the
/// arc where they overlap.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the `tolerances` are not valid.
/// Returns `Error::DegenerateArc` if either arc's points are antipodal.
pub fn calculate_arc_intersection(
    arc1: &GreatCircleArc,
    arc2: &GreatCircleArc,
    tolerances: &Tolerances,
) -> Result<Intersection, Error> {
    validate_tolerances(tolerances)?;

    let cross_poles = cross(&arc1.pole(), &arc2.pole());
    let error_tolerance = tolerances.error_tolerance();

    if allclose(
        cross_poles.as_slice(),
        &[0.0; 3],
        0.0,
        tolerances.machine_epsilon(),
    ) {
        // the arcs are on the same great circle
        let mut result = Intersection::None;
        for (point, other) in [
            (arc1.a(), arc2),
            (arc1.b(), arc2),
            (arc2.a(), arc1),
            (arc2.b(), arc1),
        ] {
            if other.contains_point(&point, false, tolerances)? {
                result = result.with_point(point, error_tolerance);
            }
        }
        tracing::trace!(len = result.len(), "coincident great circle arcs");
        return Ok(result);
    }

    let point = cross_poles.unscale(norm(&cross_poles));
    let mut result = Intersection::None;
    for point in [point, -point] {
        if arc1.contains_point(&point, false, tolerances)?
            && arc2.contains_point(&point, false, tolerances)?
        {
            result = result.with_point(point, error_tolerance);
        }
    }
    Ok(result)
}

/// Calculate the intersection of a pair of undirected great circle arcs,
/// using the `DEFAULT_TOLERANCES`.
/// * `arc1`, `arc2` - the great circle arcs.
///
/// # Errors
///
/// Returns `Error::DegenerateArc` if either arc's points are antipodal.
///
/// # Examples
/// ```
/// use gca_geometry::intersections::{gca_gca_intersection, Intersection};
/// use gca_geometry::{GreatCircleArc, Vector3d};
///
/// let equator = GreatCircleArc::new(Vector3d::new(1.0, 0.0, 0.0), Vector3d::new(0.0, 1.0, 0.0));
/// let meridian = GreatCircleArc::new(Vector3d::new(1.0, 0.0, 0.0), Vector3d::new(0.0, 0.0, 1.0));
/// let result = gca_gca_intersection(&equator, &meridian).unwrap();
/// assert_eq!(1, result.len());
/// ```
pub fn gca_gca_intersection(
    arc1: &GreatCircleArc,
    arc2: &GreatCircleArc,
) -> Result<Intersection, Error> {
    calculate_arc_intersection(arc1, arc2, &DEFAULT_TOLERANCES)
}

/// Refine a point where a great circle intersects a circle of constant
/// latitude using Newton's method, holding z constant.
/// * `pole` - the pole of the great circle.
/// * `point` - the initial point.
/// * `tolerance` - the largest step in x or y that is considered converged.
///
/// returns the refined point, or None if it did not converge.
fn refine_latitude_point(pole: &Vector3d, point: &Vector3d, tolerance: f64) -> Option<Vector3d> {
    const MAX_ITERATIONS: u32 = 100;

    let z = point.z;
    let (mut x, mut y) = (point.x, point.y);
    for _ in 0..MAX_ITERATIONS {
        // on the great circle and on the unit sphere
        let f0 = dot(pole, &Vector3d::new(x, y, z));
        let f1 = x * x + y * y + z * z - 1.0;

        let det = 2.0 * (pole.x * y - pole.y * x);
        if !det.is_normal() {
            return None;
        }

        let dx = (2.0 * y * f0 - pole.y * f1) / det;
        let dy = (pole.x * f1 - 2.0 * x * f0) / det;
        x -= dx;
        y -= dy;

        if libm::fabs(dx).max(libm::fabs(dy)) <= tolerance {
            return Some(Vector3d::new(x, y, z));
        }
    }
    None
}

/// Calculate the intersection of an undirected great circle arc with a
/// circle of constant latitude.
/// * `arc` - the great circle arc.
/// * `const_z` - the z coordinate of the circle of latitude, i.e. the sine
///   of its latitude.
/// * `tolerances` - the comparison tolerances.
///
/// returns the intersection points, if any.
/// If the arc is on the Equator and `const_z` is zero, it returns the ends
/// of the arc.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the `tolerances` are not valid or
/// `const_z` is not in the range [-1, 1].
/// Returns `Error::DegenerateArc` if the arc's points are antipodal.
pub fn calculate_latitude_intersection(
    arc: &GreatCircleArc,
    const_z: f64,
    tolerances: &Tolerances,
) -> Result<Intersection, Error> {
    validate_tolerances(tolerances)?;
    if !(-1.0..=1.0).contains(&const_z) {
        return Err(Error::InvalidArgument("const_z must be in the range [-1, 1]"));
    }
    if arc.is_degenerate(tolerances) {
        return Err(Error::DegenerateArc);
    }

    let machine_epsilon = tolerances.machine_epsilon();
    let error_tolerance = tolerances.error_tolerance();
    let n = arc.pole();
    let n_sq = dot(&n, &n);
    let n_xy_sq = n.x * n.x + n.y * n.y;

    if n_xy_sq <= machine_epsilon * n_sq {
        // the great circle is the Equator
        return Ok(if libm::fabs(const_z) <= machine_epsilon {
            Intersection::None
                .with_point(arc.a(), error_tolerance)
                .with_point(arc.b(), error_tolerance)
        } else {
            Intersection::None
        });
    }

    let s_sq = n_xy_sq - n_sq * const_z * const_z;
    if s_sq < 0.0 {
        // the great circle does not reach the latitude
        return Ok(Intersection::None);
    }
    let s = libm::sqrt(s_sq);

    let candidates = [
        Vector3d::new(
            -(const_z * n.x * n.z + s * n.y) / n_xy_sq,
            -(const_z * n.y * n.z - s * n.x) / n_xy_sq,
            const_z,
        ),
        Vector3d::new(
            -(const_z * n.x * n.z - s * n.y) / n_xy_sq,
            -(const_z * n.y * n.z + s * n.x) / n_xy_sq,
            const_z,
        ),
    ];

    let mut result = Intersection::None;
    for point in candidates {
        if arc.contains_point(&point, false, tolerances)? {
            let point = refine_latitude_point(&n, &point, error_tolerance).unwrap_or_else(|| {
                tracing::warn!(?point, "latitude intersection did not converge");
                point
            });
            result = result.with_point(point, error_tolerance);
        }
    }
    Ok(result)
}

/// Calculate the intersection of an undirected great circle arc with a
/// circle of constant latitude, using the `DEFAULT_TOLERANCES`.
/// * `arc` - the great circle arc.
/// * `const_z` - the z coordinate of the circle of latitude.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `const_z` is not in the range [-1, 1].
/// Returns `Error::DegenerateArc` if the arc's points are antipodal.
pub fn gca_const_lat_intersection(
    arc: &GreatCircleArc,
    const_z: f64,
) -> Result<Intersection, Error> {
    calculate_latitude_intersection(arc, const_z, &DEFAULT_TOLERANCES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::{extreme_gca_latitude, ExtremeType};
    use crate::coordinates::{lonlat_to_xyz, xyz_to_lonlat};
    use crate::{Radians, ERROR_TOLERANCE};
    use angle_sc::is_within_tolerance;
    use core::f64::consts::PI;

    /// A point on the unit sphere at a longitude and latitude in degrees.
    fn point(lon: f64, lat: f64) -> Vector3d {
        lonlat_to_xyz(Radians(lon.to_radians()), Radians(lat.to_radians()))
    }

    fn arc(a: (f64, f64), b: (f64, f64)) -> GreatCircleArc {
        GreatCircleArc::new(point(a.0, a.1), point(b.0, b.1))
    }

    /// Assert that a point is at a longitude and latitude in degrees.
    fn assert_position(lon: f64, lat: f64, point: &Vector3d) {
        let position = xyz_to_lonlat(point.x, point.y, point.z, true).unwrap();
        assert!(is_within_tolerance(
            lon.to_radians(),
            position.lon().0,
            1.0e-12
        ));
        assert!(is_within_tolerance(
            lat.to_radians(),
            position.lat().0,
            1.0e-12
        ));
    }

    #[test]
    fn test_intersection_traits() {
        let a = point(10.0, 0.0);
        let b = point(20.0, 0.0);

        let result = Intersection::None;
        assert!(result.is_empty());
        assert_eq!(0, result.len());
        assert_eq!(None, result.first());

        let result = result.with_point(a, ERROR_TOLERANCE);
        assert_eq!(Intersection::One(a), result);
        assert_eq!(Some(a), result.first());

        // a duplicate point is ignored
        let result = result.with_point(a, ERROR_TOLERANCE);
        assert_eq!(1, result.len());

        let result = result.with_point(b, ERROR_TOLERANCE);
        assert_eq!(Intersection::Two(a, b), result);
        assert_eq!(2, result.len());
        assert!(!result.is_empty());

        let print_result = format!("Intersection: {:?}", result);
        assert!(print_result.contains("Two"));
    }

    #[test]
    fn test_gca_gca_intersection_antimeridian() {
        let arc1 = arc((170.0, 89.99), (170.0, 10.0));
        let arc2 = arc((70.0, 0.0), (179.0, 0.0));
        assert_eq!(Ok(Intersection::None), gca_gca_intersection(&arc1, &arc2));

        let arc1 = arc((170.0, 89.0), (170.0, -10.0));
        let arc2 = arc((70.0, 0.0), (175.0, 0.0));
        let result = gca_gca_intersection(&arc1, &arc2).unwrap();
        assert_eq!(1, result.len());
        let point = result.first().unwrap();
        assert!(is_within_tolerance(1.0, norm(&point), ERROR_TOLERANCE));
        assert_position(170.0, 0.0, &point);
    }

    #[test]
    fn test_gca_gca_intersection_parallel() {
        let arc1 = GreatCircleArc::new(
            lonlat_to_xyz(Radians(0.3 * PI), Radians(0.0)),
            lonlat_to_xyz(Radians(0.5 * PI), Radians(0.0)),
        );
        let arc2 = GreatCircleArc::new(
            lonlat_to_xyz(Radians(0.5 * PI), Radians(0.0)),
            lonlat_to_xyz(Radians(-0.5 * PI - 0.01), Radians(0.0)),
        );
        let result = gca_gca_intersection(&arc1, &arc2).unwrap();
        assert_eq!(1, result.len());
        let expected = lonlat_to_xyz(Radians(0.5 * PI), Radians(0.0));
        assert!(is_within_tolerance(
            0.0,
            norm(&(result.first().unwrap() - expected)),
            ERROR_TOLERANCE
        ));
    }

    #[test]
    fn test_gca_gca_intersection_perpendicular() {
        let arc1 = arc((170.0, 0.0), (170.0, 10.0));
        let arc2 = GreatCircleArc::new(
            lonlat_to_xyz(Radians(0.5 * PI), Radians(0.0)),
            lonlat_to_xyz(Radians(-0.5 * PI - 0.01), Radians(0.0)),
        );
        let result = gca_gca_intersection(&arc1, &arc2).unwrap();
        assert_eq!(1, result.len());
        assert_position(170.0, 0.0, &result.first().unwrap());
    }

    #[test]
    fn test_gca_gca_intersection_crossing() {
        let arc1 = arc((0.0, -20.0), (40.0, 30.0));
        let arc2 = arc((40.0, -20.0), (0.0, 30.0));
        let result = gca_gca_intersection(&arc1, &arc2).unwrap();
        assert_eq!(1, result.len());

        let point = result.first().unwrap();
        let position = xyz_to_lonlat(point.x, point.y, point.z, true).unwrap();
        assert!(is_within_tolerance(
            20.0_f64.to_radians(),
            position.lon().0,
            1.0e-12
        ));
        assert!(0.0 < position.lat().0);
    }

    #[test]
    fn test_gca_gca_intersection_coincident() {
        let arc1 = arc((10.0, 0.0), (50.0, 0.0));
        let arc2 = arc((30.0, 0.0), (70.0, 0.0));
        assert_eq!(
            Ok(Intersection::Two(arc1.b(), arc2.a())),
            gca_gca_intersection(&arc1, &arc2)
        );

        let arc2 = arc((60.0, 0.0), (70.0, 0.0));
        assert_eq!(Ok(Intersection::None), gca_gca_intersection(&arc1, &arc2));
    }

    #[test]
    fn test_gca_gca_intersection_degenerate() {
        let arc1 = arc((0.0, 0.0), (180.0, 0.0));
        let arc2 = arc((90.0, -10.0), (90.0, 10.0));
        assert_eq!(
            Err(Error::DegenerateArc),
            gca_gca_intersection(&arc1, &arc2)
        );
    }

    #[test]
    fn test_gca_const_lat_intersection_antimeridian() {
        let arc = arc((170.0, 89.99), (170.0, 10.0));

        let result = gca_const_lat_intersection(&arc, libm::sin(60.0_f64.to_radians())).unwrap();
        assert_eq!(1, result.len());
        assert_position(170.0, 60.0, &result.first().unwrap());

        let result = gca_const_lat_intersection(&arc, libm::sin(-10.0_f64.to_radians())).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_gca_const_lat_intersection_two_points() {
        let arc = arc((10.0, 10.0), (170.0, 10.0));
        let max_lat = extreme_gca_latitude(&arc, ExtremeType::Max).unwrap();
        let query_lat = (10.0_f64.to_radians() + max_lat.0) / 2.0;

        let result = gca_const_lat_intersection(&arc, libm::sin(query_lat)).unwrap();
        let Intersection::Two(a, b) = result else {
            panic!("expected two intersection points: {:?}", result);
        };
        for point in [a, b] {
            let position = xyz_to_lonlat(point.x, point.y, point.z, true).unwrap();
            assert!(is_within_tolerance(query_lat, position.lat().0, 1.0e-12));
        }

        // above the arc
        let result = gca_const_lat_intersection(&arc, libm::sin(max_lat.0 + 0.01)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_gca_const_lat_intersection_equator() {
        let arc = arc((0.0, 0.0), (90.0, 0.0));
        assert_eq!(
            Ok(Intersection::Two(arc.a(), arc.b())),
            gca_const_lat_intersection(&arc, 0.0)
        );
        assert_eq!(
            Ok(Intersection::None),
            gca_const_lat_intersection(&arc, 0.5)
        );
    }

    #[test]
    fn test_gca_const_lat_intersection_invalid() {
        let valid = arc((10.0, 10.0), (170.0, 10.0));
        let expected = Err(Error::InvalidArgument("const_z must be in the range [-1, 1]"));
        assert_eq!(expected, gca_const_lat_intersection(&valid, 1.5));
        assert_eq!(expected, gca_const_lat_intersection(&valid, f64::NAN));

        let degenerate = arc((0.0, 0.0), (180.0, 0.0));
        assert_eq!(
            Err(Error::DegenerateArc),
            gca_const_lat_intersection(&degenerate, 0.5)
        );
    }

    #[test]
    fn test_refine_latitude_point() {
        let arc = arc((10.0, 10.0), (170.0, 10.0));
        let pole = arc.pole();
        let start = arc.a();
        // a point near the start, off the great circle
        let initial = Vector3d::new(start.x + 1.0e-3, start.y - 1.0e-3, start.z);
        let result = refine_latitude_point(&pole, &initial, 1.0e-12).unwrap();
        assert!(is_within_tolerance(0.0, dot(&pole, &result), 1.0e-12));
        assert!(is_within_tolerance(1.0, norm(&result), 1.0e-12));

        // the Jacobian is singular on the Equator
        let equator_pole = Vector3d::new(0.0, 0.0, 1.0);
        assert_eq!(
            None,
            refine_latitude_point(&equator_pole, &start, ERROR_TOLERANCE)
        );
    }
}
