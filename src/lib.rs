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

//! gca-geometry
//!
//! A library for testing whether a point lies on a
//! [great circle arc](https://en.wikipedia.org/wiki/Great_circle)
//! on the surface of a unit sphere and for calculating the maximum and
//! minimum latitudes reached along a great circle arc.
//!
//! Points are held as Cartesian `Vector3d`s on the unit sphere and are
//! converted to (longitude, latitude) pairs in radians, where longitude is
//! in the range [0, 2π) and latitude is in the range [-π/2, π/2].
//!
//! ## Great circle arcs
//!
//! A great circle arc is defined by a pair of points on the unit sphere.
//! An arc may be treated as *directed*, running from its start point to its
//! end point, or *undirected*, in which case it is taken to be the shorter
//! (minor) of the two great circle paths between its points.
//!
//! An arc between antipodal points does not define a unique great circle,
//! so it is rejected with [`Error::DegenerateArc`].
//! A directed arc that spans 180° or more of longitude is rejected with
//! [`Error::ArcTooLong`].
//! In both cases the caller should split the arc into two shorter arcs and
//! query each of them.
//!
//! ## Design
//!
//! Arcs are classified as one of:
//!
//! - a meridian arc, where both points have the same longitude;
//! - a pole crossing arc, where the arc passes over or ends at a pole;
//! - an antimeridian crossing arc, where the arc crosses the 0°/360° longitude;
//! - or a direct arc.
//!
//! Each class is then tested separately, see [`arcs::ArcClass`].
//!
//! The [`intersections`] module uses the point on arc test to find where a
//! great circle arc crosses another great circle arc or a circle of
//! constant latitude.
//!
//! Floating point comparisons use two tolerances: [`MACHINE_EPSILON`], for
//! plane membership and exact 180° checks, and [`ERROR_TOLERANCE`] for
//! checks on values that have been derived from other calculations.
//! Both may be overridden per query with a [`Tolerances`] value.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Radians`
//!   and `Degrees` and the `Validate` trait;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `Vector3d`
//!   and to convert between points and positions;
//! - [libm](https://crates.io/crates/libm) - for `no_std` floating point functions;
//! - [thiserror](https://crates.io/crates/thiserror) - to derive `Error`;
//! - [tracing](https://crates.io/crates/tracing) - for diagnostic logging.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate unit_sphere;

pub mod arcs;
pub mod computing;
pub mod coordinates;
pub mod intersections;

pub use angle_sc::{Degrees, Radians, Validate};
pub use arcs::{extreme_gca_latitude, point_within_gca, ArcClass, ExtremeType, GreatCircleArc};
pub use coordinates::LonLat;
pub use intersections::{gca_const_lat_intersection, gca_gca_intersection, Intersection};
pub use unit_sphere::Vector3d;

/// The tightest tolerance, used for plane membership and exact 180° checks.
pub const MACHINE_EPSILON: f64 = f64::EPSILON;

/// The looser tolerance, used for checks on coordinates that have been
/// derived from other calculations and so have accumulated rounding error.
pub const ERROR_TOLERANCE: f64 = 1.0e-4;

/// The errors returned by great circle arc calculations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The arc points are antipodal, so the arc does not define a unique
    /// great circle.
    #[error("great circle arc spans exactly 180 degrees, it has no unique plane")]
    DegenerateArc,
    /// A directed arc spans 180 degrees or more of longitude.
    #[error("great circle arc spans 180 degrees or more, it must be split")]
    ArcTooLong,
    /// An argument is not valid.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// The floating point tolerances used by great circle arc calculations.
///
/// Queries that take `Tolerances` check that they are valid, see the
/// `Validate` impl, and return `Error::InvalidArgument` if not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// The plane membership and exact 180° tolerance.
    machine_epsilon: f64,
    /// The tolerance for derived coordinates.
    error_tolerance: f64,
}

/// The default `Tolerances`: `MACHINE_EPSILON` and `ERROR_TOLERANCE`.
pub const DEFAULT_TOLERANCES: Tolerances = Tolerances::new(MACHINE_EPSILON, ERROR_TOLERANCE);

impl Tolerances {
    /// Constructor.
    /// * `machine_epsilon` - the plane membership and exact 180° tolerance.
    /// * `error_tolerance` - the tolerance for derived coordinates.
    #[must_use]
    pub const fn new(machine_epsilon: f64, error_tolerance: f64) -> Self {
        Self {
            machine_epsilon,
            error_tolerance,
        }
    }

    /// The plane membership and exact 180° tolerance.
    #[must_use]
    pub const fn machine_epsilon(&self) -> f64 {
        self.machine_epsilon
    }

    /// The tolerance for derived coordinates.
    #[must_use]
    pub const fn error_tolerance(&self) -> f64 {
        self.error_tolerance
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        DEFAULT_TOLERANCES
    }
}

impl Validate for Tolerances {
    /// Test whether `Tolerances` are valid.
    /// Whether 0 < `machine_epsilon` <= `error_tolerance`.
    fn is_valid(&self) -> bool {
        0.0 < self.machine_epsilon && self.machine_epsilon <= self.error_tolerance
    }
}
