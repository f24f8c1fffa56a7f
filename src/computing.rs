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

//! The computing module contains floating point comparison functions and
//! compensated vector arithmetic.
//!
//! The dot and cross products use error free transformations based on the
//! fused multiply add (`fma`) instruction, see
//! [Ogita, Rump and Oishi(2005)](https://www.tuhh.de/ti3/paper/rump/OgRuOi05.pdf)
//! and [Kahan's algorithm](https://pharr.org/matt/blog/2019/11/03/difference-of-floats)
//! for the difference of products.
//! The plane membership test of a great circle arc takes the dot product of
//! a point with the cross product of the arc points, so cancellation in
//! either product would swamp `MACHINE_EPSILON`.

use crate::{Radians, Vector3d};

/// Whether `a` is close to `b`, i.e. |a - b| <= atol + rtol * |b|.
/// * `a`, `b` - the values to compare.
/// * `rtol` - the relative tolerance, scaled by `b`.
/// * `atol` - the absolute tolerance.
///
/// # Examples
/// ```
/// use gca_geometry::computing::isclose;
///
/// assert!(isclose(1.0, 1.0 + 1.0e-12, 0.0, 1.0e-10));
/// assert!(!isclose(1.0, 1.1, 0.0, 1.0e-10));
/// ```
#[must_use]
pub fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    libm::fabs(a - b) <= atol + rtol * libm::fabs(b)
}

/// Whether every element of `a` is close to the corresponding element of `b`.
/// Slices of different lengths are never close.
/// * `a`, `b` - the values to compare.
/// * `rtol` - the relative tolerance, scaled by elements of `b`.
/// * `atol` - the absolute tolerance.
#[must_use]
pub fn allclose(a: &[f64], b: &[f64], rtol: f64, atol: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(&x, &y)| isclose(x, y, rtol, atol))
}

/// Whether `q` lies in the closed interval between `p` and `r`,
/// in either order.
/// Note: the comparison is exact, callers must round values beforehand
/// if required.
///
/// # Examples
/// ```
/// use gca_geometry::computing::in_between;
///
/// assert!(in_between(0.0, 0.5, 1.0));
/// assert!(in_between(1.0, 0.5, 0.0));
/// assert!(!in_between(0.0, 1.5, 1.0));
/// ```
#[must_use]
pub fn in_between(p: f64, q: f64, r: f64) -> bool {
    (p <= q && q <= r) || (r <= q && q <= p)
}

/// Sum two values without losing the rounding error.
///
/// returns the rounded sum and its error, so that `a + b == s + e` exactly.
#[must_use]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let a_prime = s - b;
    let b_prime = s - a_prime;
    let delta_a = a - a_prime;
    let delta_b = b - b_prime;
    (s, delta_a + delta_b)
}

/// Sum two values without losing the rounding error.
/// @pre |a| >= |b|.
///
/// returns the rounded sum and its error.
#[must_use]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let z = s - a;
    (s, b - z)
}

/// Multiply two values without losing the rounding error.
///
/// returns the rounded product and its error, so that `a * b == x + y` exactly.
#[must_use]
pub fn two_prod_fma(a: f64, b: f64) -> (f64, f64) {
    let x = a * b;
    (x, libm::fma(a, b, -x))
}

/// Multiply two values without losing the rounding error, using Dekker's
/// algorithm instead of `fma`.
/// The values are split into high and low halves with Veltkamp's method,
/// so the products must not overflow.
///
/// returns the rounded product and its error, the same as `two_prod_fma`.
#[must_use]
pub fn fast_two_mult(a: f64, b: f64) -> (f64, f64) {
    // 2^27 + 1
    const SPLITTER: f64 = 134_217_729.0;

    let split = |value: f64| {
        let c = SPLITTER * value;
        let high = c - (c - value);
        (high, value - high)
    };

    let x = a * b;
    let (a1, a2) = split(a);
    let (b1, b2) = split(b);
    (x, a2 * b2 - (((x - a1 * b1) - a2 * b1) - a1 * b2))
}

/// Square a value without losing the rounding error.
///
/// returns the rounded square and its error.
#[must_use]
pub fn two_square(a: f64) -> (f64, f64) {
    let x = a * a;
    (x, libm::fma(a, a, -x))
}

/// Calculate the error of a fused multiply add, see
/// [Boldo and Muller(2011)](https://doi.org/10.1109/TC.2010.139).
///
/// returns `x = fma(a, b, c)` and a pair of error terms,
/// so that `a * b + c == x + y + z` exactly.
#[must_use]
pub fn err_fmac(a: f64, b: f64, c: f64) -> (f64, f64, f64) {
    let x = libm::fma(a, b, c);
    let (u1, u2) = two_prod_fma(a, b);
    let (alpha1, z) = two_sum(c, u2);
    let (beta1, beta2) = two_sum(u1, alpha1);
    let gamma = (beta1 - x) + beta2;
    let (y, z) = fast_two_sum(gamma, z);
    (x, y, z)
}

/// Sum values using the cascaded `Sum2` algorithm of Ogita, Rump and Oishi.
/// * `values` - the values to sum.
///
/// returns the sum, as if calculated in twice the working precision.
///
/// # Examples
/// ```
/// use gca_geometry::computing::vec_sum;
///
/// // the naive sum is zero
/// assert_eq!(1.0, vec_sum(&[1.0e16, 1.0, -1.0e16]));
/// ```
#[must_use]
pub fn vec_sum(values: &[f64]) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };

    let (p, s) = rest.iter().fold((first, 0.0), |(p, s), &value| {
        let (sum, q) = two_sum(p, value);
        (sum, s + q)
    });
    p + s
}

/// Calculate a faithfully rounded square root of the unevaluated sum
/// `high + low`.
/// * `high`, `low` - the value as a double word, |low| <= ulp(high).
#[must_use]
pub fn sqrt_faithful(high: f64, low: f64) -> f64 {
    let p = libm::sqrt(high);
    if p <= 0.0 {
        return p;
    }

    let (h, l) = two_square(p);
    let r = low + ((high - h) - l);
    p + r / (2.0 * p)
}

/// Calculate a faithfully rounded Euclidean norm of a vector, see
/// [Graillat, Lauter, Tang, Yamanaka and Oishi(2015)](https://doi.org/10.1145/2699469).
/// * `values` - the vector components.
#[must_use]
pub fn norm_faithful(values: &[f64]) -> f64 {
    let (high, low) = values.iter().fold((0.0, 0.0), |(high, low), &value| {
        let (p, p_error) = two_square(value);
        let (h, h_error) = two_sum(high, p);
        fast_two_sum(h, h_error + (low + p_error))
    });
    sqrt_faithful(high, low)
}

/// Calculate `a * b - c * d` using Kahan's algorithm.
///
/// returns the difference of products with a relative error of a few ulps,
/// even when the products nearly cancel.
#[must_use]
pub fn difference_of_products(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let w = c * d;
    let e = libm::fma(-c, d, w);
    let f = libm::fma(a, b, -w);
    f + e
}

/// Calculate the compensated dot product of a pair of vectors.
/// * `a`, `b` - the vectors.
///
/// returns the dot product, as if calculated in twice the working precision.
#[must_use]
pub fn dot(a: &Vector3d, b: &Vector3d) -> f64 {
    let (mut p, mut s) = two_prod_fma(a.x, b.x);
    for (x, y) in [(a.y, b.y), (a.z, b.z)] {
        let (h, r) = two_prod_fma(x, y);
        let (sum, q) = two_sum(p, h);
        p = sum;
        s += q + r;
    }
    p + s
}

/// Calculate the cross product of a pair of vectors, with each component
/// calculated by `difference_of_products`.
/// * `a`, `b` - the vectors.
#[must_use]
pub fn cross(a: &Vector3d, b: &Vector3d) -> Vector3d {
    Vector3d::new(
        difference_of_products(a.y, b.z, a.z, b.y),
        difference_of_products(a.z, b.x, a.x, b.z),
        difference_of_products(a.x, b.y, a.y, b.x),
    )
}

/// Calculate the Euclidean length of a vector.
#[must_use]
pub fn norm(a: &Vector3d) -> f64 {
    libm::sqrt(dot(a, a))
}

/// Calculate the angle between a pair of vectors using Kahan's formula:
/// 2 * atan2(|‖v‖u - ‖u‖v|, |‖v‖u + ‖u‖v|).
/// It is accurate for both small angles and angles close to π, unlike the
/// arc cosine of the dot product.
/// * `u`, `v` - the vectors, they do not need to be normalized.
///
/// returns the angle between the vectors in the range [0, π].
///
/// # Examples
/// ```
/// use gca_geometry::computing::angle_of_2_vectors;
/// use gca_geometry::Vector3d;
///
/// let north = Vector3d::new(0.0, 0.0, 1.0);
/// let south = Vector3d::new(0.0, 0.0, -1.0);
/// assert_eq!(core::f64::consts::PI, angle_of_2_vectors(&north, &south).0);
/// ```
#[must_use]
pub fn angle_of_2_vectors(u: &Vector3d, v: &Vector3d) -> Radians {
    let v_norm_u = u.scale(norm(v));
    let u_norm_v = v.scale(norm(u));
    let difference = v_norm_u - u_norm_v;
    let sum = v_norm_u + u_norm_v;
    Radians(2.0 * libm::atan2(norm(&difference), norm(&sum)))
}
