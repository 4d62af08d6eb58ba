// Copyright (c) 2024-2026 Ken Barker

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

//! The geodesic module solves the two geodesic problems on an ellipsoid:
//!
//! - the *inverse* problem: the azimuth and length of the geodesic between a
//!   pair of positions, see `calculate_distance` and `inverse_azimuth_arc`;
//! - the *direct* problem: the position at a distance along a geodesic from a
//!   start position and azimuth, see `GeodesicLeg`.
//!
//! Both use the correspondence between a geodesic on the ellipsoid and a great
//! circle on the auxiliary sphere described by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf).

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]

use crate::ellipsoid::coefficients::{
    coeffs_c1, coeffs_c1p, coeffs_c2, scale_a1, scale_a2, sin_series,
};
use crate::error::{Error, Result};
use crate::route::{canonical_order, Position, Waypoint};
use crate::{Ellipsoid, Metres};
use angle_sc::trig::{cosine_from_sine, swap_sin_cos, UnitNegRange};
use angle_sc::{is_small, Angle, Radians};
use unit_sphere::great_circle;
use unit_sphere::LatLong;

/// The maximum precision, in Radians.
pub const MAX_PRECISION: Radians = Radians(2.0 * f64::EPSILON);

/// The smallest significant sine or arc length.
const MIN_VALUE: f64 = 2.0 * f64::EPSILON;

/// Solve the astroid problem: the positive root `k` of
/// `k^4 + 2k^3 - (x^2 + y^2 - 1)k^2 - 2y^2k - y^2 = 0`, Karney section 7.
/// * `x`, `y` - the scaled longitude and latitude offsets from antipodal.
#[must_use]
fn solve_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // On the equator with |x| <= 1
    if q <= 0.0 && r <= 0.0 {
        return 0.0;
    }

    let s = p * q / 4.0;
    let r2 = r * r;
    let r3 = r * r2;

    // zero on the evolute p^(1/3) + q^(1/3) = 1
    let discriminant = s * (s + 2.0 * r3);
    let u = if 0.0 <= discriminant {
        // take the sign of the root that maximises |t3|
        let t3 = s + r3;
        let t3 = t3 + libm::sqrt(discriminant).copysign(t3);
        let t = libm::cbrt(t3);
        r + if t == 0.0 { 0.0 } else { t + r2 / t }
    } else {
        // complex t, but u is real; r < 0 here
        let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
        r + 2.0 * r * libm::cos(angle / 3.0)
    };

    let v = libm::sqrt(u * u + q);
    // u + v, without cancellation
    let uv = if u < 0.0 { q / (v - u) } else { u + v };
    let w = (uv - q) / (2.0 * v);

    uv / (libm::sqrt(uv + w * w) + w)
}

/// The reduced length `m12` of a geodesic divided by the Semiminor axis,
/// Karney Eq. 38. It is the derivative used by Newton's method.
#[allow(clippy::similar_names)]
#[must_use]
fn reduced_length(
    eps: f64,
    sigma12: Radians,
    sigma1: Angle,
    dn1: f64,
    sigma2: Angle,
    dn2: f64,
) -> f64 {
    let a1 = scale_a1(eps);
    let a2 = scale_a2(eps);
    let c1 = coeffs_c1(eps);
    let c2 = coeffs_c2(eps);

    // J12 = A1 * I1 - A2 * I2, combined term by term
    let mut c_j = [0.0; 7];
    for (i, c) in c_j.iter_mut().enumerate().skip(1) {
        *c = (1.0 + a1) * c1[i] - (1.0 + a2) * c2[i];
    }
    let j12 = (a1 - a2) * (sigma12 + (sin_series(&c_j, sigma2) - sin_series(&c_j, sigma1))).0;

    dn2 * (sigma1.cos().0 * sigma2.sin().0)
        - dn1 * (sigma1.sin().0 * sigma2.cos().0)
        - sigma1.cos().0 * sigma2.cos().0 * j12
}

/// Estimate the start azimuth of a nearly antipodal geodesic on the auxiliary
/// sphere by solving the astroid problem.
/// * `beta1`, `beta2` - the parametric latitudes of the start and finish.
/// * `lambda12` - the (positive) longitude difference.
#[must_use]
fn estimate_antipodal_azimuth(
    beta1: Angle,
    beta2: Angle,
    lambda12: Angle,
    ellipsoid: &Ellipsoid,
) -> Angle {
    const Y_TOLERANCE: f64 = 200.0 * f64::EPSILON;
    const X_TOLERANCE: f64 = 2000.0 / core::f64::consts::FRAC_2_SQRT_PI;

    // assume sin(alpha1) = 1, i.e. Clairaut's constant is cos(beta1)
    let eps = ellipsoid.epsilon(beta1.cos());
    let lamscale = ellipsoid.f() * beta1.cos().0 * ellipsoid.a3f(eps) * core::f64::consts::PI;
    let betscale = lamscale * beta1.cos().0;

    let x = Radians::from(lambda12.opposite()).0 / lamscale;
    let y = (beta1 + beta2).sin().0 / betscale;

    if x <= -(1.0 + X_TOLERANCE) || y < -Y_TOLERANCE {
        let k = solve_astroid(x, y);
        let omg12a = lamscale * (-x * k / (1.0 + k));
        let omega12 = Radians(core::f64::consts::PI - omg12a);
        great_circle::calculate_gc_azimuth(beta1, beta2, Angle::from(omega12))
    } else {
        let sin_alpha = UnitNegRange(if -x < 1.0 { -x } else { 1.0 });
        Angle::new(sin_alpha, cosine_from_sine(sin_alpha, -1.0))
    }
}

/// The cosine of the longitude from the Northbound Equator crossing.
/// * `beta` - the parametric latitude.
/// * `cos_azimuth` - the cosine of the azimuth at `beta`.
#[must_use]
pub fn cos_omega(beta: Angle, cos_azimuth: UnitNegRange) -> UnitNegRange {
    UnitNegRange(cos_azimuth.0 * beta.cos().0)
}

/// The angle `atan2(y, x)`, zero where both are negligible: on the Equator
/// heading East or West.
#[must_use]
fn angle_from_equator(y: f64, x: f64) -> Angle {
    if libm::hypot(y, x) < MIN_VALUE {
        Angle::default()
    } else {
        Angle::from_y_x(y, x)
    }
}

/// The azimuth at parametric latitude `beta2` of the great circle leaving
/// `beta1` at azimuth `alpha1`, Karney Eqs. 5 & 45.
#[must_use]
fn end_azimuth(beta1: Angle, beta2: Angle, alpha1: Angle) -> Angle {
    let clairaut = alpha1.sin().0 * beta1.cos().0;

    let sin_alpha2 = if beta2.cos() == beta1.cos() {
        alpha1.sin()
    } else {
        UnitNegRange::clamp(clairaut / beta2.cos().0)
    };

    let cos_alpha2 =
        if beta2.cos() != beta1.cos() || libm::fabs(beta2.sin().0) != -beta1.sin().0 {
            let t1 = alpha1.cos().0 * beta1.cos().0;
            let t2 = if beta1.cos().0 < libm::fabs(beta1.sin().0) {
                (beta2.cos().0 - beta1.cos().0) * (beta1.cos().0 + beta2.cos().0)
            } else {
                (beta1.sin().0 - beta2.sin().0) * (beta1.sin().0 + beta2.sin().0)
            };
            let t = t1 * t1 + t2;
            UnitNegRange::clamp(if 0.0 < t {
                libm::sqrt(t) / beta2.cos().0
            } else {
                0.0
            })
        } else {
            UnitNegRange(libm::fabs(alpha1.cos().0))
        };

    Angle::new(sin_alpha2, cos_alpha2)
}

/// The difference between the longitude on the auxiliary sphere and the
/// longitude on the ellipsoid, Karney Eq. 8.
#[allow(clippy::similar_names)]
#[must_use]
fn omega_correction(
    clairaut: UnitNegRange,
    eps: f64,
    sigma12: Radians,
    sigma1: Angle,
    sigma2: Angle,
    ellipsoid: &Ellipsoid,
) -> f64 {
    let c3 = ellipsoid.c3(eps);
    let b31 = sin_series(&c3, sigma1);
    let b32 = sin_series(&c3, sigma2);
    ellipsoid.a3c(clairaut, eps) * (sigma12 + (b32 - b31)).0
}

/// Find the start azimuth and arc length on the auxiliary sphere of a general
/// geodesic using Newton's method to solve:
///   `lambda12(alpha1) - lambda12 = 0`
/// * `lat_a`, `lat_b` - the geodetic latitudes of the start and finish.
/// * `lambda12` - the longitude difference.
/// * `gc_length` - the great circle length between the points.
#[allow(clippy::similar_names)]
#[must_use]
fn newton_azimuth_arc(
    lat_a: Angle,
    lat_b: Angle,
    lambda12: Angle,
    gc_length: Radians,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians) {
    const MAX_ITERATIONS: u32 = 20;
    let antipodal_threshold = core::f64::consts::PI * ellipsoid.one_minus_f();

    // Solve from the latitude furthest from the Equator, in the South
    let swapped = libm::fabs(lat_a.sin().0) < libm::fabs(lat_b.sin().0);
    let (mut lat1, mut lat2) = if swapped { (lat_b, lat_a) } else { (lat_a, lat_b) };
    let negated = 0.0 < lat1.sin().0;
    if negated {
        lat1 = -lat1;
        lat2 = -lat2;
    }

    let beta1 = ellipsoid.parametric_latitude(lat1);
    let beta2 = ellipsoid.parametric_latitude(lat2);
    let dn1 = libm::sqrt(1.0 + ellipsoid.ep_2() * beta1.sin().0 * beta1.sin().0);
    let dn2 = libm::sqrt(1.0 + ellipsoid.ep_2() * beta2.sin().0 * beta2.sin().0);

    // a positive longitude difference gives positive azimuths
    let abs_lambda12 = lambda12.abs();

    let mut alpha1 = if antipodal_threshold < gc_length.0 {
        estimate_antipodal_azimuth(beta1, beta2, abs_lambda12, ellipsoid)
    } else {
        great_circle::calculate_gc_azimuth(lat1, lat2, abs_lambda12)
    };
    let mut alpha2 = alpha1;
    let mut sigma12 = gc_length;

    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let clairaut = UnitNegRange(alpha1.sin().0 * beta1.cos().0);
        let eps = ellipsoid.epsilon(clairaut);

        // longitude and arc length from the Northbound Equator crossing
        let cos_omega1 = cos_omega(beta1, alpha1.cos());
        let omega1 = angle_from_equator(clairaut.0 * beta1.sin().0, cos_omega1.0);
        let sigma1 = angle_from_equator(beta1.sin().0, cos_omega1.0);

        alpha2 = end_azimuth(beta1, beta2, alpha1);

        let cos_omega2 = cos_omega(beta2, alpha2.cos());
        let omega2 = angle_from_equator(clairaut.0 * beta2.sin().0, cos_omega2.0);
        let sigma2 = angle_from_equator(beta2.sin().0, cos_omega2.0);

        // both differences are in the range 0 to Pi
        let mut omega12 = omega2 - omega1;
        if omega12.sin().0 < 0.0 {
            omega12 = Angle::from_y_x(0.0, omega12.cos().0);
        }
        let mut sigma12_angle = sigma2 - sigma1;
        if sigma12_angle.sin().0 < 0.0 {
            sigma12_angle = Angle::from_y_x(0.0, sigma12_angle.cos().0);
        }
        sigma12 = Radians::from(sigma12_angle);

        let eta = Radians::from(omega12 - abs_lambda12);
        let correction = omega_correction(clairaut, eps, sigma12, sigma1, sigma2, ellipsoid);
        let v = eta.0 - correction;
        if is_small(libm::fabs(v), MAX_PRECISION.0) {
            converged = true;
            break;
        }

        let dv = if is_small(libm::fabs(alpha2.cos().0), f64::EPSILON) {
            -2.0 * ellipsoid.one_minus_f() * dn1 / beta1.sin().0
        } else {
            let m12 = reduced_length(eps, sigma12, sigma1, dn1, sigma2, dn2);
            ellipsoid.one_minus_f() * m12 / (alpha2.cos().0 * beta2.cos().0)
        };
        if is_small(libm::fabs(dv), MAX_PRECISION.0) {
            converged = true;
            break;
        }

        let delta_alpha1 = UnitNegRange::clamp(-v / dv);
        if is_small(libm::fabs(delta_alpha1.0), MAX_PRECISION.0) {
            converged = true;
            break;
        }
        alpha1 = alpha1 + Angle::from(Radians(delta_alpha1.0));
    }

    if !converged {
        tracing::trace!(
            iterations = MAX_ITERATIONS,
            sigma12 = sigma12.0,
            "geodesic azimuth did not converge"
        );
    }

    // undo the swap and negation of the latitudes
    if swapped {
        alpha1 = alpha2;
    }
    if swapped != negated {
        alpha1 = alpha1.negate_cos();
    }
    if lambda12.sin().0 < 0.0 {
        alpha1 = -alpha1;
    }

    (alpha1, sigma12)
}

/// The azimuth of a meridional geodesic, one through a pole or along a
/// meridian, where the great circle azimuth may be undefined.
#[must_use]
fn meridian_azimuth(lat1: Angle, lat2: Angle, abs_delta_long: Radians, gc_azimuth: Angle) -> Angle {
    let north = Angle::default();
    let south = north.opposite();
    if lat1.cos().0 <= MIN_VALUE || lat2.cos().0 <= MIN_VALUE {
        // to or from a pole
        gc_azimuth
    } else if abs_delta_long.0 <= MIN_VALUE {
        if lat1.sin().0 <= lat2.sin().0 {
            north
        } else {
            south
        }
    } else if 0.0 <= lat1.sin().0 + lat2.sin().0 {
        // over the nearer pole
        north
    } else {
        south
    }
}

/// Calculate the start azimuth and the arc length on the auxiliary sphere of
/// the geodesic between a pair of points.
/// * `lat1`, `lat2` - the geodetic latitudes of the start and finish.
/// * `delta_long` - the longitude difference.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// returns the azimuth at the start and the arc length on the auxiliary sphere.
#[must_use]
pub fn inverse_azimuth_arc(
    lat1: Angle,
    lat2: Angle,
    delta_long: Angle,
    ellipsoid: &Ellipsoid,
) -> (Angle, Radians) {
    const MAX_ARC: f64 = core::f64::consts::PI - 2.0 * MIN_VALUE;

    let gc_azimuth = great_circle::calculate_gc_azimuth(lat1, lat2, delta_long);
    let gc_length = great_circle::calculate_gc_distance(lat1, lat2, delta_long);
    if gc_length.0 <= MIN_VALUE {
        return (gc_azimuth, Radians(0.0));
    }

    let abs_delta_long = Radians::from(delta_long.abs());
    let is_meridional = abs_delta_long.0 <= MIN_VALUE
        || MAX_ARC <= abs_delta_long.0
        || lat1.cos().0 <= MIN_VALUE
        || lat2.cos().0 <= MIN_VALUE;
    if is_meridional {
        let arc = if MAX_ARC <= gc_length.0 {
            Radians(core::f64::consts::PI)
        } else {
            great_circle::calculate_gc_distance(
                ellipsoid.parametric_latitude(lat1),
                ellipsoid.parametric_latitude(lat2),
                delta_long,
            )
        };
        let azimuth = meridian_azimuth(lat1, lat2, abs_delta_long, gc_azimuth);
        return (azimuth, arc);
    }

    // along the Equator, unless the shortest path is over a pole
    let is_equatorial = lat1.sin().abs().0 <= MIN_VALUE
        && lat2.sin().abs().0 <= MIN_VALUE
        && abs_delta_long.0 <= ellipsoid.one_minus_f() * core::f64::consts::PI;
    if is_equatorial {
        return (gc_azimuth, Radians(gc_length.0 / ellipsoid.one_minus_f()));
    }

    newton_azimuth_arc(lat1, lat2, delta_long, gc_length, ellipsoid)
}

/// Convert an arc length on the auxiliary sphere to metres on the ellipsoid.
/// * `beta1` - the start parametric latitude.
/// * `alpha1` - the start azimuth.
/// * `arc_length` - the arc length on the auxiliary sphere.
/// * `ellipsoid` - the `Ellipsoid`.
#[must_use]
pub fn arc_to_metres(
    beta1: Angle,
    alpha1: Angle,
    arc_length: Radians,
    ellipsoid: &Ellipsoid,
) -> Metres {
    let sigma1 = angle_from_equator(beta1.sin().0, cos_omega(beta1, alpha1.cos()).0);
    let sigma2 = sigma1 + Angle::from(arc_length);

    let eps = ellipsoid.epsilon(UnitNegRange(alpha1.sin().0 * beta1.cos().0));
    let c1 = coeffs_c1(eps);
    let b11 = sin_series(&c1, sigma1);
    let b12 = sin_series(&c1, sigma2);

    Metres(ellipsoid.b().0 * (1.0 + scale_a1(eps)) * (arc_length + b12 - b11).0)
}

/// The length of the geodesic between a pair of valid `Waypoint`s.
///
/// The pair is solved in a canonical order, so the result is the same in
/// both directions. Identical points are zero apart without calling the
/// solver.
#[must_use]
pub fn waypoint_distance(a: &Waypoint, b: &Waypoint, ellipsoid: &Ellipsoid) -> Metres {
    if a == b {
        return Metres(0.0);
    }

    let (first, second) = canonical_order(a, b);
    let lat1 = first.lat_angle();
    let delta_long = Angle::from(second.lon() - first.lon());
    let (azimuth, arc_length) =
        inverse_azimuth_arc(lat1, second.lat_angle(), delta_long, ellipsoid);
    arc_to_metres(
        ellipsoid.parametric_latitude(lat1),
        azimuth,
        arc_length,
        ellipsoid,
    )
}

/// Calculate the geodesic distance between a pair of positions.
/// * `a`, `b` - the positions.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// # Errors
///
/// `Error::InvalidCoordinate` if either position is out of range or not finite.
///
/// # Examples
/// ```
/// use geodesic_route::*;
/// use geodesic_route::geodesic::calculate_distance;
///
/// let istanbul = LatLong::new(Degrees(42.0), Degrees(29.0));
/// let washington = LatLong::new(Degrees(39.0), Degrees(-77.0));
/// let distance = calculate_distance(&istanbul, &washington, &WGS84_ELLIPSOID).unwrap();
///
/// let distance_nm = NauticalMiles::from(distance);
/// println!("Istanbul-Washington distance: {:?}", distance_nm);
/// ```
pub fn calculate_distance(a: &LatLong, b: &LatLong, ellipsoid: &Ellipsoid) -> Result<Metres> {
    let a = Waypoint::try_from(*a)?;
    let b = Waypoint::try_from(*b)?;
    Ok(waypoint_distance(&a, &b, ellipsoid))
}

/// Calculate the geodesic length of a path: the sum of the geodesic
/// distances between its consecutive points.
/// * `points` - the points along the path.
/// * `ellipsoid` - the `Ellipsoid`.
///
/// # Errors
///
/// `Error::InvalidRoute` if there are fewer than two points,
/// `Error::InvalidCoordinate` if a point is out of range or not finite.
pub fn calculate_path_length(points: &[LatLong], ellipsoid: &Ellipsoid) -> Result<Metres> {
    if points.len() < 2 {
        return Err(Error::InvalidRoute {
            waypoints: points.len(),
        });
    }

    let waypoints = points
        .iter()
        .map(|p| Waypoint::try_from(*p))
        .collect::<Result<Vec<_>>>()?;
    let length = waypoints
        .windows(2)
        .map(|pair| waypoint_distance(&pair[0], &pair[1], ellipsoid).0)
        .sum();
    Ok(Metres(length))
}

/// The arc length on the auxiliary sphere from the Northbound Equator crossing
/// of the great circle through `beta` at `azimuth`, Karney Eq. 11.
#[must_use]
fn arc_from_equator(beta: Angle, azimuth: Angle) -> Angle {
    angle_from_equator(beta.sin().0, cos_omega(beta, azimuth.cos()).0)
}

/// A geodesic on an ellipsoid from a start point in a given direction.
///
/// It holds the constants of the great circle on the auxiliary sphere that
/// corresponds to the geodesic, so that positions along it can be calculated
/// without repeating the series evaluations: the "direct" problem.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicLeg<'a> {
    /// The start point.
    start: Waypoint,
    /// The parametric start latitude.
    beta1: Angle,
    /// The start azimuth.
    azimuth: Angle,
    /// The azimuth at the Equator crossing, `sin` is Clairaut's constant.
    alpha0: Angle,
    /// Arc length from the Northbound Equator crossing to the start.
    sigma1: Angle,
    /// Longitude on the auxiliary sphere from the Equator crossing to the start.
    omega1: Angle,
    /// The series expansion variable.
    eps: f64,
    /// The distance scale factor `A1`.
    a1: f64,
    /// The longitude correction factor.
    a3c: f64,
    /// `B1(sigma1)`.
    b11: Radians,
    /// `B3(sigma1)`.
    b31: Radians,
    /// Whether the start is at a pole, so the geodesic follows the
    /// meridian of the start longitude.
    from_pole: bool,
    /// The length of the geodesic, zero if unbounded.
    length: Metres,
    ellipsoid: &'a Ellipsoid,
}

impl<'a> GeodesicLeg<'a> {
    /// Construct a `GeodesicLeg` from a start point and azimuth.
    /// * `start` - the start point.
    /// * `azimuth` - the azimuth at the start point.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn new(start: &Waypoint, azimuth: Angle, ellipsoid: &'a Ellipsoid) -> Self {
        let beta1 = ellipsoid.parametric_latitude(start.lat_angle());

        let clairaut = UnitNegRange(azimuth.sin().0 * beta1.cos().0);
        let alpha0 = Angle::new(clairaut, swap_sin_cos(clairaut));
        let sigma1 = arc_from_equator(beta1, azimuth);
        let omega1 = Angle::from_y_x(clairaut.0 * sigma1.sin().0, sigma1.cos().0);

        let eps = ellipsoid.epsilon(clairaut);
        let c1 = coeffs_c1(eps);
        let c3 = ellipsoid.c3(eps);
        Self {
            start: *start,
            beta1,
            azimuth,
            alpha0,
            sigma1,
            omega1,
            eps,
            a1: 1.0 + scale_a1(eps),
            a3c: ellipsoid.a3c(clairaut, eps),
            b11: sin_series(&c1, sigma1),
            b31: sin_series(&c3, sigma1),
            from_pole: start.is_polar(),
            length: Metres(0.0),
            ellipsoid,
        }
    }

    /// Construct the `GeodesicLeg` between a pair of `Waypoint`s by solving
    /// the inverse problem.
    /// * `a`, `b` - the start and finish points.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub fn between(a: &Waypoint, b: &Waypoint, ellipsoid: &'a Ellipsoid) -> Self {
        let delta_long = Angle::from(b.lon() - a.lon());
        let (azimuth, arc_length) =
            inverse_azimuth_arc(a.lat_angle(), b.lat_angle(), delta_long, ellipsoid);

        // a pole has no longitude: leave it along the meridian of b
        let start = if a.is_polar() {
            Waypoint::new(a.lat(), b.lon()).unwrap_or(*a)
        } else {
            *a
        };
        let mut leg = Self::new(&start, azimuth, ellipsoid);
        leg.length = arc_to_metres(leg.beta1, azimuth, arc_length, ellipsoid);
        leg
    }

    /// The start point.
    #[must_use]
    pub const fn start(&self) -> &Waypoint {
        &self.start
    }

    /// The azimuth at the start point.
    #[must_use]
    pub const fn azimuth(&self) -> Angle {
        self.azimuth
    }

    /// The length of a leg constructed with `between`, zero otherwise.
    #[must_use]
    pub const fn length(&self) -> Metres {
        self.length
    }

    /// The arc length on the auxiliary sphere at a distance along the geodesic,
    /// Karney Eqs. 7, 15 & 20.
    /// * `distance` - the distance in metres.
    #[must_use]
    pub fn metres_to_arc(&self, distance: Metres) -> Radians {
        if libm::fabs(distance.0) < MIN_VALUE {
            return Radians(0.0);
        }
        let tau12 = Radians(distance.0 / (self.ellipsoid.b().0 * self.a1));
        let tau2 = self.sigma1 + Angle::from(self.b11 + tau12);
        let b12 = sin_series(&coeffs_c1p(self.eps), tau2);
        tau12 + b12 + self.b11
    }

    /// The position at a distance along the geodesic.
    /// * `distance` - the distance from the start in metres.
    #[must_use]
    pub fn position(&self, distance: Metres) -> Position {
        let sigma12 = self.metres_to_arc(distance);
        if sigma12.0 == 0.0 {
            return Position::from(self.start);
        }
        let sigma2 = self.sigma1 + Angle::from(sigma12);

        // Karney Eq. 5 & 13
        let sin_beta2 = self.alpha0.cos().0 * sigma2.sin().0;
        let cos_beta2 = libm::hypot(self.alpha0.sin().0, self.alpha0.cos().0 * sigma2.cos().0);
        let lat = self
            .ellipsoid
            .geodetic_latitude(Angle::from_y_x(sin_beta2, cos_beta2));

        let lon = if self.from_pole {
            self.start.lon_angle()
        } else {
            let omega2 = Angle::from_y_x(self.alpha0.sin().0 * sigma2.sin().0, sigma2.cos().0);
            let b32 = sin_series(&self.ellipsoid.c3(self.eps), sigma2);
            let correction = Radians(self.a3c * (sigma12 + (b32 - self.b31)).0);
            self.start.lon_angle() + (omega2 - self.omega1) - Angle::from(correction)
        };

        Position::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::wgs84;
    use angle_sc::{is_within_tolerance, Degrees};

    fn waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(Degrees(lat), Degrees(lon)).unwrap()
    }

    #[test]
    fn test_solve_astroid() {
        assert_eq!(0.0, solve_astroid(0.0, 0.0));
        assert_eq!(0.0, solve_astroid(1.0, 0.0));

        // 0.0, 0.0 to 0.5, 179.5
        assert!(is_within_tolerance(
            0.915_836_653_085_320_9,
            solve_astroid(-0.828_523_676_844_285_7, -0.825_766_755_842_532_6),
            1e-12
        ));
        // -30.0, 0.0 to 30.0, 179.0
        assert!(is_within_tolerance(
            0.912_119_009_397_480_4,
            solve_astroid(-1.912_119_009_397_480_5, 0.0),
            1e-12
        ));
    }

    #[test]
    fn test_end_azimuth() {
        let angle_50 = Angle::from(Degrees(50.0));
        let angle_20 = Angle::from(Degrees(20.0));

        let result = end_azimuth(angle_20, angle_50, angle_20);
        assert!(is_within_tolerance(
            30.0,
            Degrees::from(result).0,
            32.0 * f64::EPSILON
        ));

        let result = end_azimuth(-angle_50, angle_50, angle_20);
        assert!(is_within_tolerance(
            20.0,
            Degrees::from(result).0,
            32.0 * f64::EPSILON
        ));
    }

    #[test]
    fn test_inverse_meridian() {
        let geoid = Ellipsoid::wgs84();
        let lat1 = Angle::from(Degrees(-70.0));
        let lat2 = Angle::from(Degrees(80.0));

        let (azimuth, arc) = inverse_azimuth_arc(lat1, lat2, Angle::default(), &geoid);
        assert_eq!(0.0, Degrees::from(azimuth).0);
        assert!(is_within_tolerance(2.616_337_871_268_230_6, arc.0, 1e-14));

        let (azimuth, arc) = inverse_azimuth_arc(lat2, lat1, Angle::default(), &geoid);
        assert_eq!(180.0, Degrees::from(azimuth).0);
        assert!(is_within_tolerance(2.616_337_871_268_230_6, arc.0, 1e-14));
    }

    #[test]
    fn test_inverse_equator() {
        let geoid = Ellipsoid::wgs84();
        let lat = Angle::default();

        let (azimuth, arc) =
            inverse_azimuth_arc(lat, lat, Angle::from(Degrees(90.0)), &geoid);
        assert_eq!(90.0, Degrees::from(azimuth).0);
        assert!(is_within_tolerance(1.576_080_626_728_694_6, arc.0, 1e-14));

        let (azimuth, _) = inverse_azimuth_arc(lat, lat, Angle::from(Degrees(-90.0)), &geoid);
        assert_eq!(-90.0, Degrees::from(azimuth).0);
    }

    #[test]
    fn test_inverse_general() {
        let geoid = Ellipsoid::wgs84();

        // North West bound, straddle Equator
        let (azimuth, arc) = inverse_azimuth_arc(
            Angle::from(Degrees(-40.0)),
            Angle::from(Degrees(30.0)),
            Angle::from(Degrees(-70.0)),
            &geoid,
        );
        assert!(is_within_tolerance(
            -55.004_731_699_057_92,
            Degrees::from(azimuth).0,
            1e-9
        ));
        assert!(is_within_tolerance(1.665_679_046_742_887_5, arc.0, 1e-12));
    }

    #[test]
    fn test_waypoint_distance() {
        let geoid = Ellipsoid::wgs84();

        // a quarter of the meridian
        let result = waypoint_distance(&waypoint(0.0, 0.0), &waypoint(90.0, 0.0), &geoid);
        assert!(is_within_tolerance(10_001_965.729, result.0, 1e-3));

        let istanbul = waypoint(42.0, 29.0);
        let washington = waypoint(39.0, -77.0);
        let result = waypoint_distance(&istanbul, &washington, &geoid);
        assert!(is_within_tolerance(8_339_863.136, result.0, 1e-3));

        let a = waypoint(-40.0, 70.0);
        let b = waypoint(30.0, 0.0);
        let result = waypoint_distance(&a, &b, &geoid);
        assert!(is_within_tolerance(10_592_890.731, result.0, 1e-3));

        // a short distance
        let a = waypoint(50.0, -4.0);
        let b = waypoint(50.0001, -4.0001);
        let result = waypoint_distance(&a, &b, &geoid);
        assert!(is_within_tolerance(13.233_357_58, result.0, 1e-6));
    }

    #[test]
    fn test_waypoint_distance_symmetric() {
        let geoid = Ellipsoid::wgs84();
        let points = [
            waypoint(50.62, -3.4137),
            waypoint(28.1033, -17.2194),
            waypoint(-33.9, 151.2),
            waypoint(0.0, 0.0),
            waypoint(0.5, 179.5),
            waypoint(-90.0, 0.0),
            waypoint(30.0, 0.0),
            waypoint(-30.0, 180.0),
        ];
        for a in &points {
            assert_eq!(0.0, waypoint_distance(a, a, &geoid).0);
            for b in &points {
                let ab = waypoint_distance(a, b, &geoid);
                let ba = waypoint_distance(b, a, &geoid);
                assert_eq!(ab, ba);
                assert!(0.0 <= ab.0);
                // no geodesic is longer than half the meridian
                assert!(ab.0 <= 20_003_931.46);
            }
        }
    }

    #[test]
    fn test_antipodal_meridian() {
        let geoid = Ellipsoid::wgs84();
        // half of the meridian, over the North pole
        let result = waypoint_distance(&waypoint(30.0, 0.0), &waypoint(-30.0, 180.0), &geoid);
        assert!(is_within_tolerance(20_003_931.459, result.0, 1e-3));
    }

    #[test]
    fn test_cos_omega() {
        let equator = Angle::default();
        let east = Angle::from(Degrees(90.0));
        assert!(is_small(libm::fabs(cos_omega(equator, east.cos()).0), f64::EPSILON));

        let azimuth = Angle::from(Degrees(60.0));
        assert!(is_within_tolerance(
            0.5,
            cos_omega(equator, azimuth.cos()).0,
            f64::EPSILON
        ));
        let zero = angle_from_equator(0.0, 0.0);
        assert_eq!(0.0, zero.sin().0);
        assert_eq!(1.0, zero.cos().0);
    }

    #[test]
    fn test_nearly_antipodal_equator() {
        let geoid = Ellipsoid::wgs84();
        let origin = waypoint(0.0, 0.0);

        // beyond (1 - f) * 180 degrees the geodesic leaves the Equator
        let expected = [
            (179.4, 19_970_715.517),
            (179.5, 19_980_861.909),
            (179.99, 20_003_922.228),
        ];
        for (lon, length) in expected {
            let other = waypoint(0.0, lon);
            let result = waypoint_distance(&origin, &other, &geoid);
            assert!(is_within_tolerance(length, result.0, 1e-3));
            assert_eq!(result, waypoint_distance(&other, &origin, &geoid));
        }

        // along the Equator
        let result = waypoint_distance(&origin, &waypoint(0.0, 179.39), &geoid);
        assert!(is_within_tolerance(
            wgs84::A.0 * 179.39_f64.to_radians(),
            result.0,
            1e-3
        ));
    }

    #[test]
    fn test_nearly_antipodal_general() {
        let geoid = Ellipsoid::wgs84();
        let a = waypoint(0.0, 0.0);
        let b = waypoint(0.5, 179.5);
        let result = waypoint_distance(&a, &b, &geoid);
        assert!(is_within_tolerance(19_936_288.579, result.0, 1e-3));
        assert_eq!(result, waypoint_distance(&b, &a, &geoid));
    }

    #[test]
    fn test_calculate_distance() {
        let exmouth = LatLong::new(Degrees(50.62), Degrees(-3.4137));
        let la_gomera = LatLong::new(Degrees(28.1033), Degrees(-17.2194));
        let result = calculate_distance(&exmouth, &la_gomera, &crate::WGS84_ELLIPSOID).unwrap();
        assert!(is_within_tolerance(2_758_067.166, result.0, 1e-3));

        let invalid = LatLong::new(Degrees(95.0), Degrees(0.0));
        assert_eq!(
            Err(Error::InvalidCoordinate {
                lat: 95.0,
                lon: 0.0
            }),
            calculate_distance(&exmouth, &invalid, &crate::WGS84_ELLIPSOID)
        );
    }

    #[test]
    fn test_calculate_path_length() {
        let geoid = Ellipsoid::wgs84();
        let points = [
            LatLong::new(Degrees(50.62), Degrees(-3.4137)),
            LatLong::new(Degrees(48.45), Degrees(-5.4)),
            LatLong::new(Degrees(43.0), Degrees(-9.9)),
        ];
        let result = calculate_path_length(&points, &geoid).unwrap();
        assert!(is_within_tolerance(980_350.052, result.0, 1e-3));

        assert_eq!(
            Err(Error::InvalidRoute { waypoints: 1 }),
            calculate_path_length(&points[..1], &geoid)
        );
    }

    #[test]
    fn test_geodesic_leg_position() {
        let geoid = Ellipsoid::wgs84();

        let start = waypoint(0.0, 0.0);
        let leg = GeodesicLeg::new(&start, Angle::from(Degrees(45.0)), &geoid);
        let result = leg.position(Metres(1_000_000.0));
        assert!(is_within_tolerance(6.381_348_569_778, result.lat().0, 1e-8));
        assert!(is_within_tolerance(6.378_311_855_228, result.lon().0, 1e-8));

        // along a meridian
        let leg = GeodesicLeg::new(&waypoint(60.0, 10.0), Angle::default(), &geoid);
        let result = leg.position(Metres(500_000.0));
        assert!(is_within_tolerance(64.486_348_980_876, result.lat().0, 1e-8));
        assert!(is_within_tolerance(10.0, result.lon().0, 1e-12));

        // along the Equator
        let leg = GeodesicLeg::new(&start, Angle::from(Degrees(90.0)), &geoid);
        let quarter = Metres(wgs84::A.0 * core::f64::consts::FRAC_PI_2);
        let result = leg.position(quarter);
        assert!(is_within_tolerance(0.0, result.lat().0, 1e-12));
        assert!(is_within_tolerance(90.0, result.lon().0, 1e-9));

        assert_eq!(Position::from(start), leg.position(Metres(0.0)));
    }

    #[test]
    fn test_geodesic_leg_between() {
        let geoid = Ellipsoid::wgs84();
        let exmouth = waypoint(50.62, -3.4137);
        let la_gomera = waypoint(28.1033, -17.2194);

        let leg = GeodesicLeg::between(&exmouth, &la_gomera, &geoid);
        assert_eq!(&exmouth, leg.start());
        assert!(is_within_tolerance(
            -149.823_199_205,
            Degrees::from(leg.azimuth()).0,
            1e-8
        ));
        assert!(is_within_tolerance(2_758_067.166, leg.length().0, 1e-3));

        let midpoint = leg.position(Metres(leg.length().0 / 2.0));
        assert!(is_within_tolerance(39.572_317_313, midpoint.lat().0, 1e-8));
        assert!(is_within_tolerance(-11.444_867_324, midpoint.lon().0, 1e-8));

        let end = leg.position(leg.length());
        assert!(is_within_tolerance(28.1033, end.lat().0, 1e-9));
        assert!(is_within_tolerance(-17.2194, end.lon().0, 1e-9));
    }

    #[test]
    fn test_geodesic_leg_from_pole() {
        let geoid = Ellipsoid::wgs84();
        let north_pole = waypoint(90.0, 0.0);
        let b = waypoint(60.0, 45.0);

        let leg = GeodesicLeg::between(&north_pole, &b, &geoid);
        let result = leg.position(Metres(leg.length().0 / 2.0));
        assert!(75.0 < result.lat().0 && result.lat().0 < 90.0);
        assert!(is_within_tolerance(45.0, result.lon().0, 1e-12));

        let end = leg.position(leg.length());
        assert!(is_within_tolerance(60.0, end.lat().0, 1e-9));
    }
}
