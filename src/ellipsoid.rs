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

//! The ellipsoid module contains the functions used to derive the parameters
//! of an ellipsoid of revolution from its Semimajor axis and flattening, and
//! to move latitudes between the ellipsoid and its auxiliary sphere.

#![allow(clippy::suboptimal_flops)]

pub mod coefficients;
pub mod wgs84;

use crate::Metres;
use angle_sc::{trig, Angle};

/// The Semiminor (polar) axis of an ellipsoid.
/// * `a` - the Semimajor axis.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use geodesic_route::Metres;
/// use geodesic_route::ellipsoid::{minor_axis, wgs84};
///
/// assert_eq!(Metres(6_356_752.314_245_179), minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// The square of the Eccentricity.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use geodesic_route::ellipsoid::{sq_eccentricity, wgs84};
///
/// assert_eq!(0.0066943799901413165, sq_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// The square of the second Eccentricity.
/// * `f` - the flattening ratio.
#[must_use]
pub fn sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// The third flattening, `n`.
/// * `f` - the flattening ratio.
#[must_use]
pub fn third_flattening(f: f64) -> f64 {
    f / (2.0 - f)
}

/// The series expansion variable `epsilon` of a geodesic, a small positive
/// number derived from its Clairaut constant.
/// CFF Karney, [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf)
/// Eqs 9 & 16.
/// * `clairaut` - the sine of the azimuth at the Equator.
/// * `ep_2` - the square of the second Eccentricity.
#[must_use]
pub fn epsilon(clairaut: trig::UnitNegRange, ep_2: f64) -> f64 {
    let k2 = ep_2 * (1.0 - clairaut.0) * (1.0 + clairaut.0);
    let denominator = libm::sqrt(1.0 + k2) + 1.0;
    k2 / (denominator * denominator)
}

/// Map a geodetic latitude onto the auxiliary sphere, i.e. the `parametric`
/// (reduced) latitude.
/// * `lat` - the geodetic latitude.
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn parametric_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(one_minus_f * lat.sin().0, lat.cos().0)
}

/// Map a `parametric` latitude on the auxiliary sphere back to a geodetic
/// latitude.
/// * `beta` - the parametric latitude.
/// * `one_minus_f` - one minus the flattening ratio.
#[must_use]
pub fn geodetic_latitude(beta: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(beta.sin().0 / one_minus_f, beta.cos().0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::{is_within_tolerance, Degrees, Radians};

    #[test]
    fn test_wgs84_derived_parameters() {
        assert!(is_within_tolerance(
            0.006_739_496_742_276_434,
            sq_2nd_eccentricity(wgs84::F),
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            0.001_679_220_386_383_704_7,
            third_flattening(wgs84::F),
            f64::EPSILON
        ));
    }

    #[test]
    fn test_epsilon() {
        let ep_2 = sq_2nd_eccentricity(wgs84::F);

        // A meridian has the largest epsilon, the third flattening
        assert!(is_within_tolerance(
            third_flattening(wgs84::F),
            epsilon(trig::UnitNegRange(0.0), ep_2),
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            0.001_260_472_041_653_061_9,
            epsilon(trig::UnitNegRange(0.5), ep_2),
            f64::EPSILON
        ));
        // The Equator
        assert_eq!(0.0, epsilon(trig::UnitNegRange(1.0), ep_2));
    }

    #[test]
    fn test_parametric_geodetic_latitude_round_trip() {
        let one_minus_f = 1.0 - wgs84::F;

        for i in (-90..=90).step_by(5) {
            let lat = Angle::from(Degrees(f64::from(i)));
            let beta = parametric_latitude(lat, one_minus_f);
            let result = geodetic_latitude(beta, one_minus_f);

            assert!(is_within_tolerance(
                Radians::from(lat).0,
                Radians::from(result).0,
                f64::EPSILON
            ));
        }
    }

    #[test]
    fn test_parametric_latitude_is_nearer_the_equator() {
        let one_minus_f = 1.0 - wgs84::F;
        let lat = Angle::from(Degrees(45.0));
        let beta = parametric_latitude(lat, one_minus_f);
        assert!(Degrees::from(beta).0 < 45.0);
        assert!(44.9 < Degrees::from(beta).0);
    }
}
