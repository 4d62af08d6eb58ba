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

//! geodesic-route
//!
//! A library for tracking a vehicle along a predefined multi-waypoint route
//! on the [WGS-84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! ellipsoid, given the total distance it has traveled.
//!
//! A virtual voyage, e.g. a rowing club rowing the distance from Exmouth to
//! La Gomera on their machines, accumulates a distance in a log book.
//! This library answers the question: where would they be now?
//!
//! ## Design
//!
//! The library is built from three parts:
//!
//! - a [`GeodesicMetric`](metric::GeodesicMetric), which measures the
//!   distance between two waypoints and travels a distance from one waypoint
//!   towards another. [`EllipsoidalMetric`](metric::EllipsoidalMetric) uses
//!   Charles Karney's [geodesic algorithms](https://arxiv.org/pdf/1109.4448.pdf)
//!   on an `Ellipsoid`; [`SphericalMetric`](metric::SphericalMetric) uses
//!   great circles on a sphere.
//! - a [`DistanceTable`](index::DistanceTable) of the leg and cumulative
//!   distances of a [`Route`](route::Route).
//! - a resolver that finds the leg containing a traveled distance and
//!   interpolates along the geodesic of that leg, see
//!   [`RouteTracker`](resolver::RouteTracker).
//!
//! Distances beyond the end of the route are clamped to the final waypoint.
//!
//! The `Ellipsoid` is an immutable value passed to the calculations; the
//! static `WGS84_ELLIPSOID` is used by default.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`
//!   and perform great-circle calculations;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres` and
//!   `NauticalMiles`.
//!
//! ## Example
//!
//! ```
//! use geodesic_route::*;
//!
//! let route = Route::from_lat_lon(&[(50.62, -3.4137), (28.1033, -17.2194)]).unwrap();
//! let tracker = RouteTracker::new(route, EllipsoidalMetric::default()).unwrap();
//!
//! let length = tracker.table().total_length();
//! assert!(2_700_000.0 < length.0 && length.0 < 3_000_000.0);
//!
//! let start = tracker.resolve(Metres(0.0)).unwrap();
//! assert_eq!(Degrees(50.62), start.lat());
//!
//! let halfway = tracker.resolve(Metres(length.0 / 2.0)).unwrap();
//! println!("halfway: {:?}", halfway.lon_lat());
//! ```

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod index;
pub mod metric;
pub mod resolver;
pub mod route;

pub use angle_sc::{Angle, Degrees, Radians};
pub use error::{Error, Result};
pub use icao_units::non_si::NauticalMiles;
pub use icao_units::si::Metres;
pub use index::DistanceTable;
pub use metric::{EllipsoidalMetric, GeodesicMetric, SphericalMetric};
pub use resolver::{progress, resolve, Position, RouteProgress, RouteTracker};
pub use route::{Route, Waypoint};
pub use unit_sphere::LatLong;

use angle_sc::trig;
use lazy_static::lazy_static;

/// The parameters of an ellipsoid of revolution, together with the values
/// derived from them that the geodesic calculations use repeatedly.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis.
    a: Metres,
    /// The flattening ratio.
    f: f64,
    /// The Semiminor axis.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the second Eccentricity.
    ep_2: f64,
    /// The third flattening.
    n: f64,
    /// The `A3` polynomial coefficients.
    a3: [f64; 6],
    /// The `C3x` polynomial coefficients.
    c3x: [f64; 15],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis.
    /// * `f` - the flattening ratio.
    #[must_use]
    pub fn new(a: Metres, f: f64) -> Self {
        let n = ellipsoid::third_flattening(f);
        Self {
            a,
            f,
            b: ellipsoid::minor_axis(a, f),
            one_minus_f: 1.0 - f,
            ep_2: ellipsoid::sq_2nd_eccentricity(f),
            n,
            a3: ellipsoid::coefficients::coeffs_a3(n),
            c3x: ellipsoid::coefficients::coeffs_c3x(n),
        }
    }

    /// An `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// The Semimajor axis.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the second Eccentricity.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The third flattening.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// The series expansion variable of a geodesic.
    /// * `clairaut` - the geodesic's Clairaut constant.
    #[must_use]
    pub fn epsilon(&self, clairaut: trig::UnitNegRange) -> f64 {
        ellipsoid::epsilon(clairaut, self.ep_2)
    }

    /// The longitude scale factor `A3` of a geodesic.
    /// * `eps` - the series expansion variable.
    #[must_use]
    pub fn a3f(&self, eps: f64) -> f64 {
        ellipsoid::coefficients::polynomial(&self.a3, eps)
    }

    /// The longitude correction factor `f * sin(alpha0) * A3` of a geodesic.
    /// * `clairaut` - the geodesic's Clairaut constant, `sin(alpha0)`.
    /// * `eps` - the series expansion variable.
    #[must_use]
    pub fn a3c(&self, clairaut: trig::UnitNegRange, eps: f64) -> f64 {
        self.f * clairaut.0 * self.a3f(eps)
    }

    /// The Fourier coefficients `C3[l]` of a geodesic.
    /// * `eps` - the series expansion variable.
    #[must_use]
    pub fn c3(&self, eps: f64) -> [f64; 6] {
        ellipsoid::coefficients::coeffs_c3(&self.c3x, eps)
    }

    /// Convert a geodetic latitude to a parametric latitude.
    #[must_use]
    pub fn parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::parametric_latitude(lat, self.one_minus_f)
    }

    /// Convert a parametric latitude to a geodetic latitude.
    #[must_use]
    pub fn geodetic_latitude(&self, beta: Angle) -> Angle {
        ellipsoid::geodetic_latitude(beta, self.one_minus_f)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

lazy_static! {
    /// The WGS-84 `Ellipsoid`, shared read-only by the whole process.
    pub static ref WGS84_ELLIPSOID: Ellipsoid = Ellipsoid::wgs84();
}
