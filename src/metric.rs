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

//! The metric module contains the `GeodesicMetric` trait: the strategy used
//! to measure and travel along the legs of a `Route`.
//!
//! `EllipsoidalMetric` solves geodesics on an `Ellipsoid`.
//! `SphericalMetric` uses great circles on a sphere: it is less accurate but
//! simpler, so it is useful for checking route logic independently of the
//! ellipsoidal solver.

#![allow(clippy::float_cmp)]

use crate::error::{Error, Result};
use crate::geodesic::{waypoint_distance, GeodesicLeg};
use crate::route::{canonical_order, Position, Waypoint};
use crate::{ellipsoid, Ellipsoid, Metres, WGS84_ELLIPSOID};
use angle_sc::{Angle, Radians};
use unit_sphere::great_circle;

/// Measure and travel along the shortest paths between `Waypoint`s.
pub trait GeodesicMetric {
    /// The length of the shortest path between a pair of `Waypoint`s.
    ///
    /// It is non-negative, zero between identical `Waypoint`s and the same in
    /// both directions.
    fn distance(&self, a: &Waypoint, b: &Waypoint) -> Metres;

    /// The `Position` at `distance` along the shortest path from `from`
    /// towards `toward`.
    fn travel(&self, from: &Waypoint, toward: &Waypoint, distance: Metres) -> Position;

    /// The length of a path: the sum of the distances between its
    /// consecutive `Waypoint`s.
    ///
    /// # Errors
    ///
    /// `Error::InvalidRoute` if there are fewer than two `Waypoint`s.
    fn path_length(&self, waypoints: &[Waypoint]) -> Result<Metres> {
        if waypoints.len() < 2 {
            return Err(Error::InvalidRoute {
                waypoints: waypoints.len(),
            });
        }
        Ok(Metres(
            waypoints
                .windows(2)
                .map(|pair| self.distance(&pair[0], &pair[1]).0)
                .sum(),
        ))
    }
}

/// Geodesics on an `Ellipsoid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipsoidalMetric<'a> {
    ellipsoid: &'a Ellipsoid,
}

impl<'a> EllipsoidalMetric<'a> {
    /// Constructor.
    /// * `ellipsoid` - a reference to the `Ellipsoid`.
    #[must_use]
    pub const fn new(ellipsoid: &'a Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    /// The `Ellipsoid`.
    #[must_use]
    pub const fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }
}

impl Default for EllipsoidalMetric<'static> {
    /// Geodesics on the WGS-84 `Ellipsoid`.
    fn default() -> Self {
        Self::new(&WGS84_ELLIPSOID)
    }
}

impl GeodesicMetric for EllipsoidalMetric<'_> {
    fn distance(&self, a: &Waypoint, b: &Waypoint) -> Metres {
        waypoint_distance(a, b, self.ellipsoid)
    }

    fn travel(&self, from: &Waypoint, toward: &Waypoint, distance: Metres) -> Position {
        if distance.0 == 0.0 || from == toward {
            return Position::from(*from);
        }
        GeodesicLeg::between(from, toward, self.ellipsoid).position(distance)
    }
}

/// Great circles on a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalMetric {
    radius: Metres,
}

impl SphericalMetric {
    /// Constructor.
    /// * `radius` - the radius of the sphere.
    #[must_use]
    pub const fn new(radius: Metres) -> Self {
        Self { radius }
    }

    /// The radius of the sphere.
    #[must_use]
    pub const fn radius(&self) -> Metres {
        self.radius
    }
}

impl Default for SphericalMetric {
    /// A sphere with the mean radius of the WGS-84 `Ellipsoid`.
    fn default() -> Self {
        Self::new(ellipsoid::wgs84::MEAN_RADIUS)
    }
}

impl GeodesicMetric for SphericalMetric {
    fn distance(&self, a: &Waypoint, b: &Waypoint) -> Metres {
        if a == b {
            return Metres(0.0);
        }
        let (first, second) = canonical_order(a, b);
        let delta_long = Angle::from(second.lon() - first.lon());
        let arc = great_circle::calculate_gc_distance(
            first.lat_angle(),
            second.lat_angle(),
            delta_long,
        );
        Metres(self.radius.0 * arc.0)
    }

    fn travel(&self, from: &Waypoint, toward: &Waypoint, distance: Metres) -> Position {
        if distance.0 == 0.0 || from == toward {
            return Position::from(*from);
        }

        let lat1 = from.lat_angle();
        let delta_long = Angle::from(toward.lon() - from.lon());
        let azimuth = great_circle::calculate_gc_azimuth(lat1, toward.lat_angle(), delta_long);
        let arc = Angle::from(Radians(distance.0 / self.radius.0));

        let sin_lat2 = lat1.sin().0 * arc.cos().0 + lat1.cos().0 * arc.sin().0 * azimuth.cos().0;
        let cos_lat2 = libm::sqrt((1.0 - sin_lat2) * (1.0 + sin_lat2));
        let lat2 = Angle::from_y_x(sin_lat2, cos_lat2);

        let lon = if from.is_polar() {
            // along the meridian of the destination
            toward.lon_angle()
        } else {
            let delta_lon = Angle::from_y_x(
                azimuth.sin().0 * arc.sin().0 * lat1.cos().0,
                arc.cos().0 - lat1.sin().0 * sin_lat2,
            );
            from.lon_angle() + delta_lon
        };

        Position::new(lat2, lon)
    }
}
