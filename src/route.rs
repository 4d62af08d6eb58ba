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

//! The route module contains the `Waypoint`s of a route, the `Route` itself
//! and the `Position`s resolved along it.

use crate::error::{Error, Result};
use angle_sc::{Angle, Degrees};
use unit_sphere::LatLong;

/// A validated geographic coordinate: a vertex of a `Route`.
///
/// Its latitude is in the range -90° to 90° and its longitude in the range
/// -180° to 180°, and both are finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    lat: Degrees,
    lon: Degrees,
}

impl Waypoint {
    /// Constructor.
    /// * `lat` - the latitude.
    /// * `lon` - the longitude.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCoordinate` if either value is out of range or not finite.
    pub fn new(lat: Degrees, lon: Degrees) -> Result<Self> {
        let valid = lat.0.is_finite()
            && lon.0.is_finite()
            && (-90.0..=90.0).contains(&lat.0)
            && (-180.0..=180.0).contains(&lon.0);
        if valid {
            Ok(Self { lat, lon })
        } else {
            Err(Error::InvalidCoordinate {
                lat: lat.0,
                lon: lon.0,
            })
        }
    }

    /// The latitude.
    #[must_use]
    pub const fn lat(&self) -> Degrees {
        self.lat
    }

    /// The longitude.
    #[must_use]
    pub const fn lon(&self) -> Degrees {
        self.lon
    }

    /// The latitude as an `Angle`.
    #[must_use]
    pub fn lat_angle(&self) -> Angle {
        Angle::from(self.lat)
    }

    /// The longitude as an `Angle`.
    #[must_use]
    pub fn lon_angle(&self) -> Angle {
        Angle::from(self.lon)
    }

    /// Whether the `Waypoint` is at the North or South pole.
    #[must_use]
    pub fn is_polar(&self) -> bool {
        libm::fabs(self.lat.0) == 90.0
    }
}

impl TryFrom<LatLong> for Waypoint {
    type Error = Error;

    fn try_from(value: LatLong) -> Result<Self> {
        Self::new(value.lat(), value.lon())
    }
}

impl TryFrom<Position> for Waypoint {
    type Error = Error;

    fn try_from(value: Position) -> Result<Self> {
        Self::new(value.lat(), value.lon())
    }
}

impl From<Waypoint> for LatLong {
    fn from(value: Waypoint) -> Self {
        Self::new(value.lat, value.lon)
    }
}

/// Order a pair of `Waypoint`s by latitude, then longitude, so that a
/// calculation between them gives the same result in both directions.
#[must_use]
pub(crate) fn canonical_order<'a>(a: &'a Waypoint, b: &'a Waypoint) -> (&'a Waypoint, &'a Waypoint) {
    let ordering = a
        .lat
        .0
        .total_cmp(&b.lat.0)
        .then_with(|| a.lon.0.total_cmp(&b.lon.0));
    if ordering.is_gt() {
        (b, a)
    } else {
        (a, b)
    }
}

/// An ordered sequence of `Waypoint`s.
///
/// The order of the waypoints is the direction of travel.
/// The number of waypoints is not checked here: a `DistanceTable` can only be
/// built from a `Route` with at least two distinct waypoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Construct a `Route` from its `Waypoint`s.
    #[must_use]
    pub const fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Construct a `Route` from `(latitude, longitude)` pairs in degrees.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCoordinate` for the first invalid pair.
    pub fn from_lat_lon(coords: &[(f64, f64)]) -> Result<Self> {
        coords
            .iter()
            .map(|(lat, lon)| Waypoint::new(Degrees(*lat), Degrees(*lon)))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Construct a `Route` from `(longitude, latitude)` pairs in degrees,
    /// the order in which geographic annotation files store coordinates.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCoordinate` for the first invalid pair.
    pub fn from_lon_lat(coords: &[(f64, f64)]) -> Result<Self> {
        coords
            .iter()
            .map(|(lon, lat)| Waypoint::new(Degrees(*lat), Degrees(*lon)))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// The `Waypoint`s of the `Route`.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The number of `Waypoint`s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the `Route` has no `Waypoint`s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The start of the `Route`.
    #[must_use]
    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// The destination of the `Route`.
    #[must_use]
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Whether the `Route` has at least two different `Waypoint`s.
    #[must_use]
    pub fn has_distinct_waypoints(&self) -> bool {
        self.waypoints
            .first()
            .is_some_and(|first| self.waypoints.iter().any(|w| w != first))
    }
}

/// A position resolved along a `Route`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    lat: Degrees,
    lon: Degrees,
}

impl Position {
    /// Construct a `Position` from latitude and longitude `Angle`s.
    #[must_use]
    pub fn new(lat: Angle, lon: Angle) -> Self {
        Self {
            lat: Degrees::from(lat),
            lon: Degrees::from(lon),
        }
    }

    /// The latitude.
    #[must_use]
    pub const fn lat(&self) -> Degrees {
        self.lat
    }

    /// The longitude.
    #[must_use]
    pub const fn lon(&self) -> Degrees {
        self.lon
    }

    /// The `(longitude, latitude)` pair, in degrees, for plotting.
    #[must_use]
    pub const fn lon_lat(&self) -> (f64, f64) {
        (self.lon.0, self.lat.0)
    }
}

impl From<Waypoint> for Position {
    fn from(value: Waypoint) -> Self {
        Self {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

impl From<Position> for LatLong {
    fn from(value: Position) -> Self {
        Self::new(value.lat, value.lon)
    }
}
