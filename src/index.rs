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

//! The index module contains the `DistanceTable`: the length of each leg of a
//! `Route` and the cumulative distance to each of its `Waypoint`s.

use crate::error::{Error, Result};
use crate::metric::GeodesicMetric;
use crate::route::Route;
use crate::Metres;

/// The leg and cumulative distances of a `Route`.
///
/// Both sequences have one entry per `Waypoint`:
/// - `leg_distances[n]` is the distance from `Waypoint` `n - 1` to `n`,
/// - `cumulative_distances[n]` is the distance from the first `Waypoint` to
///   `Waypoint` `n` along the `Route`.
///
/// The first entry of each is zero and `cumulative_distances` is
/// non-decreasing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceTable {
    legs: Vec<Metres>,
    cumulative: Vec<Metres>,
}

impl DistanceTable {
    /// Measure the legs of a `Route` with a `GeodesicMetric`.
    /// * `route` - the `Route`.
    /// * `metric` - the `GeodesicMetric` used to measure each leg.
    ///
    /// # Errors
    ///
    /// `Error::InvalidRoute` if the `Route` has fewer than two `Waypoint`s,
    /// or if all of its `Waypoint`s are identical.
    pub fn build(route: &Route, metric: &impl GeodesicMetric) -> Result<Self> {
        if route.len() < 2 || !route.has_distinct_waypoints() {
            return Err(Error::InvalidRoute {
                waypoints: route.len(),
            });
        }

        let mut legs = Vec::with_capacity(route.len());
        let mut cumulative = Vec::with_capacity(route.len());
        legs.push(Metres(0.0));
        cumulative.push(Metres(0.0));

        let mut total = 0.0;
        for pair in route.waypoints().windows(2) {
            let leg = metric.distance(&pair[0], &pair[1]);
            total += leg.0;
            legs.push(leg);
            cumulative.push(Metres(total));
        }

        tracing::debug!(
            legs = legs.len() - 1,
            total_km = total / 1000.0,
            "distance from start to finish"
        );

        Ok(Self { legs, cumulative })
    }

    /// The number of entries: the number of `Waypoint`s in the `Route`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// The length of the leg ending at each `Waypoint`.
    #[must_use]
    pub fn leg_distances(&self) -> &[Metres] {
        &self.legs
    }

    /// The distance along the `Route` to each `Waypoint`.
    #[must_use]
    pub fn cumulative_distances(&self) -> &[Metres] {
        &self.cumulative
    }

    /// The length of the whole `Route`, zero if the table is empty.
    #[must_use]
    pub fn total_length(&self) -> Metres {
        self.cumulative.last().copied().unwrap_or(Metres(0.0))
    }

    /// The index of the `Waypoint` at the end of the leg containing
    /// `distance`: the smallest `n` with `cumulative_distances[n] > distance`.
    ///
    /// Returns `None` if `distance` is at or beyond the end of the `Route`.
    #[must_use]
    pub fn leg_index(&self, distance: Metres) -> Option<usize> {
        let index = self.cumulative.partition_point(|c| c.0 <= distance.0);
        (index < self.cumulative.len()).then_some(index)
    }
}
