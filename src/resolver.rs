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

//! The resolver module converts a distance traveled along a `Route` into a
//! `Position` on the `Route`.
//!
//! The leg containing the distance is found in the `DistanceTable` and the
//! `Position` is interpolated along the geodesic of that leg, so it lies on
//! the shortest path between the leg's `Waypoint`s rather than on a straight
//! line in latitude and longitude.
//!
//! Distances beyond the end of the `Route` are clamped to its final
//! `Waypoint`.

#![allow(clippy::float_cmp)]

use crate::error::{Error, Result};
use crate::index::DistanceTable;
use crate::metric::GeodesicMetric;
use crate::route::{Route, Waypoint};
use crate::Metres;

pub use crate::route::Position;

/// Where a distance falls on a `Route`.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Location {
    /// At the start of the `Route`.
    Start,
    /// Within the leg ending at the `Waypoint` with the given index.
    Leg(usize),
    /// At or beyond the end of the `Route`.
    End,
}

/// Validate the arguments and find where `distance` falls on the `Route`.
fn locate(distance: Metres, table: &DistanceTable, route: &Route) -> Result<Location> {
    if !distance.0.is_finite() || distance.0 < 0.0 {
        return Err(Error::InvalidDistance(distance.0));
    }
    if table.is_empty() || route.is_empty() {
        return Err(Error::EmptyRoute);
    }
    if table.len() != route.len() {
        return Err(Error::TableMismatch {
            table: table.len(),
            route: route.len(),
        });
    }

    if distance.0 == 0.0 {
        return Ok(Location::Start);
    }
    Ok(table.leg_index(distance).map_or_else(
        || {
            tracing::debug!(
                distance = distance.0,
                total = table.total_length().0,
                "distance clamped to the end of the route"
            );
            Location::End
        },
        Location::Leg,
    ))
}

/// The `Waypoint` at `index`, which `locate` has checked is in range.
fn waypoint(route: &Route, index: usize) -> Result<&Waypoint> {
    route.waypoints().get(index).ok_or(Error::EmptyRoute)
}

/// Resolve a distance traveled along a `Route` into a `Position`.
/// * `distance` - the distance traveled from the first `Waypoint`.
/// * `table` - the `DistanceTable` of the `Route`.
/// * `route` - the `Route`.
/// * `metric` - the `GeodesicMetric` used to build the `table`.
///
/// A `distance` of zero resolves to the first `Waypoint` and a `distance` at
/// or beyond the length of the `Route` resolves to the final `Waypoint`.
///
/// # Errors
///
/// - `Error::InvalidDistance` if `distance` is negative or not finite.
/// - `Error::EmptyRoute` if the `table` or `route` is empty.
/// - `Error::TableMismatch` if the `table` was not built from the `route`.
pub fn resolve(
    distance: Metres,
    table: &DistanceTable,
    route: &Route,
    metric: &impl GeodesicMetric,
) -> Result<Position> {
    let location = locate(distance, table, route)?;
    position_at(location, distance, table, route, metric)
}

/// The `Position` at `distance` along the `Route`, given its `Location`.
fn position_at(
    location: Location,
    distance: Metres,
    table: &DistanceTable,
    route: &Route,
    metric: &impl GeodesicMetric,
) -> Result<Position> {
    match location {
        Location::Start => waypoint(route, 0).map(|w| Position::from(*w)),
        Location::End => waypoint(route, route.len() - 1).map(|w| Position::from(*w)),
        Location::Leg(n) => {
            let from = waypoint(route, n - 1)?;
            let toward = waypoint(route, n)?;
            let residual = Metres(distance.0 - table.cumulative_distances()[n - 1].0);
            Ok(metric.travel(from, toward, residual))
        }
    }
}

/// The progress of a vehicle along a `Route`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteProgress {
    /// The resolved `Position`.
    pub position: Position,
    /// The index of the last `Waypoint` passed.
    pub last_waypoint: usize,
    /// The length of the current leg, zero at the end of the `Route`.
    pub leg_length: Metres,
    /// The distance from the last `Waypoint` passed.
    pub distance_along_leg: Metres,
    /// The distance remaining to the final `Waypoint`.
    pub remaining: Metres,
    /// The fraction of the `Route` completed, in the range 0 to 1.
    pub fraction: f64,
    /// The distance traveled beyond the final `Waypoint`.
    pub overrun: Metres,
}

impl RouteProgress {
    /// Whether the final `Waypoint` has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining.0 == 0.0
    }
}

/// Report the progress of a distance traveled along a `Route`.
///
/// The arguments and the resolved `Position` are the same as `resolve`.
///
/// # Errors
///
/// As `resolve`.
pub fn progress(
    distance: Metres,
    table: &DistanceTable,
    route: &Route,
    metric: &impl GeodesicMetric,
) -> Result<RouteProgress> {
    let location = locate(distance, table, route)?;
    let position = position_at(location, distance, table, route, metric)?;

    let total = table.total_length().0;
    let (last_waypoint, leg_length, distance_along_leg) = match location {
        // the first leg with a length, as for any distance just past the start
        Location::Start => table.leg_index(Metres(0.0)).map_or(
            (table.len() - 1, Metres(0.0), Metres(0.0)),
            |n| (n - 1, table.leg_distances()[n], Metres(0.0)),
        ),
        Location::Leg(n) => (
            n - 1,
            table.leg_distances()[n],
            Metres(distance.0 - table.cumulative_distances()[n - 1].0),
        ),
        Location::End => (table.len() - 1, Metres(0.0), Metres(0.0)),
    };
    let fraction = if total > 0.0 {
        (distance.0 / total).min(1.0)
    } else {
        1.0
    };

    Ok(RouteProgress {
        position,
        last_waypoint,
        leg_length,
        distance_along_leg,
        remaining: Metres((total - distance.0).max(0.0)),
        fraction,
        overrun: Metres((distance.0 - total).max(0.0)),
    })
}

/// A `Route` together with its `DistanceTable` and the `GeodesicMetric`
/// that measured it.
///
/// # Examples
/// ```
/// use geodesic_route::{Metres, Route, RouteTracker, SphericalMetric};
///
/// let route = Route::from_lon_lat(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
/// let tracker = RouteTracker::new(route, SphericalMetric::default()).unwrap();
///
/// let beyond = tracker.progress(Metres(2_000_000.0)).unwrap();
/// assert!(beyond.is_finished());
/// assert_eq!((10.0, 0.0), beyond.position.lon_lat());
/// ```
#[derive(Clone, Debug)]
pub struct RouteTracker<M: GeodesicMetric> {
    route: Route,
    table: DistanceTable,
    metric: M,
}

impl<M: GeodesicMetric> RouteTracker<M> {
    /// Constructor, builds the `DistanceTable` of the `route`.
    /// * `route` - the `Route`.
    /// * `metric` - the `GeodesicMetric`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidRoute` if the `Route` has fewer than two distinct
    /// `Waypoint`s.
    pub fn new(route: Route, metric: M) -> Result<Self> {
        let table = DistanceTable::build(&route, &metric)?;
        Ok(Self {
            route,
            table,
            metric,
        })
    }

    /// Resolve a distance traveled along the `Route` into a `Position`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDistance` if `distance` is negative or not finite.
    pub fn resolve(&self, distance: Metres) -> Result<Position> {
        resolve(distance, &self.table, &self.route, &self.metric)
    }

    /// Report the progress of a distance traveled along the `Route`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDistance` if `distance` is negative or not finite.
    pub fn progress(&self, distance: Metres) -> Result<RouteProgress> {
        progress(distance, &self.table, &self.route, &self.metric)
    }

    /// The `Route`.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// The `DistanceTable` of the `Route`.
    #[must_use]
    pub const fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// The `GeodesicMetric` that measured the `Route`.
    #[must_use]
    pub const fn metric(&self) -> &M {
        &self.metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{EllipsoidalMetric, SphericalMetric};
    use angle_sc::{is_within_tolerance, Degrees};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn exmouth_to_la_gomera() -> Route {
        Route::from_lat_lon(&[(50.62, -3.4137), (28.1033, -17.2194)]).unwrap()
    }

    fn multi_leg_route() -> Route {
        Route::from_lat_lon(&[
            (50.62, -3.4137),
            (48.45, -5.4),
            (43.0, -9.9),
            (38.7, -9.8),
            (32.7, -16.2),
            (28.1033, -17.2194),
        ])
        .unwrap()
    }

    fn check_route_ends<M: GeodesicMetric>(tracker: &RouteTracker<M>) {
        let first = tracker.route().first().copied().unwrap();
        let last = tracker.route().last().copied().unwrap();

        assert_eq!(
            Position::from(first),
            tracker.resolve(Metres(0.0)).unwrap()
        );
        assert_eq!(
            Position::from(last),
            tracker.resolve(tracker.table().total_length()).unwrap()
        );
        assert_eq!(
            Position::from(last),
            tracker
                .resolve(Metres(tracker.table().total_length().0 + 1.0))
                .unwrap()
        );
    }

    fn check_interior_distances<M: GeodesicMetric>(tracker: &RouteTracker<M>) {
        let waypoints = tracker.route().waypoints();
        let cumulative = tracker.table().cumulative_distances();
        for n in 1..waypoints.len() {
            let residual = 0.3 * tracker.table().leg_distances()[n].0;
            let distance = Metres(cumulative[n - 1].0 + residual);
            let position = tracker.resolve(distance).unwrap();
            assert_ne!(Position::from(waypoints[n - 1]), position);
            assert_ne!(Position::from(waypoints[n]), position);

            let point = Waypoint::try_from(position).unwrap();
            let measured = tracker.metric().distance(&waypoints[n - 1], &point);
            assert!((measured.0 - residual).abs() < 1.0);
        }
    }

    #[test]
    fn test_resolve_ellipsoidal() {
        let tracker = RouteTracker::new(multi_leg_route(), EllipsoidalMetric::default()).unwrap();
        check_route_ends(&tracker);
        check_interior_distances(&tracker);

        // at a waypoint
        let position = tracker
            .resolve(tracker.table().cumulative_distances()[2])
            .unwrap();
        assert!(is_within_tolerance(43.0, position.lat().0, 1e-9));
        assert!(is_within_tolerance(-9.9, position.lon().0, 1e-9));
    }

    #[test]
    fn test_resolve_spherical() {
        let tracker = RouteTracker::new(multi_leg_route(), SphericalMetric::default()).unwrap();
        check_route_ends(&tracker);
        check_interior_distances(&tracker);
    }

    #[test]
    fn test_resolve_exmouth_to_la_gomera() {
        let tracker =
            RouteTracker::new(exmouth_to_la_gomera(), EllipsoidalMetric::default()).unwrap();
        let length = tracker.table().total_length();
        assert!(2_700_000.0 < length.0 && length.0 < 3_000_000.0);
        assert!(is_within_tolerance(2_758_067.166, length.0, 1e-3));

        let midpoint = tracker.resolve(Metres(length.0 / 2.0)).unwrap();
        assert!(is_within_tolerance(39.572_317_313, midpoint.lat().0, 1e-8));
        assert!(is_within_tolerance(-11.444_867_324, midpoint.lon().0, 1e-8));

        // not the average of the latitudes and longitudes
        let (lon, lat) = midpoint.lon_lat();
        assert!((lat - 39.361_65).abs() > 0.1);
        assert!((lon - -10.316_55).abs() > 0.1);
    }

    #[test]
    fn test_resolve_errors() {
        let route = exmouth_to_la_gomera();
        let metric = EllipsoidalMetric::default();
        let table = DistanceTable::build(&route, &metric).unwrap();

        assert_eq!(
            Err(Error::InvalidDistance(-1.0)),
            resolve(Metres(-1.0), &table, &route, &metric)
        );
        assert!(matches!(
            resolve(Metres(f64::NAN), &table, &route, &metric),
            Err(Error::InvalidDistance(_))
        ));
        assert_eq!(
            Err(Error::InvalidDistance(f64::INFINITY)),
            resolve(Metres(f64::INFINITY), &table, &route, &metric)
        );

        assert_eq!(
            Err(Error::EmptyRoute),
            resolve(Metres(0.0), &DistanceTable::default(), &route, &metric)
        );
        assert_eq!(
            Err(Error::EmptyRoute),
            resolve(Metres(0.0), &table, &Route::default(), &metric)
        );

        let longer = multi_leg_route();
        assert_eq!(
            Err(Error::TableMismatch { table: 2, route: 6 }),
            resolve(Metres(0.0), &table, &longer, &metric)
        );

        let single = Route::from_lat_lon(&[(50.62, -3.4137)]).unwrap();
        assert!(matches!(
            RouteTracker::new(single, metric),
            Err(Error::InvalidRoute { waypoints: 1 })
        ));
    }

    #[test]
    fn test_resolve_duplicate_waypoints() {
        let route =
            Route::from_lat_lon(&[(10.0, 20.0), (10.0, 20.0), (10.5, 21.0), (10.5, 21.0)]).unwrap();
        let tracker = RouteTracker::new(route, EllipsoidalMetric::default()).unwrap();
        let quarter = Metres(tracker.table().total_length().0 / 4.0);

        let position = tracker.resolve(quarter).unwrap();
        assert!(is_within_tolerance(10.125_288_554, position.lat().0, 1e-8));
        assert!(is_within_tolerance(20.249_707_175, position.lon().0, 1e-8));

        let report = tracker.progress(quarter).unwrap();
        assert_eq!(1, report.last_waypoint);
        assert_eq!(Degrees(20.0), tracker.resolve(Metres(0.0)).unwrap().lon());

        // the start reports the first leg with a length
        let start = tracker.progress(Metres(0.0)).unwrap();
        assert_eq!(1, start.last_waypoint);
        assert_eq!(report.leg_length, start.leg_length);
        assert!(0.0 < start.leg_length.0);
        assert_eq!(Metres(0.0), start.distance_along_leg);
    }

    #[test]
    fn test_resolve_nearly_antipodal_equator() {
        let route = Route::from_lat_lon(&[(0.0, 0.0), (0.0, 179.5)]).unwrap();
        let tracker = RouteTracker::new(route, EllipsoidalMetric::default()).unwrap();
        let length = tracker.table().total_length();
        assert!(is_within_tolerance(19_980_861.909, length.0, 1e-3));

        // the geodesic leaves the Equator, its vertex is half way along
        let midpoint = tracker.resolve(Metres(length.0 / 2.0)).unwrap();
        assert!(is_within_tolerance(34.122_809_329, midpoint.lat().0.abs(), 1e-6));
        assert!(is_within_tolerance(89.75, midpoint.lon().0, 1e-6));

        for fraction in [0.1, 0.25, 0.75, 0.9] {
            let position = tracker.resolve(Metres(fraction * length.0)).unwrap();
            assert!(0.0 < position.lon().0 && position.lon().0 < 179.5);
            assert!(0.0 < position.lat().0.abs());
        }
    }

    /// Counts the events emitted while it is the default subscriber.
    struct EventCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for EventCounter {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}
        fn event(&self, _event: &tracing::Event<'_>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn enter(&self, _span: &tracing::span::Id) {}
        fn exit(&self, _span: &tracing::span::Id) {}
    }

    #[test]
    fn test_progress_clamps_once() {
        let tracker = RouteTracker::new(exmouth_to_la_gomera(), SphericalMetric::default()).unwrap();
        let beyond = Metres(tracker.table().total_length().0 + 1000.0);

        let count = Arc::new(AtomicUsize::new(0));
        let report = tracing::subscriber::with_default(EventCounter(count.clone()), || {
            tracker.progress(beyond).unwrap()
        });
        assert_eq!(1, count.load(Ordering::SeqCst));
        assert!(report.is_finished());
    }

    #[test]
    fn test_progress() {
        let tracker = RouteTracker::new(multi_leg_route(), EllipsoidalMetric::default()).unwrap();
        let total = tracker.table().total_length();

        let start = tracker.progress(Metres(0.0)).unwrap();
        assert_eq!(0, start.last_waypoint);
        assert_eq!(tracker.table().leg_distances()[1], start.leg_length);
        assert_eq!(Metres(0.0), start.distance_along_leg);
        assert_eq!(total, start.remaining);
        assert_eq!(0.0, start.fraction);
        assert!(!start.is_finished());

        let distance = Metres(1_000_000.0);
        let report = tracker.progress(distance).unwrap();
        assert_eq!(2, report.last_waypoint);
        assert_eq!(tracker.table().leg_distances()[3], report.leg_length);
        assert!(is_within_tolerance(
            1_000_000.0 - 980_350.052,
            report.distance_along_leg.0,
            1e-2
        ));
        assert!(is_within_tolerance(
            total.0 - 1_000_000.0,
            report.remaining.0,
            1e-6
        ));
        assert!(is_within_tolerance(
            1_000_000.0 / total.0,
            report.fraction,
            f64::EPSILON
        ));
        assert_eq!(Metres(0.0), report.overrun);
        assert_eq!(tracker.resolve(distance).unwrap(), report.position);

        let beyond = tracker.progress(Metres(total.0 + 500.0)).unwrap();
        assert_eq!(5, beyond.last_waypoint);
        assert_eq!(Metres(0.0), beyond.remaining);
        assert_eq!(1.0, beyond.fraction);
        assert!(is_within_tolerance(500.0, beyond.overrun.0, 1e-6));
        assert!(beyond.is_finished());
    }
}
