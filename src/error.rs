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

//! The error type returned by the route calculations.

use thiserror::Error;

/// The failures of geodesic and route calculations.
///
/// They all reflect invalid input from the caller: the calculations are
/// deterministic, so none of them is worth retrying.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// A latitude or longitude is out of range or not finite.
    #[error("invalid coordinate: latitude {lat}, longitude {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A route needs at least two distinct waypoints.
    #[error("invalid route: {waypoints} waypoint(s), at least 2 distinct waypoints are required")]
    InvalidRoute { waypoints: usize },

    /// A distance table or route without any waypoints.
    #[error("empty route")]
    EmptyRoute,

    /// A traveled distance that is negative or not finite.
    #[error("invalid distance: {0} metres")]
    InvalidDistance(f64),

    /// A distance table that was not built from the route it is used with.
    #[error("distance table has {table} entries but the route has {route} waypoints")]
    TableMismatch { table: usize, route: usize },
}

/// A `Result` with the crate `Error`.
pub type Result<T> = core::result::Result<T, Error>;
