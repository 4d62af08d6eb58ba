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

//! Series coefficients for geodesic calculations on an ellipsoid.
//!
//! The expansions are those given by CFF Karney in
//! [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf), with
//! `A2` from [Geodesics on an arbitrary ellipsoid of revolution](https://arxiv.org/pdf/2208.00492.pdf).
//! They are truncated at sixth order in `epsilon` and the third flattening `n`,
//! which is sufficient for double precision on the WGS 84 ellipsoid.

use angle_sc::{Angle, Radians};

/// The distance scale factor `A1 - 1`, Karney Eq. 17.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn scale_a1(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * (eps2 * (eps2 + 4.0) + 64.0) / 256.0;
    (t + eps) / (1.0 - eps)
}

/// The reduced length scale factor `A2 - 1`, Karney (2022) Eq. A1.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn scale_a2(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * ((-11.0 * eps2 - 28.0) * eps2 - 192.0) / 256.0;
    (t - eps) / (1.0 + eps)
}

/// The polynomial coefficients of `A3` in `epsilon`, Karney Eq. 23.
/// * `n` - the third flattening.
#[must_use]
pub fn coeffs_a3(n: f64) -> [f64; 6] {
    [
        1.0,
        (n - 1.0) / 2.0,
        (n * (3.0 * n - 1.0) - 2.0) / 8.0,
        ((-n - 3.0) * n - 1.0) / 16.0,
        (-2.0 * n - 3.0) / 64.0,
        -3.0 / 128.0,
    ]
}

/// The Fourier coefficients `C1[l]` of the distance integral `I1`,
/// Karney Eq. 18.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn coeffs_c1(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps;
    let eps5 = eps4 * eps;
    let eps6 = eps5 * eps;
    [
        0.0,
        eps * ((6.0 - eps2) * eps2 - 16.0) / 32.0,
        eps2 * ((64.0 - 9.0 * eps2) * eps2 - 128.0) / 2048.0,
        eps3 * (9.0 * eps2 - 16.0) / 768.0,
        eps4 * (3.0 * eps2 - 5.0) / 512.0,
        eps5 * (-7.0 / 1280.0),
        eps6 * (-7.0 / 2048.0),
    ]
}

/// The Fourier coefficients `C1'[l]` of the inverse of the distance integral,
/// Karney Eq. 21. Used to convert a distance in metres to an arc length.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn coeffs_c1p(eps: f64) -> [f64; 6] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps;
    let eps5 = eps4 * eps;
    [
        0.0,
        eps * (eps2 * (205.0 * eps2 - 432.0) + 768.0) / 1536.0,
        eps2 * (30.0 - 37.0 * eps2) / 96.0,
        eps3 * (116.0 - 225.0 * eps2) / 384.0,
        eps4 * 539.0 / 1536.0,
        eps5 * 3467.0 / 7680.0,
    ]
}

/// The Fourier coefficients `C2[l]` of the reduced length integral `I2`,
/// Karney Eq. 43.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn coeffs_c2(eps: f64) -> [f64; 7] {
    let eps2 = eps * eps;
    let eps3 = eps2 * eps;
    let eps4 = eps3 * eps;
    let eps5 = eps4 * eps;
    let eps6 = eps5 * eps;
    [
        0.0,
        eps * (eps2 * (eps2 + 2.0) + 16.0) / 32.0,
        eps2 * (eps2 * (35.0 * eps2 + 64.0) + 384.0) / 2048.0,
        eps3 * (15.0 * eps2 + 80.0) / 768.0,
        eps4 * (7.0 * eps2 + 35.0) / 512.0,
        eps5 * 63.0 / 1280.0,
        eps6 * 77.0 / 2048.0,
    ]
}

/// The polynomial coefficients in `epsilon` of `C3[l]`, the Fourier
/// coefficients of the longitude integral `I3`, Karney Eq. 25.
/// They depend only upon the ellipsoid, so they are calculated once per
/// `Ellipsoid`.
/// * `n` - the third flattening.
#[must_use]
pub fn coeffs_c3x(n: f64) -> [f64; 15] {
    [
        (1.0 - n) / 4.0,
        (1.0 - n * n) / 8.0,
        (n * ((-5.0 * n - 1.0) * n + 3.0) + 3.0) / 64.0,
        (n * ((2.0 - 2.0 * n) * n + 2.0) + 5.0) / 128.0,
        (n * (3.0 * n + 11.0) + 12.0) / 512.0,
        ((n - 3.0) * n + 2.0) / 32.0,
        (n * (n * (2.0 * n - 3.0) - 2.0) + 3.0) / 64.0,
        (n * ((-6.0 * n - 9.0) * n + 2.0) + 6.0) / 256.0,
        ((1.0 - 2.0 * n) * n + 5.0) / 256.0,
        (n * ((5.0 - n) * n - 9.0) + 5.0) / 192.0,
        (n * (n * (10.0 * n - 6.0) - 10.0) + 9.0) / 384.0,
        ((-77.0 * n - 8.0) * n + 42.0) / 3072.0,
        (n * ((20.0 - 7.0 * n) * n - 28.0) + 14.0) / 1024.0,
        ((-7.0 * n - 40.0) * n + 28.0) / 2048.0,
        (n * (75.0 * n - 90.0) + 42.0) / 5120.0,
    ]
}

/// Evaluate a polynomial in `x` by Horner's method.
/// * `coeffs` - the coefficients, lowest order first.
/// * `x` - the variable.
#[must_use]
pub fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |result, coeff| result.mul_add(x, *coeff))
}

/// The Fourier coefficients `C3[l]` for a geodesic, Karney Eq. 26.
/// * `c3x` - the ellipsoid coefficients from `coeffs_c3x`.
/// * `eps` - the series expansion variable of the geodesic.
#[must_use]
pub fn coeffs_c3(c3x: &[f64; 15], eps: f64) -> [f64; 6] {
    // c3x holds the polynomials for l = 1..=5, in decreasing lengths
    const RANGES: [(usize, usize); 5] = [(0, 5), (5, 9), (9, 12), (12, 14), (14, 15)];

    let mut result = [0.0; 6];
    let mut eps_l = 1.0;
    for (l, (start, end)) in RANGES.iter().enumerate() {
        eps_l *= eps;
        result[l + 1] = eps_l * polynomial(&c3x[*start..*end], eps);
    }
    result
}

/// Evaluate `sum(coeffs[l] * sin(2 * l * angle), l = 1..coeffs.len())`
/// by [Clenshaw summation](https://en.wikipedia.org/wiki/Clenshaw_algorithm).
/// `coeffs[0]` is ignored.
/// * `coeffs` - the Fourier coefficients.
/// * `angle` - the Angle.
#[must_use]
pub fn sin_series(coeffs: &[f64], angle: Angle) -> Radians {
    let angle2x = angle.double();
    let sin_2x = angle2x.sin().0;
    if libm::fabs(sin_2x) < f64::EPSILON {
        return Radians(0.0);
    }

    let two_cos_2x = 2.0 * angle2x.cos().0;
    let (b1, _) = coeffs
        .iter()
        .skip(1)
        .rev()
        .fold((0.0, 0.0), |(b1, b2): (f64, f64), coeff| {
            (two_cos_2x.mul_add(b1, coeff - b2), b1)
        });
    Radians(sin_2x * b1)
}
