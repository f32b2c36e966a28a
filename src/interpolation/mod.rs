//! Piecewise-cubic interpolation of rate-distortion samples.
//!
//! Three interchangeable solvers turn ordered knots `(x_i, y_i)` into a
//! [`PiecewiseCurve`]: one cubic polynomial per interval between knots.
//!
//! ## Methods
//!
//! - [`Method::Cubic`]: natural cubic spline. C² continuous, zero second
//!   derivative at both ends. Can overshoot near sharp bends.
//! - [`Method::Pchip`]: piecewise cubic Hermite with Fritsch-Carlson slopes.
//!   C¹ and shape preserving: no new extrema between monotone knots.
//! - [`Method::Akima`]: piecewise cubic Hermite with Akima's locally weighted
//!   slopes. C¹, insensitive to single outlier knots.
//!
//! All fitted curves interpolate their knots exactly and can be evaluated and
//! integrated in closed form inside their domain. Extrapolation is an error.
//!
//! ## Example
//!
//! ```
//! use bd_metrics::interpolation::Method;
//!
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 1.5, 1.75];
//!
//! let curve = Method::Pchip.fit(&xs, &ys).unwrap();
//! assert!((curve.evaluate(2.0).unwrap() - 1.5).abs() < 1e-12);
//! assert!(curve.evaluate(3.5).is_err());
//! ```

mod akima;
mod curve;
mod natural;
mod pchip;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use curve::{CubicSegment, PiecewiseCurve};

/// Interpolation method used to fit a [`PiecewiseCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Natural cubic spline.
    Cubic,
    /// Piecewise cubic Hermite interpolating polynomial (monotone).
    #[default]
    Pchip,
    /// Akima interpolation.
    Akima,
}

impl Method {
    /// All supported methods, in reporting order.
    pub const ALL: [Self; 3] = [Self::Cubic, Self::Pchip, Self::Akima];

    /// Lowercase method name as accepted by [`FromStr`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Pchip => "pchip",
            Self::Akima => "akima",
        }
    }

    /// Fit a piecewise cubic through the knots `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing and finite, `ys` finite, both of the
    /// same length and at least two knots long.
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<PiecewiseCurve> {
        check_knots(xs, ys)?;

        let segments = match self {
            Self::Cubic => natural::segments(xs, ys),
            Self::Pchip => hermite_segments(xs, ys, &pchip::slopes(xs, ys)),
            Self::Akima => hermite_segments(xs, ys, &akima::slopes(xs, ys)),
        };

        let curve = PiecewiseCurve::from_parts(*self, xs.to_vec(), segments);
        tracing::debug!(
            method = self.name(),
            knots = xs.len(),
            x_min = xs[0],
            x_max = xs[xs.len() - 1],
            "fitted piecewise cubic"
        );
        Ok(curve)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cubic" => Ok(Self::Cubic),
            "pchip" => Ok(Self::Pchip),
            "akima" => Ok(Self::Akima),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Validate knots before any solver touches them.
fn check_knots(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(Error::LengthMismatch {
            curve: "knots".to_string(),
            rates: xs.len(),
            distortions: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(Error::degenerate(
            "knots",
            format!("at least 2 points are required, got {}", xs.len()),
        ));
    }
    if let Some(v) = xs.iter().chain(ys).find(|v| !v.is_finite()) {
        return Err(Error::degenerate("knots", format!("non-finite value {v}")));
    }
    for w in xs.windows(2) {
        if w[1] <= w[0] {
            return Err(Error::degenerate(
                "knots",
                format!("x values must be strictly increasing ({} then {})", w[0], w[1]),
            ));
        }
    }
    Ok(())
}

/// Secant slope of every interval.
fn secants(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
        .collect()
}

/// Convert knot values and knot slopes into per-interval power-basis cubics.
///
/// For interval `i` with width `h` and secant `s`:
///
/// `f(t) = y_i + d_i t + (3s - 2d_i - d_{i+1}) / h · t² + (d_i + d_{i+1} - 2s) / h² · t³`
fn hermite_segments(xs: &[f64], ys: &[f64], slopes: &[f64]) -> Vec<CubicSegment> {
    (0..xs.len() - 1)
        .map(|i| {
            let h = xs[i + 1] - xs[i];
            let s = (ys[i + 1] - ys[i]) / h;
            let (d0, d1) = (slopes[i], slopes[i + 1]);
            CubicSegment {
                a: ys[i],
                b: d0,
                c: (3.0 * s - 2.0 * d0 - d1) / h,
                d: (d0 + d1 - 2.0 * s) / (h * h),
            }
        })
        .collect()
}

/// `n` evenly spaced values covering `[low, high]`, both ends included exactly.
pub(crate) fn linspace(low: f64, high: f64, n: usize) -> Vec<f64> {
    let step = (high - low) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { high } else { low + step * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anchor curve from a typical video codec comparison, in log10-rate space.
    fn rd_knots() -> (Vec<f64>, Vec<f64>) {
        let rates = [1358.24, 2486.44, 4593.60, 9487.76];
        let psnr = [34.851, 36.845, 38.615, 40.037];
        (rates.iter().map(|r: &f64| r.log10()).collect(), psnr.to_vec())
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("cubic".parse::<Method>().unwrap(), Method::Cubic);
        assert_eq!("PCHIP".parse::<Method>().unwrap(), Method::Pchip);
        assert_eq!(" akima ".parse::<Method>().unwrap(), Method::Akima);

        let err = "spline".parse::<Method>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(ref m) if m == "spline"));
    }

    #[test]
    fn test_method_display_roundtrips() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
        assert_eq!(Method::default(), Method::Pchip);
    }

    #[test]
    fn test_method_serde_lowercase() {
        let json = serde_json::to_string(&Method::Akima).unwrap();
        assert_eq!(json, "\"akima\"");
        let method: Method = serde_json::from_str("\"cubic\"").unwrap();
        assert_eq!(method, Method::Cubic);
    }

    #[test]
    fn test_all_methods_reproduce_knots() {
        let (xs, ys) = rd_knots();
        for method in Method::ALL {
            let curve = method.fit(&xs, &ys).unwrap();
            for (x, y) in xs.iter().zip(&ys) {
                let v = curve.evaluate(*x).unwrap();
                assert!((v - y).abs() < 1e-9, "{method} at x={x}: expected {y}, got {v}");
            }
        }
    }

    #[test]
    fn test_two_knots_are_linear() {
        let xs = [1.0, 3.0];
        let ys = [10.0, 14.0];
        for method in Method::ALL {
            let curve = method.fit(&xs, &ys).unwrap();
            assert_eq!(curve.len(), 1);
            assert!((curve.evaluate(2.0).unwrap() - 12.0).abs() < 1e-12, "{method}");
            assert!((curve.evaluate(2.5).unwrap() - 13.0).abs() < 1e-12, "{method}");
        }
    }

    #[test]
    fn test_rejects_coincident_x() {
        let xs = [1.0, 2.0, 2.0, 3.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        for method in Method::ALL {
            let err = method.fit(&xs, &ys).unwrap_err();
            assert!(matches!(err, Error::DegenerateInput { .. }), "{method}: {err}");
        }
    }

    #[test]
    fn test_rejects_too_few_and_non_finite() {
        assert!(matches!(
            Method::Cubic.fit(&[1.0], &[1.0]),
            Err(Error::DegenerateInput { .. })
        ));
        assert!(matches!(
            Method::Akima.fit(&[1.0, 2.0, 3.0], &[1.0, f64::NAN, 3.0]),
            Err(Error::DegenerateInput { .. })
        ));
        assert!(matches!(
            Method::Pchip.fit(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_monotone_methods_preserve_shape() {
        // Increasing data with a sharp knee between the second and third knot.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.1, 0.2, 3.0, 3.05];
        let curve = Method::Pchip.fit(&xs, &ys).unwrap();
        let samples = curve.sample(401).unwrap();
        for w in samples.windows(2) {
            assert!(w[1].1 >= w[0].1 - 1e-12, "pchip not monotone at x={}", w[1].0);
        }

        let (xs, ys) = rd_knots();
        for method in [Method::Pchip, Method::Akima] {
            let curve = method.fit(&xs, &ys).unwrap();
            let samples = curve.sample(401).unwrap();
            for w in samples.windows(2) {
                assert!(w[1].1 >= w[0].1 - 1e-12, "{method} not monotone at x={}", w[1].0);
            }
        }
    }

    #[test]
    fn test_natural_spline_overshoots_step() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 0.0, 1.0, 1.0];

        let cubic = Method::Cubic.fit(&xs, &ys).unwrap();
        let min = cubic
            .sample(301)
            .unwrap()
            .iter()
            .map(|(_, y)| *y)
            .fold(f64::INFINITY, f64::min);
        assert!(min < -0.1, "natural spline should undershoot, min = {min}");

        let pchip = Method::Pchip.fit(&xs, &ys).unwrap();
        for (x, y) in pchip.sample(301).unwrap() {
            assert!((-1e-12..=1.0 + 1e-12).contains(&y), "pchip out of range at x={x}: {y}");
        }
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.1, 0.7, 7);
        assert_eq!(v.len(), 7);
        assert_eq!(v[0], 0.1);
        assert_eq!(v[6], 0.7);
        assert!((v[3] - 0.4).abs() < 1e-12);
    }
}
