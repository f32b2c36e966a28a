//! Immutable piecewise cubic curves produced by a fit.

use serde::Serialize;

use super::{Method, linspace};
use crate::error::{Error, Result};

/// One cubic piece `f(t) = a + b·t + c·t² + d·t³` with `t = x - x_i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicSegment {
    /// Constant coefficient (value at the left knot).
    pub a: f64,
    /// Linear coefficient (slope at the left knot).
    pub b: f64,
    /// Quadratic coefficient.
    pub c: f64,
    /// Cubic coefficient.
    pub d: f64,
}

impl CubicSegment {
    /// Value at local offset `t`.
    #[must_use]
    pub fn value(&self, t: f64) -> f64 {
        self.a + t * (self.b + t * (self.c + t * self.d))
    }

    /// First derivative at local offset `t`.
    #[must_use]
    pub fn slope(&self, t: f64) -> f64 {
        self.b + t * (2.0 * self.c + t * 3.0 * self.d)
    }

    /// Antiderivative `a·t + b·t²/2 + c·t³/3 + d·t⁴/4`, zero at `t = 0`.
    #[must_use]
    pub fn antiderivative(&self, t: f64) -> f64 {
        t * (self.a + t * (self.b / 2.0 + t * (self.c / 3.0 + t * self.d / 4.0)))
    }
}

/// Piecewise cubic over sorted breakpoints.
///
/// Segment `i` is valid on `[x_i, x_{i+1})`; the last segment also owns the
/// right end of the domain. A curve is never modified once fitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiecewiseCurve {
    method: Method,
    breakpoints: Vec<f64>,
    segments: Vec<CubicSegment>,
}

impl PiecewiseCurve {
    pub(super) fn from_parts(
        method: Method,
        breakpoints: Vec<f64>,
        segments: Vec<CubicSegment>,
    ) -> Self {
        debug_assert_eq!(breakpoints.len(), segments.len() + 1);
        Self {
            method,
            breakpoints,
            segments,
        }
    }

    /// Method this curve was fitted with.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Sorted knot positions.
    #[must_use]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Segment coefficients, indexed by interval.
    #[must_use]
    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`: a fitted curve has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `(x_min, x_max)` of the fitted data.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.breakpoints[0], self.breakpoints[self.breakpoints.len() - 1])
    }

    /// Evaluate the curve at `x`.
    ///
    /// Fails with [`Error::OutOfDomain`] outside `[x_min, x_max]`.
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        self.check_range(x, x)?;
        let i = self.segment_index(x);
        Ok(self.segments[i].value(x - self.breakpoints[i]))
    }

    /// First derivative at `x`, same domain rule as [`evaluate`](Self::evaluate).
    pub fn derivative(&self, x: f64) -> Result<f64> {
        self.check_range(x, x)?;
        let i = self.segment_index(x);
        Ok(self.segments[i].slope(x - self.breakpoints[i]))
    }

    /// Definite integral over `[low, high]` in closed form.
    ///
    /// Requires `low <= high` with both bounds inside the domain.
    pub fn integrate(&self, low: f64, high: f64) -> Result<f64> {
        self.check_range(low, high)?;

        let mut total = 0.0;
        let mut i = self.segment_index(low);
        while i < self.segments.len() && self.breakpoints[i] < high {
            let origin = self.breakpoints[i];
            let from = low.max(origin);
            let to = high.min(self.breakpoints[i + 1]);
            let segment = &self.segments[i];
            total += segment.antiderivative(to - origin) - segment.antiderivative(from - origin);
            i += 1;
        }
        Ok(total)
    }

    /// `n` evenly spaced `(x, f(x))` pairs over the whole domain.
    pub fn sample(&self, n: usize) -> Result<Vec<(f64, f64)>> {
        let (min, max) = self.domain();
        self.sample_range(min, max, n)
    }

    /// `n` evenly spaced `(x, f(x))` pairs over `[low, high]`.
    pub fn sample_range(&self, low: f64, high: f64, n: usize) -> Result<Vec<(f64, f64)>> {
        if n < 2 {
            return Err(Error::degenerate(
                "sample",
                format!("at least 2 samples are required, got {n}"),
            ));
        }
        self.check_range(low, high)?;
        linspace(low, high, n)
            .into_iter()
            .map(|x| Ok((x, self.evaluate(x)?)))
            .collect()
    }

    fn check_range(&self, low: f64, high: f64) -> Result<()> {
        let (min, max) = self.domain();
        // Written so that NaN bounds fail too.
        let inside = low >= min && high <= max && low <= high;
        if inside {
            Ok(())
        } else {
            Err(Error::OutOfDomain {
                low,
                high,
                min,
                max,
            })
        }
    }

    fn segment_index(&self, x: f64) -> usize {
        self.breakpoints
            .partition_point(|&b| b <= x)
            .saturating_sub(1)
            .min(self.segments.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parabola() -> PiecewiseCurve {
        // y = x² on [0, 2] split at 1: exact in cubic form.
        PiecewiseCurve::from_parts(
            Method::Cubic,
            vec![0.0, 1.0, 2.0],
            vec![
                CubicSegment { a: 0.0, b: 0.0, c: 1.0, d: 0.0 },
                CubicSegment { a: 1.0, b: 2.0, c: 1.0, d: 0.0 },
            ],
        )
    }

    #[test]
    fn test_segment_value_and_antiderivative() {
        let seg = CubicSegment { a: 1.0, b: 2.0, c: 3.0, d: 4.0 };
        assert_eq!(seg.value(0.0), 1.0);
        assert_eq!(seg.value(1.0), 10.0);
        assert_eq!(seg.slope(1.0), 2.0 + 6.0 + 12.0);
        // 1 + 1 + 1 + 1
        assert!((seg.antiderivative(1.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_locates_segment() {
        let curve = parabola();
        assert_eq!(curve.evaluate(0.0).unwrap(), 0.0);
        assert!((curve.evaluate(0.5).unwrap() - 0.25).abs() < 1e-12);
        assert!((curve.evaluate(1.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((curve.evaluate(1.5).unwrap() - 2.25).abs() < 1e-12);
        assert!((curve.evaluate(2.0).unwrap() - 4.0).abs() < 1e-12);
        assert!((curve.derivative(1.5).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_out_of_domain() {
        let curve = parabola();
        assert!(matches!(curve.evaluate(-0.01), Err(Error::OutOfDomain { .. })));
        assert!(matches!(curve.evaluate(2.01), Err(Error::OutOfDomain { .. })));
        assert!(matches!(curve.evaluate(f64::NAN), Err(Error::OutOfDomain { .. })));
    }

    #[test]
    fn test_integrate_closed_form() {
        let curve = parabola();
        // ∫₀² x² dx = 8/3
        assert!((curve.integrate(0.0, 2.0).unwrap() - 8.0 / 3.0).abs() < 1e-12);
        // ∫₀.₅^1.5 x² dx = (3.375 - 0.125) / 3
        assert!((curve.integrate(0.5, 1.5).unwrap() - 3.25 / 3.0).abs() < 1e-12);
        assert_eq!(curve.integrate(1.2, 1.2).unwrap(), 0.0);
    }

    #[test]
    fn test_integrate_is_additive() {
        let curve = parabola();
        let (a, b, c) = (0.3, 1.1, 1.9);
        let whole = curve.integrate(a, c).unwrap();
        let split = curve.integrate(a, b).unwrap() + curve.integrate(b, c).unwrap();
        assert!((whole - split).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_rejects_bad_bounds() {
        let curve = parabola();
        assert!(matches!(curve.integrate(1.5, 0.5), Err(Error::OutOfDomain { .. })));
        assert!(matches!(curve.integrate(-1.0, 1.0), Err(Error::OutOfDomain { .. })));
        assert!(matches!(curve.integrate(0.0, 2.5), Err(Error::OutOfDomain { .. })));
    }

    #[test]
    fn test_sample_covers_domain() {
        let curve = parabola();
        let samples = curve.sample(5).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], (0.0, 0.0));
        assert_eq!(samples[4].0, 2.0);
        assert!((samples[2].1 - 1.0).abs() < 1e-12);
        assert!(curve.sample(1).is_err());
    }
}
