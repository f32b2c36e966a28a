//! Dense curve comparison for plotting and method cross-checks.
//!
//! [`CurveComparator`] samples both fitted curves over their overlap and
//! reports the pointwise relative curve difference (RCD): the horizontal rate
//! gap at equal distortion and the vertical distortion gap at equal rate.
//! Averaging an RCD over the overlap gives back the matching BD metric.
//!
//! [`compare_methods`] runs the BD computation with every interpolation
//! method so their results can be put side by side.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bd::{BdEngine, BdMetric, BdOptions, Domain, FittedPair, fit_for_metric, overlap};
use crate::error::{Error, Result};
use crate::interpolation::{Method, linspace};
use crate::rd::RdCurve;
use crate::stats::Summary;

/// Rate gap at one distortion level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalSample {
    /// Distortion level both curves are evaluated at.
    pub distortion: f64,
    /// Interpolated anchor rate.
    pub anchor_rate: f64,
    /// Interpolated test rate.
    pub test_rate: f64,
    /// `(test_rate / anchor_rate − 1) × 100`.
    pub rate_difference: f64,
}

/// Distortion gap at one rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalSample {
    /// Rate both curves are evaluated at.
    pub rate: f64,
    /// Interpolated anchor distortion.
    pub anchor_distortion: f64,
    /// Interpolated test distortion.
    pub test_distortion: f64,
    /// `test_distortion − anchor_distortion`.
    pub distortion_difference: f64,
}

/// Anchor and test curves fitted in both orientations with one method.
#[derive(Debug, Clone)]
pub struct CurveComparator {
    method: Method,
    rate_curves: FittedPair,
    distortion_curves: FittedPair,
    distortion_overlap: Domain,
    log_rate_overlap: Domain,
}

impl CurveComparator {
    /// Fit anchor and test with `method`.
    ///
    /// Fails with [`Error::NoOverlap`] if the curves share no range in either
    /// orientation.
    pub fn new(anchor: &RdCurve, test: &RdCurve, method: Method) -> Result<Self> {
        let rate_curves = FittedPair {
            anchor: fit_for_metric(anchor, BdMetric::Rate, method, "anchor")?,
            test: fit_for_metric(test, BdMetric::Rate, method, "test")?,
        };
        let distortion_curves = FittedPair {
            anchor: fit_for_metric(anchor, BdMetric::Psnr, method, "anchor")?,
            test: fit_for_metric(test, BdMetric::Psnr, method, "test")?,
        };
        let (distortion_overlap, _) = overlap(&rate_curves.anchor, &rate_curves.test)?;
        let (log_rate_overlap, _) = overlap(&distortion_curves.anchor, &distortion_curves.test)?;

        Ok(Self {
            method,
            rate_curves,
            distortion_curves,
            distortion_overlap,
            log_rate_overlap,
        })
    }

    /// Method both curves were fitted with.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Curves of `log10(rate)` over distortion.
    #[must_use]
    pub fn rate_curves(&self) -> &FittedPair {
        &self.rate_curves
    }

    /// Curves of distortion over `log10(rate)`.
    #[must_use]
    pub fn distortion_curves(&self) -> &FittedPair {
        &self.distortion_curves
    }

    /// Shared distortion range.
    #[must_use]
    pub fn distortion_overlap(&self) -> Domain {
        self.distortion_overlap
    }

    /// Shared `log10(rate)` range.
    #[must_use]
    pub fn log_rate_overlap(&self) -> Domain {
        self.log_rate_overlap
    }

    /// Horizontal RCD at `n` evenly spaced distortion levels.
    pub fn horizontal(&self, n: usize) -> Result<Vec<HorizontalSample>> {
        check_samples(n)?;
        let Domain { min, max } = self.distortion_overlap;
        linspace(min, max, n)
            .into_iter()
            .map(|distortion| {
                let log_anchor = self.rate_curves.anchor.evaluate(distortion)?;
                let log_test = self.rate_curves.test.evaluate(distortion)?;
                Ok(HorizontalSample {
                    distortion,
                    anchor_rate: 10_f64.powf(log_anchor),
                    test_rate: 10_f64.powf(log_test),
                    rate_difference: (10_f64.powf(log_test - log_anchor) - 1.0) * 100.0,
                })
            })
            .collect()
    }

    /// Vertical RCD at `n` rates evenly spaced in `log10(rate)`.
    pub fn vertical(&self, n: usize) -> Result<Vec<VerticalSample>> {
        check_samples(n)?;
        let Domain { min, max } = self.log_rate_overlap;
        linspace(min, max, n)
            .into_iter()
            .map(|log_rate| {
                let anchor = self.distortion_curves.anchor.evaluate(log_rate)?;
                let test = self.distortion_curves.test.evaluate(log_rate)?;
                Ok(VerticalSample {
                    rate: 10_f64.powf(log_rate),
                    anchor_distortion: anchor,
                    test_distortion: test,
                    distortion_difference: test - anchor,
                })
            })
            .collect()
    }

    /// Statistics of the horizontal rate differences.
    pub fn horizontal_summary(&self, n: usize) -> Result<Summary> {
        let diffs: Vec<f64> = self.horizontal(n)?.iter().map(|s| s.rate_difference).collect();
        Summary::compute(&diffs).ok_or_else(|| Error::degenerate("samples", "no samples"))
    }

    /// Statistics of the vertical distortion differences.
    pub fn vertical_summary(&self, n: usize) -> Result<Summary> {
        let diffs: Vec<f64> =
            self.vertical(n)?.iter().map(|s| s.distortion_difference).collect();
        Summary::compute(&diffs).ok_or_else(|| Error::degenerate("samples", "no samples"))
    }
}

fn check_samples(n: usize) -> Result<()> {
    if n < 2 {
        return Err(Error::degenerate(
            "samples",
            format!("at least 2 samples are required, got {n}"),
        ));
    }
    Ok(())
}

/// BD-Rate and BD-PSNR computed with one interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    /// Interpolation method.
    pub method: Method,
    /// BD-Rate in percent.
    pub bd_rate: f64,
    /// BD-PSNR in distortion units.
    pub bd_psnr: f64,
}

/// Compute both BD metrics with every method in [`Method::ALL`].
///
/// `options.method` is ignored; the other options apply to every run. The
/// runs are independent and execute in parallel. Results keep the order of
/// [`Method::ALL`].
pub fn compare_methods(
    anchor: &RdCurve,
    test: &RdCurve,
    options: &BdOptions,
) -> Result<Vec<MethodComparison>> {
    Method::ALL
        .par_iter()
        .map(|&method| {
            let engine = BdEngine::new(options.clone().with_method(method));
            Ok(MethodComparison {
                method,
                bd_rate: engine.bd_rate(anchor, test)?,
                bd_psnr: engine.bd_psnr(anchor, test)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> RdCurve {
        RdCurve::from_slices(
            "anchor",
            &[9487.76, 4593.60, 2486.44, 1358.24],
            &[40.037, 38.615, 36.845, 34.851],
        )
        .unwrap()
    }

    fn test_curve() -> RdCurve {
        RdCurve::from_slices(
            "test",
            &[9787.80, 4469.00, 2451.52, 1356.24],
            &[40.121, 38.651, 36.970, 34.987],
        )
        .unwrap()
    }

    #[test]
    fn test_identical_curves_have_zero_rcd() {
        let comparator = CurveComparator::new(&anchor(), &anchor(), Method::Pchip).unwrap();
        for s in comparator.horizontal(20).unwrap() {
            assert!(s.rate_difference.abs() < 1e-9);
        }
        for s in comparator.vertical(20).unwrap() {
            assert_eq!(s.distortion_difference, 0.0);
        }
    }

    #[test]
    fn test_scaled_rate_gives_constant_rcd() {
        let a = anchor();
        let scaled: Vec<f64> = a.points().iter().map(|p| p.rate * 0.8).collect();
        let dists: Vec<f64> = a.points().iter().map(|p| p.distortion).collect();
        let t = RdCurve::from_slices("test", &scaled, &dists).unwrap();

        let comparator = CurveComparator::new(&a, &t, Method::Akima).unwrap();
        let samples = comparator.horizontal(10).unwrap();
        assert_eq!(samples.len(), 10);
        for s in &samples {
            assert!((s.rate_difference + 20.0).abs() < 1e-9, "got {}", s.rate_difference);
            assert!((s.test_rate / s.anchor_rate - 0.8).abs() < 1e-9);
        }
        let summary = comparator.horizontal_summary(10).unwrap();
        assert!((summary.mean + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_samples_span_overlap() {
        let comparator = CurveComparator::new(&anchor(), &test_curve(), Method::Cubic).unwrap();
        let overlap = comparator.distortion_overlap();
        let samples = comparator.horizontal(5).unwrap();
        assert_eq!(samples[0].distortion, overlap.min);
        assert_eq!(samples[4].distortion, overlap.max);

        let vertical = comparator.vertical(5).unwrap();
        let log_overlap = comparator.log_rate_overlap();
        assert!((vertical[0].rate.log10() - log_overlap.min).abs() < 1e-12);
        assert!(comparator.vertical_summary(50).unwrap().mean > 0.0);

        assert!(comparator.horizontal(1).is_err());
    }

    #[test]
    fn test_compare_methods_matches_single_runs() {
        let (a, t) = (anchor(), test_curve());
        let options = BdOptions::default();
        let results = compare_methods(&a, &t, &options).unwrap();
        assert_eq!(results.len(), 3);

        for (result, method) in results.iter().zip(Method::ALL) {
            assert_eq!(result.method, method);
            let engine = BdEngine::new(options.clone().with_method(method));
            assert_eq!(result.bd_rate, engine.bd_rate(&a, &t).unwrap());
            assert_eq!(result.bd_psnr, engine.bd_psnr(&a, &t).unwrap());
        }
    }

    #[test]
    fn test_compare_methods_propagates_errors() {
        let short = RdCurve::from_slices("test", &[1000.0, 2000.0], &[35.0, 37.0]).unwrap();
        let err = compare_methods(&anchor(), &short, &BdOptions::default()).unwrap_err();
        assert!(matches!(err, Error::PointCountMismatch { .. }));
    }
}
