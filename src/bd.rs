//! Bjøntegaard-Delta rate and PSNR.
//!
//! Both metrics compare an anchor and a test RD curve by the average gap
//! between their fitted curves over the range the two curves share.
//!
//! - **BD-PSNR** fits distortion as a function of `log10(rate)` and reports
//!   the mean vertical distance `test − anchor` over the common log-rate
//!   range, in distortion units. Positive means the test curve has higher
//!   quality at equal rate.
//! - **BD-Rate** fits `log10(rate)` as a function of distortion and averages
//!   the horizontal distance over the common distortion range. A constant
//!   offset in log-rate is a constant rate ratio, so the result is reported
//!   as `(10^Δ − 1) × 100` percent. Negative means the test curve needs less
//!   rate for equal quality.
//!
//! Each computation is independent and owns its fitted curves; nothing is
//! cached between calls.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interpolation::{Method, PiecewiseCurve};
use crate::rd::RdCurve;

/// Which Bjøntegaard-Delta metric to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BdMetric {
    /// Average rate difference in percent at equal distortion.
    Rate,
    /// Average distortion difference at equal rate.
    Psnr,
}

impl BdMetric {
    /// Short label for reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rate => "BD-Rate",
            Self::Psnr => "BD-PSNR",
        }
    }
}

/// Options for a BD computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BdOptions {
    /// Interpolation method (default: PCHIP).
    pub method: Method,
    /// Require anchor and test to have the same number of points (default: true).
    pub require_matching_points: bool,
    /// Keep the fitted curves in [`BdResult::curves`] (default: false).
    pub return_curves: bool,
    /// Warn when the overlap covers less than this fraction of the combined
    /// range of both curves (default: 0.0, never warn).
    pub min_overlap: f64,
}

impl Default for BdOptions {
    fn default() -> Self {
        Self {
            method: Method::Pchip,
            require_matching_points: true,
            return_curves: false,
            min_overlap: 0.0,
        }
    }
}

impl BdOptions {
    /// Sets the interpolation method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets whether anchor and test must have equal point counts.
    #[must_use]
    pub fn with_require_matching_points(mut self, require: bool) -> Self {
        self.require_matching_points = require;
        self
    }

    /// Sets whether fitted curves are returned with the result.
    #[must_use]
    pub fn with_return_curves(mut self, return_curves: bool) -> Self {
        self.return_curves = return_curves;
        self
    }

    /// Sets the overlap fraction below which a warning is emitted.
    #[must_use]
    pub fn with_min_overlap(mut self, min_overlap: f64) -> Self {
        self.min_overlap = min_overlap.clamp(0.0, 1.0);
        self
    }
}

/// A closed interval on a fitting axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

impl Domain {
    /// Domain of a fitted curve.
    #[must_use]
    pub fn of(curve: &PiecewiseCurve) -> Self {
        let (min, max) = curve.domain();
        Self { min, max }
    }

    /// Width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Common part of two domains, `None` unless it is wider than a point.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (max > min).then_some(Self { min, max })
    }

    /// Smallest domain containing both.
    #[must_use]
    pub fn hull(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Anchor and test curves fitted for one metric.
#[derive(Debug, Clone, Serialize)]
pub struct FittedPair {
    /// Curve fitted to the anchor points.
    pub anchor: PiecewiseCurve,
    /// Curve fitted to the test points.
    pub test: PiecewiseCurve,
}

/// Outcome of a BD computation.
#[derive(Debug, Clone, Serialize)]
pub struct BdResult {
    /// Metric that was computed.
    pub metric: BdMetric,
    /// Interpolation method used.
    pub method: Method,
    /// BD-Rate in percent or BD-PSNR in distortion units.
    pub value: f64,
    /// Integration interval on the fitting axis.
    pub overlap: Domain,
    /// Overlap width divided by the width of the combined range.
    pub overlap_fraction: f64,
    /// Fitted curves, present when [`BdOptions::return_curves`] is set.
    pub curves: Option<FittedPair>,
}

/// Computes BD metrics between validated RD curves.
#[derive(Debug, Clone, Default)]
pub struct BdEngine {
    options: BdOptions,
}

impl BdEngine {
    /// Create an engine with the given options.
    #[must_use]
    pub fn new(options: BdOptions) -> Self {
        Self { options }
    }

    /// Options this engine was built with.
    #[must_use]
    pub fn options(&self) -> &BdOptions {
        &self.options
    }

    /// BD-Rate in percent.
    pub fn bd_rate(&self, anchor: &RdCurve, test: &RdCurve) -> Result<f64> {
        self.compute(anchor, test, BdMetric::Rate).map(|r| r.value)
    }

    /// BD-PSNR in distortion units.
    pub fn bd_psnr(&self, anchor: &RdCurve, test: &RdCurve) -> Result<f64> {
        self.compute(anchor, test, BdMetric::Psnr).map(|r| r.value)
    }

    /// Fit both curves, integrate over their overlap and derive `metric`.
    pub fn compute(&self, anchor: &RdCurve, test: &RdCurve, metric: BdMetric) -> Result<BdResult> {
        if self.options.require_matching_points && anchor.len() != test.len() {
            return Err(Error::PointCountMismatch {
                anchor: anchor.len(),
                test: test.len(),
            });
        }

        let method = self.options.method;
        let f_anchor = fit_for_metric(anchor, metric, method, "anchor")?;
        let f_test = fit_for_metric(test, metric, method, "test")?;

        let (overlap, overlap_fraction) = overlap(&f_anchor, &f_test)?;
        if overlap_fraction < self.options.min_overlap {
            tracing::warn!(
                overlap = overlap_fraction * 100.0,
                min_overlap = self.options.min_overlap * 100.0,
                "insufficient curve overlap"
            );
        }

        let integrated_anchor = f_anchor.integrate(overlap.min, overlap.max)?;
        let integrated_test = f_test.integrate(overlap.min, overlap.max)?;
        let avg = (integrated_test - integrated_anchor) / overlap.width();

        let value = match metric {
            BdMetric::Psnr => avg,
            BdMetric::Rate => (10_f64.powf(avg) - 1.0) * 100.0,
        };
        tracing::debug!(
            metric = metric.label(),
            method = method.name(),
            value,
            overlap_min = overlap.min,
            overlap_max = overlap.max,
            "computed BD metric"
        );

        let curves = self.options.return_curves.then(|| FittedPair {
            anchor: f_anchor,
            test: f_test,
        });
        Ok(BdResult {
            metric,
            method,
            value,
            overlap,
            overlap_fraction,
            curves,
        })
    }
}

/// Fit `curve` on the axis orientation `metric` integrates over.
pub(crate) fn fit_for_metric(
    curve: &RdCurve,
    metric: BdMetric,
    method: Method,
    label: &str,
) -> Result<PiecewiseCurve> {
    let (xs, ys) = match metric {
        BdMetric::Psnr => curve.log_rate_knots(),
        BdMetric::Rate => {
            if !curve.is_monotone() {
                tracing::warn!(curve = label, "distortion is not monotone in rate");
            }
            curve.distortion_knots(label)?
        }
    };
    method.fit(&xs, &ys)
}

/// Overlap of two fitted curves and its share of their combined range.
pub(crate) fn overlap(anchor: &PiecewiseCurve, test: &PiecewiseCurve) -> Result<(Domain, f64)> {
    let a = Domain::of(anchor);
    let t = Domain::of(test);
    let common = a.intersection(&t).ok_or(Error::NoOverlap {
        anchor: (a.min, a.max),
        test: (t.min, t.max),
    })?;
    Ok((common, common.width() / a.hull(&t).width()))
}

/// Validate point counts before any sorting or fitting.
fn check_points(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    require_matching_points: bool,
) -> Result<()> {
    for (label, rates, dists) in [
        ("anchor", rate_anchor, dist_anchor),
        ("test", rate_test, dist_test),
    ] {
        if rates.len() != dists.len() {
            return Err(Error::LengthMismatch {
                curve: label.to_string(),
                rates: rates.len(),
                distortions: dists.len(),
            });
        }
        if rates.len() < 2 {
            return Err(Error::degenerate(
                label,
                format!("at least 2 RD points are required, got {}", rates.len()),
            ));
        }
    }
    if require_matching_points && rate_anchor.len() != rate_test.len() {
        return Err(Error::PointCountMismatch {
            anchor: rate_anchor.len(),
            test: rate_test.len(),
        });
    }
    Ok(())
}

/// Compute `metric` from raw rate/distortion sequences.
///
/// Honours every field of `options`, including [`BdOptions::return_curves`].
pub fn bd_delta(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    metric: BdMetric,
    options: &BdOptions,
) -> Result<BdResult> {
    check_points(
        rate_anchor,
        dist_anchor,
        rate_test,
        dist_test,
        options.require_matching_points,
    )?;
    let anchor = RdCurve::from_slices("anchor", rate_anchor, dist_anchor)?;
    let test = RdCurve::from_slices("test", rate_test, dist_test)?;
    BdEngine::new(options.clone()).compute(&anchor, &test, metric)
}

/// Bjøntegaard-Delta rate in percent.
///
/// # Example
///
/// ```
/// use bd_metrics::{BdOptions, Method, bd_rate};
///
/// let rate_anchor = [9487.76, 4593.60, 2486.44, 1358.24];
/// let psnr_anchor = [40.037, 38.615, 36.845, 34.851];
/// let rate_test = [9787.80, 4469.00, 2451.52, 1356.24];
/// let psnr_test = [40.121, 38.651, 36.970, 34.987];
///
/// let options = BdOptions::default().with_method(Method::Akima);
/// let rate = bd_rate(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &options).unwrap();
/// assert!(rate.is_finite() && rate.abs() < 20.0);
/// ```
pub fn bd_rate(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    options: &BdOptions,
) -> Result<f64> {
    bd_delta(rate_anchor, dist_anchor, rate_test, dist_test, BdMetric::Rate, options)
        .map(|r| r.value)
}

/// Bjøntegaard-Delta PSNR in distortion units.
///
/// # Example
///
/// ```
/// use bd_metrics::{BdOptions, bd_psnr};
///
/// let rate = [1000.0, 2000.0, 4000.0, 8000.0];
/// let anchor = [30.0, 33.0, 36.0, 39.0];
/// let test = [30.5, 33.5, 36.5, 39.5];
///
/// let psnr = bd_psnr(&rate, &anchor, &rate, &test, &BdOptions::default()).unwrap();
/// assert!((psnr - 0.5).abs() < 1e-9);
/// ```
pub fn bd_psnr(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    options: &BdOptions,
) -> Result<f64> {
    bd_delta(rate_anchor, dist_anchor, rate_test, dist_test, BdMetric::Psnr, options)
        .map(|r| r.value)
}
