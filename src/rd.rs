//! Rate-distortion samples.
//!
//! An [`RdCurve`] is the validated form of one encoder's RD measurements:
//! at least two points, finite values, strictly positive and pairwise
//! distinct rates, sorted by ascending rate. Input may come in any order.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single rate-distortion measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RdPoint {
    /// Rate (bitrate, file size, bits per pixel). Must be positive.
    pub rate: f64,
    /// Distortion or quality metric value (e.g. PSNR in dB).
    pub distortion: f64,
}

impl RdPoint {
    /// Create a new RD point.
    #[must_use]
    pub fn new(rate: f64, distortion: f64) -> Self {
        Self { rate, distortion }
    }

    /// `log10(rate)`, the axis all fitting happens on.
    #[must_use]
    pub fn log_rate(&self) -> f64 {
        self.rate.log10()
    }
}

/// A validated RD curve sorted by ascending rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RdPoint>", into = "Vec<RdPoint>")]
pub struct RdCurve {
    points: Vec<RdPoint>,
}

impl RdCurve {
    /// Validate and sort `points`. `label` names the curve in errors.
    pub fn new(label: &str, mut points: Vec<RdPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::degenerate(
                label,
                format!("at least 2 RD points are required, got {}", points.len()),
            ));
        }
        for p in &points {
            if !p.rate.is_finite() || !p.distortion.is_finite() {
                return Err(Error::degenerate(
                    label,
                    format!("non-finite RD point ({}, {})", p.rate, p.distortion),
                ));
            }
            if p.rate <= 0.0 {
                return Err(Error::degenerate(
                    label,
                    format!("rate must be positive, got {}", p.rate),
                ));
            }
        }

        points.sort_by(|a, b| a.rate.total_cmp(&b.rate));
        if let Some(w) = points.windows(2).find(|w| w[0].rate == w[1].rate) {
            return Err(Error::degenerate(
                label,
                format!("duplicate rate value {}", w[0].rate),
            ));
        }

        Ok(Self { points })
    }

    /// Build a curve from parallel rate and distortion slices.
    pub fn from_slices(label: &str, rates: &[f64], distortions: &[f64]) -> Result<Self> {
        if rates.len() != distortions.len() {
            return Err(Error::LengthMismatch {
                curve: label.to_string(),
                rates: rates.len(),
                distortions: distortions.len(),
            });
        }
        let points = rates
            .iter()
            .zip(distortions)
            .map(|(&rate, &distortion)| RdPoint::new(rate, distortion))
            .collect();
        Self::new(label, points)
    }

    /// Points in ascending rate order.
    #[must_use]
    pub fn points(&self) -> &[RdPoint] {
        &self.points
    }

    /// Number of points (always at least 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a validated curve has at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Knots with `x = log10(rate)` and `y = distortion`, ascending in `x`.
    #[must_use]
    pub fn log_rate_knots(&self) -> (Vec<f64>, Vec<f64>) {
        self.points.iter().map(|p| (p.log_rate(), p.distortion)).unzip()
    }

    /// Knots with `x = distortion` and `y = log10(rate)`, ascending in `x`.
    ///
    /// Fails when two points share a distortion value.
    pub fn distortion_knots(&self, label: &str) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut by_distortion: Vec<&RdPoint> = self.points.iter().collect();
        by_distortion.sort_by(|a, b| a.distortion.total_cmp(&b.distortion));
        if let Some(w) = by_distortion.windows(2).find(|w| w[0].distortion == w[1].distortion) {
            return Err(Error::degenerate(
                label,
                format!("duplicate distortion value {}", w[0].distortion),
            ));
        }
        Ok(by_distortion.iter().map(|p| (p.distortion, p.log_rate())).unzip())
    }

    /// Whether distortion strictly increases or strictly decreases with rate.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        let rising = self.points.windows(2).all(|w| w[1].distortion > w[0].distortion);
        let falling = self.points.windows(2).all(|w| w[1].distortion < w[0].distortion);
        rising || falling
    }
}

impl TryFrom<Vec<RdPoint>> for RdCurve {
    type Error = Error;

    fn try_from(points: Vec<RdPoint>) -> Result<Self> {
        Self::new("curve", points)
    }
}

impl From<RdCurve> for Vec<RdPoint> {
    fn from(curve: RdCurve) -> Self {
        curve.points
    }
}
