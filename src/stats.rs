//! Descriptive statistics over sampled curve differences.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a set of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Summary {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if the slice is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metrics::stats::Summary;
    ///
    /// let summary = Summary::compute(&[-4.0, -2.0, -3.0]).unwrap();
    /// assert_eq!(summary.median, -3.0);
    /// assert_eq!(summary.min, -4.0);
    /// ```
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count,
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}
