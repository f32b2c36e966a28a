//! Error types for bd-metrics operations.

use thiserror::Error;

/// Result type alias for bd-metrics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fitting curves or computing BD metrics.
///
/// Every error aborts the computation it came from; there are no partial results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input points cannot be fitted: too few points, coincident values on the
    /// fitting axis, non-positive rates or non-finite values.
    #[error("Degenerate input for {curve} curve: {reason}")]
    DegenerateInput {
        /// Which curve was rejected ("anchor", "test", or a caller-supplied label).
        curve: String,
        /// Reason for the rejection.
        reason: String,
    },

    /// Anchor and test have different point counts while matching is required.
    #[error(
        "Number of RD points for anchor ({anchor}) and test ({test}) does not match \
         but matching points are required"
    )]
    PointCountMismatch {
        /// Anchor point count.
        anchor: usize,
        /// Test point count.
        test: usize,
    },

    /// Rate and distortion sequences of one curve differ in length.
    #[error("Number of rate ({rates}) and distortion ({distortions}) values for {curve} does not match")]
    LengthMismatch {
        /// Which curve was rejected.
        curve: String,
        /// Number of rate values.
        rates: usize,
        /// Number of distortion values.
        distortions: usize,
    },

    /// Interpolation method name not recognized.
    #[error("Invalid interpolation method '{0}'. Only 'akima', 'pchip' and 'cubic' are allowed")]
    UnsupportedMethod(String),

    /// Evaluation or integration outside a fitted curve's domain.
    #[error("Out of domain: [{low}, {high}] is not within [{min}, {max}]")]
    OutOfDomain {
        /// Lower requested bound (equal to `high` for point evaluation).
        low: f64,
        /// Upper requested bound.
        high: f64,
        /// Lower end of the curve domain.
        min: f64,
        /// Upper end of the curve domain.
        max: f64,
    },

    /// Anchor and test domains share at most a single point.
    #[error("Curves do not overlap: anchor [{}, {}], test [{}, {}]", anchor.0, anchor.1, test.0, test.1)]
    NoOverlap {
        /// Anchor domain on the integration axis.
        anchor: (f64, f64),
        /// Test domain on the integration axis.
        test: (f64, f64),
    },

    /// Error importing CSV data.
    #[error("CSV import error at line {line}: {reason}")]
    CsvImport {
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn degenerate(curve: &str, reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            curve: curve.to_string(),
            reason: reason.into(),
        }
    }
}
