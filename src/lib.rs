//! # bd-metrics
//!
//! Bjøntegaard-Delta metrics for comparing rate-distortion curves.
//!
//! BD-Rate and BD-PSNR summarize the average gap between an anchor and a
//! test RD curve, each sampled at a handful of points. The samples are
//! turned into continuous piecewise cubics over `log10(rate)`, and the area
//! between the curves over their common range becomes the metric.
//!
//! ## Quick Start
//!
//! ```
//! use bd_metrics::{BdOptions, Method, bd_psnr, bd_rate};
//!
//! let rate_anchor = [9487.76, 4593.60, 2486.44, 1358.24];
//! let psnr_anchor = [40.037, 38.615, 36.845, 34.851];
//! let rate_test = [9787.80, 4469.00, 2451.52, 1356.24];
//! let psnr_test = [40.121, 38.651, 36.970, 34.987];
//!
//! let options = BdOptions::default().with_method(Method::Akima);
//! let rate = bd_rate(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &options)?;
//! let psnr = bd_psnr(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &options)?;
//! assert!(rate < 0.0 && psnr > 0.0);
//! # Ok::<(), bd_metrics::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`interpolation`]: Natural cubic, PCHIP and Akima curve fitting
//! - [`rd`]: Validated rate-distortion samples
//! - [`bd`]: BD-Rate and BD-PSNR computation
//! - [`compare`]: Relative curve difference sampling and method comparison
//! - [`stats`]: Summary statistics over sampled differences
//! - [`report`]: Serializable comparison reports
//! - [`import`]: CSV import of labelled RD curves

pub mod bd;
pub mod compare;
pub mod error;
pub mod import;
pub mod interpolation;
pub mod rd;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use bd::{
    BdEngine, BdMetric, BdOptions, BdResult, Domain, FittedPair, bd_delta, bd_psnr, bd_rate,
};
pub use compare::{CurveComparator, HorizontalSample, MethodComparison, VerticalSample, compare_methods};
pub use error::{Error, Result};
pub use import::{CsvImporter, CsvSchema, LabeledCurve};
pub use interpolation::{CubicSegment, Method, PiecewiseCurve};
pub use rd::{RdCurve, RdPoint};
pub use report::ComparisonReport;
pub use stats::Summary;
