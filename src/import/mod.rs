//! CSV import of labelled RD measurements.
//!
//! Each row is one RD point of one curve. Rows are grouped by their label
//! into [`LabeledCurve`]s, in order of first appearance.
//!
//! ## Supported Formats
//!
//! The importer auto-detects common column names, case-insensitively:
//! - Label: `label`, `curve`, `codec`, `encoder`, `config`, `name`
//! - Rate: `rate`, `bitrate`, `kbps`, `bpp`, `size`, `bytes`
//! - Distortion: `distortion`, `psnr`, `psnr_y`, `ssim`, `vmaf`, `quality`
//!
//! ## Example
//!
//! ```rust,ignore
//! use bd_metrics::import::{CsvImporter, CsvSchema};
//!
//! let schema = CsvSchema::builder()
//!     .label_column("encoder")
//!     .rate_column("kbps")
//!     .distortion_column("psnr_y")
//!     .build();
//!
//! let curves = CsvImporter::new(schema).import("results.csv")?;
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rd::{RdCurve, RdPoint};

/// An RD curve with the label it was imported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCurve {
    /// Curve label (encoder, configuration).
    pub label: String,
    /// Validated points.
    pub points: RdCurve,
}

/// Find a curve by label (case-sensitive).
#[must_use]
pub fn find_curve<'a>(curves: &'a [LabeledCurve], label: &str) -> Option<&'a RdCurve> {
    curves.iter().find(|c| c.label == label).map(|c| &c.points)
}

/// Schema for CSV import.
#[derive(Debug, Clone, Default)]
pub struct CsvSchema {
    /// Column name for the curve label.
    pub label_column: Option<String>,
    /// Column name for the rate.
    pub rate_column: Option<String>,
    /// Column name for the distortion metric.
    pub distortion_column: Option<String>,
}

impl CsvSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> CsvSchemaBuilder {
        CsvSchemaBuilder::default()
    }

    /// Create a schema that auto-detects columns from common names.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::default()
    }

    /// Try to find a column index by name (case-insensitive, with aliases).
    fn find_column(headers: &[&str], primary: Option<&str>, aliases: &[&str]) -> Option<usize> {
        if let Some(name) = primary {
            return find_header_index(headers, name);
        }
        aliases.iter().find_map(|alias| find_header_index(headers, alias))
    }
}

/// Builder for CSV schema.
#[derive(Debug, Default)]
pub struct CsvSchemaBuilder {
    schema: CsvSchema,
}

impl CsvSchemaBuilder {
    /// Set the label column name.
    #[must_use]
    pub fn label_column(mut self, name: impl Into<String>) -> Self {
        self.schema.label_column = Some(name.into());
        self
    }

    /// Set the rate column name.
    #[must_use]
    pub fn rate_column(mut self, name: impl Into<String>) -> Self {
        self.schema.rate_column = Some(name.into());
        self
    }

    /// Set the distortion column name.
    #[must_use]
    pub fn distortion_column(mut self, name: impl Into<String>) -> Self {
        self.schema.distortion_column = Some(name.into());
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> CsvSchema {
        self.schema
    }
}

/// CSV importer for RD curves.
pub struct CsvImporter {
    schema: CsvSchema,
}

impl CsvImporter {
    /// Create a new importer with the given schema.
    #[must_use]
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }

    /// Create an importer that auto-detects columns.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::new(CsvSchema::auto_detect())
    }

    /// Import curves from a CSV file.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<Vec<LabeledCurve>> {
        let reader = csv::Reader::from_path(path.as_ref())?;
        self.import_csv(reader)
    }

    /// Import curves from any CSV source.
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Vec<LabeledCurve>> {
        self.import_csv(csv::Reader::from_reader(reader))
    }

    fn import_csv<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<LabeledCurve>> {
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

        let label_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.label_column.as_deref(),
            &["label", "curve", "codec", "encoder", "config", "name"],
        )
        .ok_or_else(|| missing_column("label/curve"))?;

        let rate_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.rate_column.as_deref(),
            &["rate", "bitrate", "kbps", "bpp", "size", "bytes"],
        )
        .ok_or_else(|| missing_column("rate/bitrate"))?;

        let distortion_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.distortion_column.as_deref(),
            &["distortion", "psnr", "psnr_y", "ssim", "vmaf", "quality"],
        )
        .ok_or_else(|| missing_column("distortion/psnr"))?;

        let mut groups: Vec<(String, Vec<RdPoint>)> = Vec::new();

        for (line_num, record) in reader.records().enumerate() {
            let line = line_num + 2; // +2 for 1-based and header
            let record = record.map_err(|e| Error::CsvImport {
                line,
                reason: e.to_string(),
            })?;

            let label = record.get(label_idx).unwrap_or("").trim();
            if label.is_empty() {
                continue;
            }

            let point = RdPoint::new(
                parse_field(&record, rate_idx, "rate", line)?,
                parse_field(&record, distortion_idx, "distortion", line)?,
            );

            match groups.iter().position(|(l, _)| l == label) {
                Some(i) => groups[i].1.push(point),
                None => groups.push((label.to_string(), vec![point])),
            }
        }

        tracing::debug!(curves = groups.len(), "imported RD curves");

        groups
            .into_iter()
            .map(|(label, points)| {
                let points = RdCurve::new(&label, points)?;
                Ok(LabeledCurve { label, points })
            })
            .collect()
    }
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str, line: usize) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse().map_err(|_| Error::CsvImport {
        line,
        reason: format!("invalid {name} value '{raw}'"),
    })
}

fn missing_column(what: &str) -> Error {
    Error::CsvImport {
        line: 1,
        reason: format!("Could not find {what} column"),
    }
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[&str], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    headers.iter().position(|h| h.trim().to_lowercase() == name_lower)
}
