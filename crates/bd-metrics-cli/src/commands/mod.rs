//! Subcommand implementations.

pub mod compare;
pub mod compute;
pub mod rcd;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use bd_metrics::{BdOptions, CsvImporter, CsvSchema, LabeledCurve, RdCurve};

use crate::PairArgs;

/// Anchor and test curves selected from an input file.
pub struct Pair {
    pub anchor: RdCurve,
    pub test: RdCurve,
}

impl PairArgs {
    fn schema(&self) -> CsvSchema {
        let mut builder = CsvSchema::builder();
        if let Some(col) = &self.label_col {
            builder = builder.label_column(col);
        }
        if let Some(col) = &self.rate_col {
            builder = builder.rate_column(col);
        }
        if let Some(col) = &self.distortion_col {
            builder = builder.distortion_column(col);
        }
        builder.build()
    }

    /// Options shared by every subcommand.
    pub fn options(&self) -> BdOptions {
        BdOptions::default()
            .with_require_matching_points(!self.allow_mismatched)
            .with_min_overlap(self.min_overlap)
    }

    /// Load the input file and pick out the anchor and test curves.
    pub fn load(&self) -> Result<Pair> {
        let curves = load_curves(&self.input, self.schema())?;
        tracing::info!(
            curves = curves.len(),
            input = %self.input.display(),
            "loaded RD curves"
        );

        let pick = |label: &str| -> Result<RdCurve> {
            bd_metrics::import::find_curve(&curves, label).cloned().ok_or_else(|| {
                let known: Vec<&str> = curves.iter().map(|c| c.label.as_str()).collect();
                anyhow!("No curve labelled '{}' (available: {})", label, known.join(", "))
            })
        };

        Ok(Pair {
            anchor: pick(&self.anchor)?,
            test: pick(&self.test)?,
        })
    }
}

/// Read labelled curves from a JSON or CSV file.
fn load_curves(path: &Path, schema: CsvSchema) -> Result<Vec<LabeledCurve>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_curves(&content, is_json, schema)
        .with_context(|| format!("Failed to load curves from {}", path.display()))
}

/// Parse curves as JSON when flagged or when the content looks like JSON,
/// otherwise as CSV.
fn parse_curves(content: &str, is_json: bool, schema: CsvSchema) -> Result<Vec<LabeledCurve>> {
    let looks_like_json = content.trim_start().starts_with(['[', '{']);
    if is_json || looks_like_json {
        return serde_json::from_str(content).context("Invalid JSON curve list");
    }

    CsvImporter::new(schema)
        .import_reader(content.as_bytes())
        .context("Invalid CSV curve table")
}
