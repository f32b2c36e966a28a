//! Comparison reports.
//!
//! A [`ComparisonReport`] records the BD metrics of one anchor/test pair for
//! every interpolation method, serializable to JSON or CSV.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::bd::BdOptions;
use crate::compare::MethodComparison;
use crate::error::Result;

/// BD metrics of one anchor/test pair across interpolation methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Anchor curve label.
    pub anchor: String,

    /// Test curve label.
    pub test: String,

    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// Options shared by every run.
    pub options: BdOptions,

    /// One entry per interpolation method.
    pub methods: Vec<MethodComparison>,
}

impl ComparisonReport {
    /// Create a new report stamped with the current time.
    #[must_use]
    pub fn new(
        anchor: impl Into<String>,
        test: impl Into<String>,
        options: BdOptions,
        methods: Vec<MethodComparison>,
    ) -> Self {
        Self {
            anchor: anchor.into(),
            test: test.into(),
            generated_at: chrono::Utc::now(),
            options,
            methods,
        }
    }

    /// Largest minus smallest BD-Rate across methods.
    ///
    /// A wide spread means the result depends on the interpolation choice.
    #[must_use]
    pub fn bd_rate_spread(&self) -> Option<f64> {
        let rates = self.methods.iter().map(|m| m.bd_rate);
        let max = rates.clone().reduce(f64::max)?;
        let min = rates.reduce(f64::min)?;
        Some(max - min)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write one CSV row per method.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(["anchor", "test", "method", "bd_rate", "bd_psnr"])?;
        for m in &self.methods {
            let bd_rate = m.bd_rate.to_string();
            let bd_psnr = m.bd_psnr.to_string();
            out.write_record([
                self.anchor.as_str(),
                self.test.as_str(),
                m.method.name(),
                bd_rate.as_str(),
                bd_psnr.as_str(),
            ])?;
        }
        out.flush()?;
        Ok(())
    }
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
