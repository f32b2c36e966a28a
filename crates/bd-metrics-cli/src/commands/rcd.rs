//! Relative curve difference sampling command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bd_metrics::{CurveComparator, Method, Summary};

use crate::{Direction, PairArgs};

pub fn run(
    args: &PairArgs,
    method: Method,
    samples: usize,
    direction: Direction,
    output: Option<PathBuf>,
) -> Result<()> {
    let pair = args.load()?;
    let comparator = CurveComparator::new(&pair.anchor, &pair.test, method)?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    let summary = match direction {
        Direction::Horizontal => {
            for sample in comparator.horizontal(samples)? {
                writer.serialize(sample)?;
            }
            comparator.horizontal_summary(samples)?
        }
        Direction::Vertical => {
            for sample in comparator.vertical(samples)? {
                writer.serialize(sample)?;
            }
            comparator.vertical_summary(samples)?
        }
    };
    writer.flush()?;

    let line = summary_line(&summary);
    // Without --output, stdout carries the CSV samples.
    match output {
        Some(path) => {
            println!("{}", line);
            println!("Saved to: {}", path.display());
        }
        None => tracing::info!("{}", line),
    }

    Ok(())
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "RCD over {} samples: mean {:.4}, median {:.4}, min {:.4}, max {:.4}, std {:.4}",
        summary.count, summary.mean, summary.median, summary.min, summary.max, summary.std_dev
    )
}
