//! Cross-method comparison command.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bd_metrics::{ComparisonReport, compare_methods};

use crate::PairArgs;

pub fn run(args: &PairArgs, output: Option<PathBuf>) -> Result<()> {
    let pair = args.load()?;
    let options = args.options();
    let methods = compare_methods(&pair.anchor, &pair.test, &options)?;
    let report = ComparisonReport::new(&args.anchor, &args.test, options, methods);

    println!("{} vs {}", report.test, report.anchor);
    println!();
    println!("{:<8} {:>12} {:>12}", "Method", "BD-Rate(%)", "BD-PSNR");
    println!("{:-<34}", "");
    for m in &report.methods {
        println!("{:<8} {:>12.4} {:>12.4}", m.method, m.bd_rate, m.bd_psnr);
    }
    if let Some(spread) = report.bd_rate_spread() {
        println!();
        println!("BD-Rate spread across methods: {:.4} %", spread);
    }

    if let Some(output_path) = output {
        let is_csv = output_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            let file = File::create(&output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            report.write_csv(file)?;
        } else {
            std::fs::write(&output_path, report.to_json()?)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        }
        println!();
        println!("Saved to: {}", output_path.display());
    }

    Ok(())
}
