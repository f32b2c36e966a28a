//! Single-method BD computation command.

use anyhow::Result;
use bd_metrics::{BdEngine, BdMetric, Method};

use crate::PairArgs;

pub fn run(args: &PairArgs, method: Method, json: bool) -> Result<()> {
    let pair = args.load()?;
    let engine = BdEngine::new(args.options().with_method(method).with_return_curves(json));

    let rate = engine.compute(&pair.anchor, &pair.test, BdMetric::Rate)?;
    let psnr = engine.compute(&pair.anchor, &pair.test, BdMetric::Psnr)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&[&rate, &psnr])?);
        return Ok(());
    }

    println!("{} vs {} ({})", args.test, args.anchor, method);
    println!("{:-<40}", "");
    println!(
        "{:<10} {:>10.4} %   overlap {:.0}%",
        rate.metric.label(),
        rate.value,
        rate.overlap_fraction * 100.0
    );
    println!(
        "{:<10} {:>10.4} dB  overlap {:.0}%",
        psnr.metric.label(),
        psnr.value,
        psnr.overlap_fraction * 100.0
    );

    Ok(())
}
