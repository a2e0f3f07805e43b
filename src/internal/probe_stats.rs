#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Measures linear probing displacement as a bid table fills up and charts it

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bidtable::{Bid, BidTable, ProbeStats, TableConfig, logging};
use clap::Parser;
use log::info;
use plotters::prelude::*;
use rand::Rng;

/// Lowest load factor measured
const MIN_LOAD: f64 = 0.1;
/// Highest load factor measured
const MAX_LOAD: f64 = 0.95;
/// Bid ids are drawn from `0..ID_RANGE`
const ID_RANGE: u64 = 1_000_000_000;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "probe_stats", about = "Chart probe displacement against load factor")]
struct Args {
    /// Number of slots in the measured table
    #[arg(long, default_value_t = 10_007)]
    capacity: usize,
    /// Number of load factor steps between 0.1 and 0.95
    #[arg(long, default_value_t = 10)]
    steps: usize,
    /// SVG file the chart is written to
    #[arg(long, default_value = "probe_displacement.svg")]
    output: PathBuf,
}

fn main() -> Result<()> {
    logging::init_logger();
    let args = Args::parse();

    let loads = load_factors(args.steps);
    let samples = measure(args.capacity, &loads, &mut rand::rng())?;

    println!("{:>8} {:>10} {:>10} {:>8}", "load", "bids", "mean", "worst");
    for sample in &samples {
        println!(
            "{:>8.2} {:>10} {:>10.2} {:>8}",
            sample.load_factor,
            sample.occupancy,
            sample.mean_displacement,
            sample.max_displacement
        );
    }

    render(&args.output, &samples)
        .with_context(|| format!("failed to render {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}

/// Evenly spaced load factors from `MIN_LOAD` to `MAX_LOAD`
fn load_factors(steps: usize) -> Vec<f64> {
    let intervals = steps.saturating_sub(1).max(1) as f64;
    (0..steps).map(|i| MIN_LOAD + (MAX_LOAD - MIN_LOAD) * i as f64 / intervals).collect()
}

/// Fills one table with random ids, taking a snapshot at every load factor.
///
/// Proactive growth is disabled so the capacity stays fixed while the load climbs.
fn measure<R: Rng>(capacity: usize, loads: &[f64], rng: &mut R) -> Result<Vec<ProbeStats>> {
    let config = TableConfig::default().with_capacity(capacity).with_max_load_factor(1.0);
    let mut table = BidTable::with_config(config);
    let mut samples = Vec::with_capacity(loads.len());

    for &load in loads {
        let target = ((table.capacity() as f64) * load) as usize;
        while table.len() < target {
            let id = rng.random_range(0..ID_RANGE).to_string();
            table.insert(Bid::new(id, "", "", 0.0))?;
        }
        samples.push(table.stats());
    }

    Ok(samples)
}

/// Draws mean and worst displacement against load factor
fn render(path: &Path, samples: &[ProbeStats]) -> Result<()> {
    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y =
        samples.iter().map(|s| s.max_displacement as f64).fold(1.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Linear Probing Displacement", ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc("Displacement (slots)")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let series: [(&str, RGBColor, fn(&ProbeStats) -> f64); 2] = [
        ("Mean displacement", RGBColor(50, 90, 220), |s| s.mean_displacement),
        ("Worst displacement", RGBColor(220, 50, 50), |s| s.max_displacement as f64),
    ];

    for (label, color, value) in series {
        let style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(samples.iter().map(|s| (s.load_factor, value(s))), style))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_load_factors() {
        let loads = load_factors(10);
        assert_eq!(loads.len(), 10);
        assert!((loads[0] - MIN_LOAD).abs() < 1e-9);
        assert!((loads[9] - MAX_LOAD).abs() < 1e-9);
        assert_eq!(load_factors(1).len(), 1);
        assert!(load_factors(0).is_empty());
    }

    #[test]
    fn test_measure_keeps_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = measure(1009, &[0.1, 0.5, 0.9], &mut rng).unwrap();

        let occupancy: Vec<usize> = samples.iter().map(|s| s.occupancy).collect();
        assert_eq!(occupancy, vec![100, 504, 908]);
        assert!(samples.iter().all(|s| s.capacity == 1009 && s.tombstones == 0));
        assert!(samples[0].max_displacement <= samples[1].max_displacement);
        assert!(samples[1].max_displacement <= samples[2].max_displacement);
    }
}
