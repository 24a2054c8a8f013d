//! Histogram of simulated final prices

use anyhow::{anyhow, ensure, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::monte_carlo::SimulationResult;

/// One histogram bar covering `[lower, upper)`, the last bar also includes `upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Equal-width bins spanning the data.
///
/// A zero-width range is widened by 0.5 on each side so a deterministic
/// forecast still draws one visible bar.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}

/// Render the distribution as a PNG with a dashed line at the current price
pub fn render_histogram(result: &SimulationResult, horizon_days: usize, bins: usize, path: &Path) -> Result<()> {
    let bins = histogram_bins(&result.final_prices, bins);
    ensure!(!bins.is_empty(), "No simulated prices to plot");

    let x_min = bins[0].lower.min(result.current_price);
    let x_max = bins[bins.len() - 1].upper.max(result.current_price);
    let pad = (x_max - x_min) * 0.02;
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let y_top = y_max + y_max / 10 + 1;

    let root = BitMapBackend::new(path, (1024, 640)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill canvas: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Bitcoin price distribution after {} days", horizon_days),
            ("sans-serif", 30).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min - pad)..(x_max + pad), 0u32..y_top)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Bitcoin price")
        .y_desc("Frequency")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0), (b.upper, b.count)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| anyhow!("Failed to draw bars: {}", e))?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0), (b.upper, b.count)], BLACK.stroke_width(1))
        }))
        .map_err(|e| anyhow!("Failed to draw bar edges: {}", e))?;

    chart
        .draw_series(DashedLineSeries::new(
            vec![(result.current_price, 0), (result.current_price, y_top)],
            10,
            6,
            RED.stroke_width(2),
        ))
        .map_err(|e| anyhow!("Failed to draw current price: {}", e))?
        .label("Current price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| anyhow!("Failed to write chart: {}", e))?;

    info!("Histogram written to {}", path.display());
    Ok(())
}
