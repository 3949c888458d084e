use super::{CAPTION_FONT, LIGHT_BLUE};
use anyhow::Result;
use plotters::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;
use tmrisk_core::network::MinimumSpanningTree;

/// Node positions evenly spaced on the unit circle, first node at the top.
fn circular_layout(n: usize) -> Vec<(f64, f64)> {
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    (0..n)
        .map(|i| {
            let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect()
}

/// Draw the tree with labelled light-blue nodes on a circle.
pub fn render_mst(path: &Path, mst: &MinimumSpanningTree) -> Result<()> {
    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation minimum spanning tree", CAPTION_FONT.into_font())
        .margin(30)
        .build_cartesian_2d(-1.3f64..1.3f64, -1.3f64..1.3f64)?;

    let pos = circular_layout(mst.tickers().len());

    chart.draw_series(mst.edges().iter().map(|e| {
        PathElement::new(vec![pos[e.source], pos[e.target]], BLACK.mix(0.7).stroke_width(2))
    }))?;
    chart.draw_series(pos.iter().map(|&p| Circle::new(p, 18, LIGHT_BLUE.filled())))?;
    chart.draw_series(
        pos.iter()
            .zip(mst.tickers())
            .map(|(&p, ticker)| Text::new(ticker.clone(), p, ("sans-serif", 14).into_font())),
    )?;

    root.present()?;
    Ok(())
}
