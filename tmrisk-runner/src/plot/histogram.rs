use super::{dimension_color, CAPTION_FONT};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;
use tmrisk_core::topology::LifetimeHistogram;

/// Overlaid lifetime histograms, one colour per homology dimension.
pub fn render_persistence_histogram(path: &Path, histograms: &[LifetimeHistogram]) -> Result<()> {
    let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = histograms
        .iter()
        .map(LifetimeHistogram::range)
        .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
        .unwrap_or((0.0, 1.0));
    let y_hi = histograms.iter().map(|h| h.max_count()).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Persistence lifetimes", CAPTION_FONT.into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Lifetime (death - birth)")
        .y_desc("Count")
        .draw()?;

    for hist in histograms {
        let color = dimension_color(hist.dimension);
        chart
            .draw_series(hist.counts.iter().enumerate().filter(|(_, c)| **c > 0).map(
                |(i, &c)| {
                    Rectangle::new(
                        [(hist.edges[i], 0.0), (hist.edges[i + 1], c as f64)],
                        color.mix(0.55).filled(),
                    )
                },
            ))?
            .label(format!("H{}", hist.dimension))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if !histograms.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
