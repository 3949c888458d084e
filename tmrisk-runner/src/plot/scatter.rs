use super::{padded_range, CAPTION_FONT};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;
use tmrisk_core::integration::IntegrationRecord;

/// H1 total persistence against Monte Carlo pricing error, one point per window.
pub fn render_integration_scatter(path: &Path, records: &[IntegrationRecord]) -> Result<()> {
    let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(records.iter().map(|r| r.h1_total_persistence));
    let y_range = padded_range(records.iter().map(|r| r.pricing_error));

    let mut chart = ChartBuilder::on(&root)
        .caption("H1 total persistence vs pricing error", CAPTION_FONT.into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("H1 total persistence")
        .y_desc("Pricing error")
        .draw()?;

    chart.draw_series(records.iter().map(|r| {
        Circle::new(
            (r.h1_total_persistence, r.pricing_error),
            3,
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_records_render_axes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.svg");
        render_integration_scatter(&path, &[]).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn zero_persistence_windows_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.svg");
        let d = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let records = vec![
            IntegrationRecord {
                window_start: d,
                window_end: d,
                h1_total_persistence: 0.0,
                pricing_error: 0.001,
            };
            3
        ];
        render_integration_scatter(&path, &records).unwrap();
        assert!(path.exists());
    }
}
