//! SVG figures for the network, topology and integration stages.
//!
//! All renderers accept empty input and then draw bare axes; they only fail
//! on I/O errors from the backend.

mod histogram;
mod mst;
mod scatter;

pub use histogram::render_persistence_histogram;
pub use mst::render_mst;
pub use scatter::render_integration_scatter;

use plotters::style::RGBColor;
use std::ops::Range;

pub(crate) const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub(crate) const CAPTION_FONT: (&str, i32) = ("sans-serif", 24);

/// Color assigned to a homology dimension.
pub(crate) fn dimension_color(dimension: usize) -> RGBColor {
    match dimension {
        0 => RGBColor(31, 119, 180),
        1 => RGBColor(255, 127, 14),
        _ => RGBColor(44, 160, 44),
    }
}

/// Axis range covering `values` with a 5% margin; `0..1` when there is nothing to show.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    if hi - lo <= 0.0 {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}
