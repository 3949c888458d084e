//! Lifetime histograms of persistence intervals.
//!
//! Each dimension is binned independently over its own lifetime range.
//! Empty dimensions produce no histogram; a zero-range set (one interval, or
//! identical lifetimes) gets a single-width range centred on the value.

use super::diagram::PersistenceDiagram;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifetimeHistogram {
    pub dimension: usize,
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl LifetimeHistogram {
    /// Histogram of `values` in `bins` equal-width bins, or `None` if there are no finite values.
    pub fn from_values(dimension: usize, values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo <= 0.0 {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|k| lo + width * k as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in finite {
            // last bin is closed on the right
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self {
            dimension,
            edges,
            counts,
        })
    }

    /// One histogram per dimension present in the diagram, skipping empty ones.
    pub fn per_dimension(diagram: &PersistenceDiagram, bins: usize) -> Vec<Self> {
        diagram
            .homology_dimensions
            .iter()
            .filter_map(|&dim| Self::from_values(dim, &diagram.lifetimes(dim), bins))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }
}
