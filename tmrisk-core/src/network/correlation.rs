//! Correlation and correlation-distance matrices.

use crate::data::ReturnSeries;
use crate::stats::pearson;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Symmetric Pearson correlation matrix over a set of tickers.
///
/// Diagonal is exactly 1. A pair involving a zero-variance column is set to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    tickers: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Pairwise Pearson correlation of every return column.
    pub fn from_returns(returns: &ReturnSeries) -> Self {
        let columns = returns.frame().columns();
        let n = columns.len();
        let mut values = vec![vec![0.0; n]; n];
        let mut degenerate = 0usize;

        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let corr = match pearson(&columns[i], &columns[j]) {
                    Some(c) => c,
                    None => {
                        degenerate += 1;
                        0.0
                    }
                };
                values[i][j] = corr;
                values[j][i] = corr;
            }
        }

        if degenerate > 0 {
            warn!(
                pairs = degenerate,
                rows = returns.n_rows(),
                "correlation undefined for some pairs (zero variance); treated as 0"
            );
        }

        Self {
            tickers: returns.tickers().to_vec(),
            values,
        }
    }

    /// Build directly from values. Values are symmetrised, clamped and the diagonal forced to 1.
    pub fn from_values(tickers: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        let n = tickers.len();
        assert_eq!(values.len(), n, "correlation matrix must be square");
        let mut out = vec![vec![0.0; n]; n];
        for i in 0..n {
            assert_eq!(values[i].len(), n, "correlation matrix must be square");
            out[i][i] = 1.0;
            for j in (i + 1)..n {
                let c = (0.5 * (values[i][j] + values[j][i])).clamp(-1.0, 1.0);
                out[i][j] = c;
                out[j][i] = c;
            }
        }
        Self {
            tickers,
            values: out,
        }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// `d(i,j) = sqrt(2(1 - corr(i,j)))`.
    pub fn to_distance(&self) -> DistanceMatrix {
        let n = self.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = correlation_distance(self.values[i][j]);
                values[i][j] = d;
                values[j][i] = d;
            }
        }
        DistanceMatrix { values }
    }
}

/// Correlation distance; the radicand is clamped at zero against rounding.
pub fn correlation_distance(corr: f64) -> f64 {
    (2.0 * (1.0 - corr)).max(0.0).sqrt()
}

/// Symmetric, nonnegative, zero-diagonal distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}
