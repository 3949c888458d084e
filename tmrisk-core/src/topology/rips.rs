//! Vietoris–Rips persistent homology over a precomputed distance matrix.
//!
//! Points are only known through their pairwise distances. The filtration is
//! the full Rips complex up to 2-simplices:
//!
//! - vertices enter at 0
//! - edge `{i, j}` enters at `d(i, j)`
//! - triangle `{i, j, k}` enters at its longest edge
//!
//! H0 comes from a union–find sweep over the sorted edges (each merge kills a
//! component). H1 comes from reducing the triangle boundary matrix over Z/2:
//! the pivot row of a reduced triangle column is the edge whose cycle it fills.
//! Intervals of zero length are not reported, and the component that never
//! dies is omitted (reduced homology). The complete 2-skeleton is simply
//! connected, so no H1 class survives to infinity.

use super::diagram::{PersistenceDiagram, PersistenceInterval};
use crate::disjoint_set::DisjointSet;
use crate::network::DistanceMatrix;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Homology dimensions this module computes.
pub const HOMOLOGY_DIMENSIONS: [usize; 2] = [0, 1];

#[derive(Debug, Clone, Copy)]
struct Edge {
    diameter: f64,
    a: usize,
    b: usize,
}

#[derive(Debug, Clone)]
struct Triangle {
    diameter: f64,
    /// Boundary as filtration indices of the three edges, ascending.
    boundary: [usize; 3],
}

/// Rips persistence in dimensions 0 and 1.
pub fn rips_persistence(dist: &DistanceMatrix) -> PersistenceDiagram {
    let edges = sorted_edges(dist);
    let mut intervals = h0_intervals(dist.len(), &edges);
    intervals.extend(h1_intervals(dist.len(), &edges));
    PersistenceDiagram::new(HOMOLOGY_DIMENSIONS.to_vec(), intervals)
}

/// All `i < j` edges by (diameter, i, j).
fn sorted_edges(dist: &DistanceMatrix) -> Vec<Edge> {
    let n = dist.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            edges.push(Edge {
                diameter: dist.get(a, b),
                a,
                b,
            });
        }
    }
    edges.sort_by(|x, y| {
        x.diameter
            .total_cmp(&y.diameter)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
    edges
}

fn h0_intervals(n: usize, edges: &[Edge]) -> Vec<PersistenceInterval> {
    let mut components = DisjointSet::new(n);
    let mut out = Vec::new();
    for e in edges {
        if components.union(e.a, e.b) && e.diameter > 0.0 {
            out.push(PersistenceInterval {
                birth: 0.0,
                death: e.diameter,
                dimension: 0,
            });
        }
    }
    out
}

fn h1_intervals(n: usize, edges: &[Edge]) -> Vec<PersistenceInterval> {
    if n < 3 {
        return Vec::new();
    }

    let mut edge_index = vec![vec![usize::MAX; n]; n];
    for (idx, e) in edges.iter().enumerate() {
        edge_index[e.a][e.b] = idx;
        edge_index[e.b][e.a] = idx;
    }

    let mut triangles = Vec::with_capacity(n * (n - 1) * (n - 2) / 6);
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let mut boundary = [edge_index[i][j], edge_index[i][k], edge_index[j][k]];
                boundary.sort_unstable();
                triangles.push(Triangle {
                    diameter: edges[boundary[2]].diameter,
                    boundary,
                });
            }
        }
    }
    triangles.sort_by(triangle_order);

    // pivot edge -> reduced column that owns it
    let mut pivots: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut out = Vec::new();

    for tri in &triangles {
        let mut column: Vec<usize> = tri.boundary.to_vec();
        while let Some(&low) = column.last() {
            match pivots.get(&low) {
                Some(other) => column = symmetric_difference(&column, other),
                None => break,
            }
        }

        let Some(&low) = column.last() else {
            continue; // triangle closes a 2-cycle; nothing to pair in H1
        };

        let birth = edges[low].diameter;
        if tri.diameter > birth {
            out.push(PersistenceInterval {
                birth,
                death: tri.diameter,
                dimension: 1,
            });
        }
        pivots.insert(low, column);
    }

    out
}

/// Diameter first, then reverse-lexicographic on the boundary edges.
fn triangle_order(x: &Triangle, y: &Triangle) -> Ordering {
    x.diameter
        .total_cmp(&y.diameter)
        .then(x.boundary[2].cmp(&y.boundary[2]))
        .then(x.boundary[1].cmp(&y.boundary[1]))
        .then(x.boundary[0].cmp(&y.boundary[0]))
}

/// Z/2 column addition on ascending index lists.
fn symmetric_difference(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::CorrelationMatrix;

    fn dist_from(values: Vec<Vec<f64>>) -> DistanceMatrix {
        // Invert d = sqrt(2(1 - c)) so tests can state distances directly.
        let n = values.len();
        let corr: Vec<Vec<f64>> = values
            .iter()
            .map(|row| row.iter().map(|d| 1.0 - d * d / 2.0).collect())
            .collect();
        let tickers = (0..n).map(|i| format!("P{i}")).collect();
        CorrelationMatrix::from_values(tickers, corr).to_distance()
    }

    #[test]
    fn square_has_one_loop() {
        let s = 2.0_f64.sqrt();
        let dist = dist_from(vec![
            vec![0.0, 1.0, s, 1.0],
            vec![1.0, 0.0, 1.0, s],
            vec![s, 1.0, 0.0, 1.0],
            vec![1.0, s, 1.0, 0.0],
        ]);
        let dgm = rips_persistence(&dist);

        assert_eq!(dgm.count(0), 3);
        for iv in dgm.intervals_in(0) {
            assert_eq!(iv.birth, 0.0);
            assert!((iv.death - 1.0).abs() < 1e-9);
        }

        let h1: Vec<_> = dgm.intervals_in(1).collect();
        assert_eq!(h1.len(), 1);
        assert!((h1[0].birth - 1.0).abs() < 1e-9);
        assert!((h1[0].death - s).abs() < 1e-9);
        assert!((dgm.total_persistence(1) - (s - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn equilateral_triangle_has_no_loop() {
        let dgm = rips_persistence(&dist_from(vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ]));
        assert_eq!(dgm.count(0), 2);
        assert_eq!(dgm.count(1), 0);
    }

    #[test]
    fn single_point_is_empty() {
        let dgm = rips_persistence(&dist_from(vec![vec![0.0]]));
        assert!(dgm.is_empty());
        assert_eq!(dgm.homology_dimensions, vec![0, 1]);
    }

    #[test]
    fn fully_correlated_points_are_empty() {
        let dgm = rips_persistence(&dist_from(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]));
        assert!(dgm.is_empty());
    }

    #[test]
    fn hexagon_loop_dies_at_long_diagonal_triangle() {
        // Regular hexagon with unit side: short diagonals sqrt(3), long diagonals 2.
        let pts: Vec<(f64, f64)> = (0..6)
            .map(|k| {
                let t = std::f64::consts::PI / 3.0 * k as f64;
                (t.cos(), t.sin())
            })
            .collect();
        let values = pts
            .iter()
            .map(|p| {
                pts.iter()
                    .map(|q| ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let dgm = rips_persistence(&dist_from(values));

        assert_eq!(dgm.count(0), 5);
        let h1: Vec<_> = dgm.intervals_in(1).collect();
        assert_eq!(h1.len(), 1);
        assert!((h1[0].birth - 1.0).abs() < 1e-9);
        assert!((h1[0].death - 3.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn symmetric_difference_cancels_pairs() {
        assert_eq!(symmetric_difference(&[1, 3, 4], &[0, 2, 4]), vec![0, 1, 2, 3]);
        assert!(symmetric_difference(&[1, 2], &[1, 2]).is_empty());
    }
}
