//! Complete correlation graph and its minimum spanning tree.

use super::correlation::CorrelationMatrix;
use crate::disjoint_set::DisjointSet;
use serde::{Deserialize, Serialize};

/// Weighted edge between two tickers, by index and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Complete graph over tickers with edge weight `1 - corr`.
///
/// Highly correlated assets are close. Self-loops are excluded.
#[derive(Debug, Clone)]
pub struct CorrelationGraph {
    tickers: Vec<String>,
    edges: Vec<GraphEdge>,
}

impl CorrelationGraph {
    pub fn from_correlation(corr: &CorrelationMatrix) -> Self {
        let n = corr.len();
        let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push(GraphEdge {
                    source: i,
                    target: j,
                    weight: 1.0 - corr.get(i, j),
                });
            }
        }
        Self {
            tickers: corr.tickers().to_vec(),
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Kruskal's algorithm. Ties on weight fall back to `(source, target)` order.
    pub fn minimum_spanning_tree(&self) -> MinimumSpanningTree {
        let mut order: Vec<&GraphEdge> = self.edges.iter().collect();
        order.sort_by(|a, b| {
            a.weight
                .total_cmp(&b.weight)
                .then(a.source.cmp(&b.source))
                .then(a.target.cmp(&b.target))
        });

        let n = self.node_count();
        let mut components = DisjointSet::new(n);
        let mut tree = Vec::with_capacity(n.saturating_sub(1));

        for edge in order {
            if tree.len() == n.saturating_sub(1) {
                break;
            }
            if components.union(edge.source, edge.target) {
                tree.push(edge.clone());
            }
        }

        MinimumSpanningTree {
            tickers: self.tickers.clone(),
            edges: tree,
        }
    }
}

/// Spanning tree of the correlation graph: `N - 1` edges for `N` tickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumSpanningTree {
    tickers: Vec<String>,
    edges: Vec<GraphEdge>,
}

impl MinimumSpanningTree {
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Edge endpoints resolved to ticker names.
    pub fn named_edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.edges.iter().map(|e| {
            (
                self.tickers[e.source].as_str(),
                self.tickers[e.target].as_str(),
                e.weight,
            )
        })
    }

    /// True when every node is reachable from node 0 through tree edges.
    pub fn is_connected(&self) -> bool {
        let n = self.tickers.len();
        if n <= 1 {
            return true;
        }
        let mut ds = DisjointSet::new(n);
        for e in &self.edges {
            ds.union(e.source, e.target);
        }
        (1..n).all(|i| ds.same(0, i))
    }
}
