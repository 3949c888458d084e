//! Correlation network: Pearson matrix, correlation distance, MST.

pub mod correlation;
pub mod mst;

pub use correlation::{correlation_distance, CorrelationMatrix, DistanceMatrix};
pub use mst::{CorrelationGraph, GraphEdge, MinimumSpanningTree};
