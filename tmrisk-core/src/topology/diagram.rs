//! Persistence diagrams.

use serde::{Deserialize, Serialize};

/// One (birth, death) pair in a given homology dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistenceInterval {
    pub birth: f64,
    pub death: f64,
    pub dimension: usize,
}

impl PersistenceInterval {
    pub fn lifetime(&self) -> f64 {
        self.death - self.birth
    }
}

/// Dimension-tagged collection of intervals. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceDiagram {
    pub homology_dimensions: Vec<usize>,
    pub intervals: Vec<PersistenceInterval>,
}

impl PersistenceDiagram {
    pub fn new(homology_dimensions: Vec<usize>, intervals: Vec<PersistenceInterval>) -> Self {
        Self {
            homology_dimensions,
            intervals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals_in(&self, dimension: usize) -> impl Iterator<Item = &PersistenceInterval> {
        self.intervals
            .iter()
            .filter(move |i| i.dimension == dimension)
    }

    pub fn count(&self, dimension: usize) -> usize {
        self.intervals_in(dimension).count()
    }

    pub fn lifetimes(&self, dimension: usize) -> Vec<f64> {
        self.intervals_in(dimension).map(|i| i.lifetime()).collect()
    }

    /// Sum of lifetimes in one dimension; 0 when the dimension has no intervals.
    pub fn total_persistence(&self, dimension: usize) -> f64 {
        self.intervals_in(dimension).map(|i| i.lifetime()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(birth: f64, death: f64, dimension: usize) -> PersistenceInterval {
        PersistenceInterval { birth, death, dimension }
    }

    #[test]
    fn total_persistence_per_dimension() {
        let d = PersistenceDiagram::new(
            vec![0, 1],
            vec![iv(0.0, 0.5, 0), iv(0.0, 0.7, 0), iv(0.9, 1.0, 1), iv(0.8, 1.2, 1)],
        );
        assert!((d.total_persistence(0) - 1.2).abs() < 1e-12);
        assert!((d.total_persistence(1) - 0.5).abs() < 1e-12);
        assert_eq!(d.count(1), 2);
    }

    #[test]
    fn empty_diagram_is_representable() {
        let d = PersistenceDiagram::new(vec![0, 1], vec![]);
        assert!(d.is_empty());
        assert_eq!(d.total_persistence(1), 0.0);
        assert!(d.lifetimes(0).is_empty());

        let json = serde_json::to_string(&d).unwrap();
        let back: PersistenceDiagram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
