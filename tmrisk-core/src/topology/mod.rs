//! Persistent homology of the correlation-distance space.

pub mod diagram;
pub mod histogram;
pub mod rips;

pub use diagram::{PersistenceDiagram, PersistenceInterval};
pub use histogram::LifetimeHistogram;
pub use rips::{rips_persistence, HOMOLOGY_DIMENSIONS};
