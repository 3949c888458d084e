//! Fixed on-disk layout of a results directory.
//!
//! Stages communicate only through these files, so the layout is the contract
//! between separately spawned stage processes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const SUMMARIES_DIR: &str = "summaries";
pub const PLOTS_DIR: &str = "plots";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Create `summaries/` and `plots/` if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.summaries_dir(), self.plots_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn summaries_dir(&self) -> PathBuf {
        self.root.join(SUMMARIES_DIR)
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.root.join(PLOTS_DIR)
    }

    pub fn prices_csv(&self) -> PathBuf {
        self.summaries_dir().join("prices.csv")
    }

    pub fn returns_csv(&self) -> PathBuf {
        self.summaries_dir().join("returns.csv")
    }

    pub fn correlation_csv(&self) -> PathBuf {
        self.summaries_dir().join("correlation.csv")
    }

    pub fn mst_edges_csv(&self) -> PathBuf {
        self.summaries_dir().join("mst_edges.csv")
    }

    pub fn persistence_json(&self) -> PathBuf {
        self.summaries_dir().join("persistence.json")
    }

    pub fn mc_pricing_csv(&self) -> PathBuf {
        self.summaries_dir().join("mc_pricing.csv")
    }

    pub fn integration_csv(&self) -> PathBuf {
        self.summaries_dir().join("integration.csv")
    }

    pub fn manifest_json(&self) -> PathBuf {
        self.summaries_dir().join("manifest.json")
    }

    pub fn mst_plot(&self) -> PathBuf {
        self.plots_dir().join("mst.svg")
    }

    pub fn persistence_plot(&self) -> PathBuf {
        self.plots_dir().join("persistence.svg")
    }

    pub fn integration_plot(&self) -> PathBuf {
        self.plots_dir().join("h1_total_vs_price.svg")
    }

    /// Every file a complete run produces, manifest excluded.
    pub fn outputs(&self) -> Vec<PathBuf> {
        vec![
            self.prices_csv(),
            self.returns_csv(),
            self.correlation_csv(),
            self.mst_edges_csv(),
            self.persistence_json(),
            self.mc_pricing_csv(),
            self.integration_csv(),
            self.mst_plot(),
            self.persistence_plot(),
            self.integration_plot(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_root() {
        let layout = ArtifactLayout::new("/tmp/run");
        assert_eq!(layout.returns_csv(), Path::new("/tmp/run/summaries/returns.csv"));
        assert_eq!(layout.mst_plot(), Path::new("/tmp/run/plots/mst.svg"));
        assert!(layout.outputs().iter().all(|p| p.starts_with("/tmp/run")));
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path().join("results"));
        layout.ensure_dirs().unwrap();
        layout.ensure_dirs().unwrap();
        assert!(layout.summaries_dir().is_dir());
        assert!(layout.plots_dir().is_dir());
    }
}
