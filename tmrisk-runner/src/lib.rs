//! TMRisk Runner: stage execution, artifacts, configuration, plotting.
//!
//! This crate builds on `tmrisk-core` to provide:
//! - The five pipeline stages and their on-disk artifact layout
//! - TOML pipeline configuration
//! - SVG figures for the MST, persistence lifetimes and the integration scatter
//! - Stage orchestration through subprocesses or in-process calls
//! - The run manifest written after a successful run

pub mod artifacts;
pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod plot;
pub mod stages;

pub use artifacts::ArtifactLayout;
pub use config::{ConfigError, PipelineConfig, TopologyConfig};
pub use manifest::{RunManifest, StageTiming};
pub use pipeline::{
    execute_stage, run_pipeline, InProcessStageRunner, PipelineError, PipelineSummary,
    PrepareInputs, ProcessStageRunner, RunRequest, SilentStageProgress, Stage, StageProgress,
    StageRunner, StdoutStageProgress,
};
pub use stages::prepare::PrepareRequest;
