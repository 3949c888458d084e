//! Stage orchestration.
//!
//! The pipeline always runs the same five stages in the same order and stops
//! at the first failure. How a stage is executed is up to the [`StageRunner`]:
//! [`ProcessStageRunner`] re-launches the current executable once per stage,
//! [`InProcessStageRunner`] calls the stage functions directly. Either way the
//! stages only talk to each other through files in the results directory.

use crate::artifacts::ArtifactLayout;
use crate::config::{ConfigError, PipelineConfig};
use crate::manifest::{RunManifest, StageTiming};
use crate::stages::{self, prepare::PrepareRequest};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tmrisk_core::data::{DownloadProgress, PriceProvider};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Prepare,
    Network,
    Topology,
    Pricing,
    Integration,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 5] = [
        Stage::Prepare,
        Stage::Network,
        Stage::Topology,
        Stage::Pricing,
        Stage::Integration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Network => "network",
            Stage::Topology => "topology",
            Stage::Pricing => "pricing",
            Stage::Integration => "integration",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| PipelineError::UnknownStage(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown stage '{0}'")]
    UnknownStage(String),

    #[error("failed to launch stage {stage}: {source}")]
    Spawn {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    #[error("stage {stage} exited with {status}")]
    StageFailed { stage: Stage, status: ExitStatus },

    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to write run manifest: {0}")]
    Manifest(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Everything a full run needs. Only the prepare stage sees `prepare`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub prepare: PrepareRequest,
    pub results_dir: PathBuf,
    pub config_path: Option<PathBuf>,
}

/// Executes one stage to completion.
pub trait StageRunner {
    fn run_stage(&self, stage: Stage, request: &RunRequest) -> Result<(), PipelineError>;
}

/// Progress callback for the orchestrator.
pub trait StageProgress {
    fn on_stage_start(&self, stage: Stage, index: usize, total: usize);
    fn on_stage_complete(&self, stage: Stage, elapsed: Duration);
    fn on_stage_failed(&self, stage: Stage, error: &PipelineError);
}

/// Prints stage progress lines to stdout.
pub struct StdoutStageProgress;

impl StageProgress for StdoutStageProgress {
    fn on_stage_start(&self, stage: Stage, index: usize, total: usize) {
        println!("[INFO] Running {stage} ({}/{total})", index + 1);
    }

    fn on_stage_complete(&self, stage: Stage, elapsed: Duration) {
        println!("[INFO] Finished {stage} in {:.2}s", elapsed.as_secs_f64());
    }

    fn on_stage_failed(&self, stage: Stage, error: &PipelineError) {
        eprintln!("[ERROR] {stage} failed: {error}");
    }
}

/// No-op progress (for tests).
pub struct SilentStageProgress;

impl StageProgress for SilentStageProgress {
    fn on_stage_start(&self, _stage: Stage, _index: usize, _total: usize) {}
    fn on_stage_complete(&self, _stage: Stage, _elapsed: Duration) {}
    fn on_stage_failed(&self, _stage: Stage, _error: &PipelineError) {}
}

// ── Runners ──────────────────────────────────────────────────────────

/// Runs each stage as `<executable> stage <name> ...` and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessStageRunner {
    executable: PathBuf,
}

impl ProcessStageRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Re-launch the running binary for each stage.
    pub fn current() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    /// Command-line arguments passed to the stage process.
    pub fn stage_args(stage: Stage, request: &RunRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "stage".into(),
            stage.name().into(),
            "--results-dir".into(),
            request.results_dir.clone().into(),
        ];
        if let Some(config) = &request.config_path {
            args.push("--config".into());
            args.push(config.clone().into());
        }
        if stage == Stage::Prepare {
            args.push("--tickers".into());
            args.extend(request.prepare.tickers.iter().map(OsString::from));
            args.push("--start".into());
            args.push(request.prepare.start.to_string().into());
            args.push("--end".into());
            args.push(request.prepare.end.to_string().into());
        }
        args
    }
}

impl StageRunner for ProcessStageRunner {
    fn run_stage(&self, stage: Stage, request: &RunRequest) -> Result<(), PipelineError> {
        let status = Command::new(&self.executable)
            .args(Self::stage_args(stage, request))
            .status()
            .map_err(|source| PipelineError::Spawn { stage, source })?;
        if !status.success() {
            return Err(PipelineError::StageFailed { stage, status });
        }
        Ok(())
    }
}

/// Runs stages inside the current process with an injected price provider.
pub struct InProcessStageRunner<'a> {
    provider: &'a dyn PriceProvider,
    download_progress: &'a dyn DownloadProgress,
}

impl<'a> InProcessStageRunner<'a> {
    pub fn new(provider: &'a dyn PriceProvider, download_progress: &'a dyn DownloadProgress) -> Self {
        Self {
            provider,
            download_progress,
        }
    }
}

impl StageRunner for InProcessStageRunner<'_> {
    fn run_stage(&self, stage: Stage, request: &RunRequest) -> Result<(), PipelineError> {
        let config = PipelineConfig::load(request.config_path.as_deref())?;
        let prepare = PrepareInputs {
            request: &request.prepare,
            provider: self.provider,
            progress: self.download_progress,
        };
        execute_stage(stage, &request.results_dir, &config, Some(prepare)).map_err(|e| {
            PipelineError::Stage {
                stage,
                source: e.into(),
            }
        })
    }
}

/// What the prepare stage needs beyond the results directory.
#[derive(Clone, Copy)]
pub struct PrepareInputs<'a> {
    pub request: &'a PrepareRequest,
    pub provider: &'a dyn PriceProvider,
    pub progress: &'a dyn DownloadProgress,
}

/// Run a single stage against `results_dir`.
pub fn execute_stage(
    stage: Stage,
    results_dir: &Path,
    config: &PipelineConfig,
    prepare: Option<PrepareInputs<'_>>,
) -> Result<()> {
    let layout = ArtifactLayout::new(results_dir);
    info!(%stage, results_dir = %results_dir.display(), "stage started");

    match stage {
        Stage::Prepare => {
            let Some(inputs) = prepare else {
                bail!("the prepare stage needs tickers, a start date and an end date");
            };
            stages::prepare::run(&layout, inputs.provider, inputs.request, inputs.progress)?;
        }
        Stage::Network => {
            stages::network::run(&layout)?;
        }
        Stage::Topology => {
            stages::topology::run(&layout, &config.topology)?;
        }
        Stage::Pricing => {
            let pricing = stages::pricing::run(&layout, &config.pricing)?;
            println!("[INFO] Monte Carlo call price: {:.4}", pricing.estimate.price);
        }
        Stage::Integration => {
            stages::integration::run(&layout, &config.integration)?;
        }
    }
    Ok(())
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub timings: Vec<StageTiming>,
    pub manifest: PathBuf,
}

/// Run all five stages in order, then write the run manifest.
pub fn run_pipeline(
    runner: &dyn StageRunner,
    request: &RunRequest,
    progress: &dyn StageProgress,
) -> Result<PipelineSummary, PipelineError> {
    // Reject a bad config before any stage touches the network.
    let config = PipelineConfig::load(request.config_path.as_deref())?;

    let total = Stage::ALL.len();
    let mut timings = Vec::with_capacity(total);
    for (index, stage) in Stage::ALL.into_iter().enumerate() {
        progress.on_stage_start(stage, index, total);
        let started = Instant::now();
        if let Err(e) = runner.run_stage(stage, request) {
            error!(%stage, error = %e, "stage failed; aborting pipeline");
            progress.on_stage_failed(stage, &e);
            return Err(e);
        }
        let elapsed = started.elapsed();
        progress.on_stage_complete(stage, elapsed);
        timings.push(StageTiming {
            stage,
            duration_secs: elapsed.as_secs_f64(),
        });
    }

    let layout = ArtifactLayout::new(&request.results_dir);
    RunManifest::collect(&layout, &request.prepare, config, timings.clone())
        .and_then(|m| m.write(&layout.manifest_json()))
        .map_err(|e| PipelineError::Manifest(e.into()))?;

    info!(manifest = %layout.manifest_json().display(), "pipeline complete");
    Ok(PipelineSummary {
        timings,
        manifest: layout.manifest_json(),
    })
}
