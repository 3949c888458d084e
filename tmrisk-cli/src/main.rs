//! TMRisk CLI: run the topological martingale risk pipeline.
//!
//! Usage:
//! - `tmrisk --tickers AAPL MSFT --start 2022-01-01 --end 2022-06-01` runs all
//!   five stages, each in its own process, writing under `results/`.
//! - `tmrisk stage <name> ...` runs a single stage (used by the orchestrator).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tmrisk_core::data::{StdoutProgress, YahooProvider};
use tmrisk_runner::{
    execute_stage, run_pipeline, InProcessStageRunner, PipelineConfig, PrepareInputs,
    PrepareRequest, ProcessStageRunner, RunRequest, Stage, StageRunner, StdoutStageProgress,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tmrisk",
    version,
    about = "Topological martingale risk: correlation topology vs. Monte Carlo pricing error",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RunArgs {
    /// Tickers to analyse (e.g., AAPL MSFT SPY).
    #[arg(long, num_args = 1.., required = true)]
    tickers: Vec<String>,

    /// First date, inclusive (YYYY-MM-DD).
    #[arg(long, required = true)]
    start: Option<String>,

    /// Last date, inclusive (YYYY-MM-DD).
    #[arg(long, required = true)]
    end: Option<String>,

    /// Directory for summaries/ and plots/.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Optional TOML file overriding pricing, integration and topology parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run every stage inside this process instead of spawning one per stage.
    #[arg(long, default_value_t = false)]
    in_process: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single pipeline stage.
    #[command(hide = true)]
    Stage {
        /// prepare, network, topology, pricing or integration.
        name: Stage,

        /// Directory for summaries/ and plots/.
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,

        /// Optional TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Tickers (prepare only).
        #[arg(long, num_args = 1..)]
        tickers: Vec<String>,

        /// First date, inclusive (prepare only).
        #[arg(long)]
        start: Option<String>,

        /// Last date, inclusive (prepare only).
        #[arg(long)]
        end: Option<String>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Stage {
            name,
            results_dir,
            config,
            tickers,
            start,
            end,
        }) => run_stage_cmd(name, results_dir, config, tickers, start, end),
        None => run_pipeline_cmd(cli.run),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("{flag} must be YYYY-MM-DD, got '{raw}'"))
}

fn run_pipeline_cmd(args: RunArgs) -> Result<()> {
    let start = parse_date(args.start.as_deref().context("--start is required")?, "--start")?;
    let end = parse_date(args.end.as_deref().context("--end is required")?, "--end")?;

    let request = RunRequest {
        prepare: PrepareRequest {
            tickers: args.tickers,
            start,
            end,
        },
        results_dir: args.results_dir,
        config_path: args.config,
    };
    info!(
        tickers = ?request.prepare.tickers,
        %start,
        %end,
        in_process = args.in_process,
        "starting pipeline"
    );

    let summary = if args.in_process {
        let provider = YahooProvider::new()?;
        let runner = InProcessStageRunner::new(&provider, &StdoutProgress);
        run_with(&runner, &request)?
    } else {
        let runner = ProcessStageRunner::current().context("Failed to locate the tmrisk executable")?;
        run_with(&runner, &request)?
    };

    let total: f64 = summary.timings.iter().map(|t| t.duration_secs).sum();
    println!();
    println!("=== Pipeline complete ===");
    println!("Stages:     {}", summary.timings.len());
    println!("Elapsed:    {total:.2}s");
    println!("Results:    {}", request.results_dir.display());
    println!("Manifest:   {}", summary.manifest.display());
    Ok(())
}

fn run_with(
    runner: &dyn StageRunner,
    request: &RunRequest,
) -> Result<tmrisk_runner::PipelineSummary> {
    Ok(run_pipeline(runner, request, &StdoutStageProgress)?)
}

fn run_stage_cmd(
    stage: Stage,
    results_dir: PathBuf,
    config_path: Option<PathBuf>,
    tickers: Vec<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let config = PipelineConfig::load(config_path.as_deref())?;

    if stage != Stage::Prepare {
        return execute_stage(stage, &results_dir, &config, None);
    }

    let (Some(start), Some(end)) = (start, end) else {
        anyhow::bail!("the prepare stage needs --start and --end");
    };
    let request = PrepareRequest {
        tickers,
        start: parse_date(&start, "--start")?,
        end: parse_date(&end, "--end")?,
    };
    let provider = YahooProvider::new()?;
    let inputs = PrepareInputs {
        request: &request,
        provider: &provider,
        progress: &StdoutProgress,
    };
    execute_stage(stage, &results_dir, &config, Some(inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn top_level_run_parses() {
        let cli = Cli::try_parse_from([
            "tmrisk", "--tickers", "AAPL", "MSFT", "--start", "2022-01-01", "--end", "2022-06-01",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(cli.run.results_dir, PathBuf::from("results"));
        assert!(!cli.run.in_process);
    }

    #[test]
    fn run_requires_tickers() {
        assert!(Cli::try_parse_from(["tmrisk", "--start", "2022-01-01", "--end", "2022-06-01"]).is_err());
    }

    #[test]
    fn stage_subcommand_parses_without_run_args() {
        let cli = Cli::try_parse_from(["tmrisk", "stage", "topology", "--results-dir", "out"]).unwrap();
        match cli.command {
            Some(Commands::Stage { name, results_dir, tickers, .. }) => {
                assert_eq!(name, Stage::Topology);
                assert_eq!(results_dir, PathBuf::from("out"));
                assert!(tickers.is_empty());
            }
            None => panic!("expected stage subcommand"),
        }
    }

    #[test]
    fn stage_args_from_process_runner_parse() {
        let request = RunRequest {
            prepare: PrepareRequest {
                tickers: vec!["AAPL".into(), "MSFT".into()],
                start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            },
            results_dir: PathBuf::from("results"),
            config_path: Some(PathBuf::from("tmrisk.toml")),
        };
        for stage in Stage::ALL {
            let mut argv = vec![std::ffi::OsString::from("tmrisk")];
            argv.extend(ProcessStageRunner::stage_args(stage, &request));
            let cli = Cli::try_parse_from(argv).unwrap();
            assert!(matches!(cli.command, Some(Commands::Stage { name, .. }) if name == stage));
        }
    }

    #[test]
    fn bad_date_is_reported() {
        let err = parse_date("2022/01/01", "--start").unwrap_err();
        assert!(err.to_string().contains("--start must be YYYY-MM-DD"));
    }
}
