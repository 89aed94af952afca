use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::build_meta::{self, BuildMeta, UNKNOWN_USER};
use crate::loader::LoadOptions;
use crate::pipeline::{self, PipelineOptions};

pub const USAGE: &str = "Usage: excel_to_json <input_file.xlsx> [<rank_file.xlsx>]";

/// CLI arguments for `excel_to_json`.
#[derive(Parser, Debug)]
#[command(about = "Convert a benchmark workbook into performance.json and model.json.")]
pub struct Args {
    /// Benchmark workbook; every sheet is combined into the performance records.
    ///
    /// Optional at the parser level so a bare invocation prints the short usage line and
    /// exits with status 1.
    input: Option<PathBuf>,

    /// Workbook whose first sheet maps `model_id` to `rank`.
    rank_file: Option<PathBuf>,

    /// Directory that receives `performance.json` and `model.json`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Keep text such as `NA` or `null` as-is instead of reading it as a missing value.
    #[arg(long)]
    keep_na_strings: bool,

    /// Log debug diagnostics to stderr (overridden by `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Pipeline options for these arguments, or `None` if no input workbook was given.
    pub fn pipeline_options(&self) -> Option<PipelineOptions> {
        Some(PipelineOptions {
            input: self.input.clone()?,
            rank_file: self.rank_file.clone(),
            out_dir: self.out_dir.clone(),
            load: LoadOptions {
                na_markers: !self.keep_na_strings,
            },
        })
    }
}

pub fn run() -> Result<ExitCode> {
    run_with_args(Args::parse())
}

pub fn run_with_args(args: Args) -> Result<ExitCode> {
    init_logging(args.verbose);

    let Some(options) = args.pipeline_options() else {
        println!("{USAGE}");
        return Ok(ExitCode::from(1));
    };

    let report = pipeline::run(&options)
        .with_context(|| format!("convert {}", options.input.display()))?;
    for line in report.messages() {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

/// CLI arguments for `build_meta`.
#[derive(Parser, Debug)]
#[command(about = "Write build metadata (UTC build time and git user) for the leaderboard UI.")]
pub struct BuildMetaArgs {
    /// Output file.
    #[arg(long, value_name = "PATH", default_value = build_meta::DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Log debug diagnostics to stderr (overridden by `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

pub fn run_build_meta() -> Result<()> {
    run_build_meta_with_args(BuildMetaArgs::parse())
}

pub fn run_build_meta_with_args(args: BuildMetaArgs) -> Result<()> {
    init_logging(args.verbose);

    let user = build_meta::git_user_name().unwrap_or_else(|| {
        println!("Could not get git user, using default");
        UNKNOWN_USER.to_string()
    });
    let meta = BuildMeta::new(chrono::Utc::now(), user);
    build_meta::write_build_meta(&args.out, &meta)
        .with_context(|| format!("write build metadata to {}", args.out.display()))?;

    println!("Build metadata generated at {}", args.out.display());
    println!(
        "Last updated: {} by {}",
        meta.build_timestamp, meta.last_updated_by
    );
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
