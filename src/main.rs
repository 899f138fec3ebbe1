use anyhow::Result;
use clap::Parser;
use tracing::info;

use aira_readiness::pipeline::{run, RunConfig, RunOutcome};

/// AIRA readiness analysis - scores, clustering and maturity typologies
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the long-form survey table (delimited text)
    #[arg(short, long, default_value = "data/AIRAData_final.csv")]
    input: std::path::PathBuf,

    /// Output directory for the artifact bundle (default: "out")
    #[arg(short, long, default_value = "out")]
    output_dir: std::path::PathBuf,

    /// Smallest candidate cluster count
    #[arg(long, default_value_t = 2)]
    k_min: usize,

    /// Largest candidate cluster count
    #[arg(long, default_value_t = 10)]
    k_max: usize,

    /// Random seed for the clustering fits
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Recompute even if the input is unchanged since the last run
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting aira-readiness");
    let args = Args::parse();

    let outcome = run(&RunConfig {
        input: args.input,
        output_dir: args.output_dir,
        k_min: args.k_min,
        k_max: args.k_max,
        seed: args.seed,
        force: args.force,
    })?;

    if outcome == RunOutcome::SkippedUnchanged {
        info!("Nothing to do - pass --force to recompute");
    }
    Ok(())
}
