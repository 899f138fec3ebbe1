//! Staged analysis run: load → reshape → encode/impute → score → cluster →
//! classify → export. Synchronous start to finish; every derived table is an
//! immutable snapshot of this run.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::AnalysisError;
use crate::export::{self, ClusteringArtifacts, RunArtifacts};
use crate::loader;
use crate::matrix::CountryMatrix;
use crate::profiles::build_profiles;
use crate::report::render_report;
use crate::scores::score_table;
use crate::select::sweep;
use crate::summary::summarize_items;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub k_min: usize,
    pub k_max: usize,
    pub seed: u64,
    /// Recompute even when the recorded input fingerprint matches.
    pub force: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { chosen_k: usize, clusters: usize },
    /// The clustering stage declined the input as degenerate; section tables,
    /// scores and item summaries were still written, cluster artifacts were
    /// not.
    ScoresOnly,
    /// Input unchanged since the bundle in the output directory was written.
    SkippedUnchanged,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let pipeline_start = std::time::Instant::now();
    info!(
        "Pipeline started - input={}, output_dir={}, k={}..={}, seed={}",
        config.input.display(),
        config.output_dir.display(),
        config.k_min,
        config.k_max,
        config.seed
    );

    // single read serves both the fingerprint and the parse
    let bytes = std::fs::read(&config.input)
        .with_context(|| format!("reading source table {}", config.input.display()))?;
    let fingerprint = format!("{:016x}", xxh3_64(&bytes));

    if !config.force {
        if export::recorded_fingerprint(&config.output_dir).as_deref() == Some(fingerprint.as_str()) {
            info!(
                "Input unchanged - fingerprint={}, reusing bundle in {}",
                fingerprint,
                config.output_dir.display()
            );
            return Ok(RunOutcome::SkippedUnchanged);
        }
    }
    debug!("Input fingerprint - {}", fingerprint);

    let stage_start = std::time::Instant::now();
    let observations =
        loader::parse_observations(&mut csv::Reader::from_reader(bytes.as_slice()))
            .context("loading source table")?;
    let matrix = CountryMatrix::pivot(&observations).context("reshaping to country matrix")?;
    let imputed = matrix
        .encode()
        .impute()
        .context("encoding and imputing matrix")?;
    info!(
        "Data preparation completed - duration={:.2}s, countries={}, items={}",
        stage_start.elapsed().as_secs_f32(),
        imputed.n_rows(),
        imputed.n_cols()
    );

    let stage_start = std::time::Instant::now();
    let scores = score_table(&imputed).context("aggregating scores")?;
    info!(
        "Scoring completed - duration={:.2}s, countries={}",
        stage_start.elapsed().as_secs_f32(),
        scores.rows.len()
    );

    // a degenerate clustering input aborts the clustering stage only; the
    // scoring and summary artifacts are still worth exporting
    let clustered = match sweep(&imputed, config.k_min, config.k_max, config.seed) {
        Ok(selection) => {
            let profiles = build_profiles(&selection.assignment, &scores);
            for profile in &profiles {
                debug!(
                    "Cluster {} - typology={}, size={}, overall={:.1}",
                    profile.cluster_id,
                    profile.typology.label(),
                    profile.size(),
                    profile.overall_mean
                );
            }
            let report_md = render_report(&selection, &profiles);
            Some((selection, profiles, report_md))
        }
        Err(AnalysisError::DegenerateInput(reason)) => {
            warn!("Clustering skipped - {reason}; exporting scores and summaries only");
            None
        }
        Err(err) => return Err(err).context("selecting cluster count"),
    };

    let item_summaries = summarize_items(&matrix);

    let stage_start = std::time::Instant::now();
    export::write_all(
        &config.output_dir,
        &RunArtifacts {
            matrix: &matrix,
            scores: &scores,
            clustering: clustered
                .as_ref()
                .map(|(selection, profiles, report_md)| ClusteringArtifacts {
                    selection,
                    profiles,
                    report_md,
                }),
            item_summaries: &item_summaries,
            input_fingerprint: &fingerprint,
        },
    )
    .context("writing artifact bundle")?;
    info!(
        "Artifacts written - duration={:.2}s, directory={}",
        stage_start.elapsed().as_secs_f32(),
        config.output_dir.display()
    );

    match clustered {
        Some((selection, profiles, _)) => {
            info!(
                "Pipeline completed successfully - total_duration={:.2}s, chosen_k={}, clusters={}",
                pipeline_start.elapsed().as_secs_f32(),
                selection.chosen_k,
                profiles.len()
            );
            Ok(RunOutcome::Completed {
                chosen_k: selection.chosen_k,
                clusters: profiles.len(),
            })
        }
        None => {
            info!(
                "Pipeline completed without clustering - total_duration={:.2}s",
                pipeline_start.elapsed().as_secs_f32()
            );
            Ok(RunOutcome::ScoresOnly)
        }
    }
}
